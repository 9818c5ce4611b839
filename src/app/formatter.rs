use crate::app::models::OutputFormat;
use quick_xml::escape::escape;

pub const FULL_TREE_HEADER: &str = "Directory Structure:";
pub const INCLUSION_TREE_HEADER: &str = "Included Files:";
pub const CONTENTS_HEADER: &str = "File Contents:";

pub struct OutputGenerator;

impl OutputGenerator {
    /// Wraps one file's content so that it can be recovered byte for byte.
    pub fn file_block(format: OutputFormat, relative_path: &str, content: &str) -> String {
        match format {
            OutputFormat::Xml => format!(
                "<file path=\"{}\">\n<![CDATA[{}]]>\n</file>\n\n",
                escape(relative_path),
                content.replace("]]>", "]]]]><![CDATA[>")
            ),
            OutputFormat::Markdown => {
                let fence = "`".repeat(longest_backtick_run(content).max(2) + 1);
                format!("{fence}{relative_path}\n{content}\n{fence}\n\n")
            }
        }
    }

    pub fn read_error(relative_path: &str, reason: &str) -> String {
        format!("[Error reading {}: {}]\n\n", relative_path, reason)
    }

    pub fn format_full_output(full_tree: &str, inclusion_tree: &str, blocks: &[String]) -> String {
        let mut out = String::new();
        out.push_str(FULL_TREE_HEADER);
        out.push('\n');
        out.push_str(full_tree);
        out.push_str("\n\n");

        out.push_str(INCLUSION_TREE_HEADER);
        out.push('\n');
        out.push_str(inclusion_tree);
        out.push_str("\n\n");

        out.push_str(CONTENTS_HEADER);
        out.push_str("\n\n");
        for block in blocks {
            out.push_str(block);
        }
        out
    }
}

fn longest_backtick_run(content: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in content.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    /// Concatenates the CDATA text of every `<file>` element with the given path.
    fn extract_xml_content(document: &str, wanted: &str) -> Option<String> {
        let mut reader = Reader::from_str(document);
        let mut current: Option<String> = None;
        let mut found: Option<String> = None;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"file" => {
                    let attr = e.try_get_attribute("path").unwrap().unwrap();
                    current = Some(attr.unescape_value().unwrap().into_owned());
                }
                Event::CData(text) if current.as_deref() == Some(wanted) => {
                    let text = std::str::from_utf8(&text.into_inner()).unwrap().to_string();
                    found.get_or_insert_with(String::new).push_str(&text);
                }
                Event::End(e) if e.name().as_ref() == b"file" => current = None,
                Event::Eof => break,
                _ => {}
            }
        }
        found
    }

    #[test]
    fn test_xml_block_round_trip() {
        let content = "fn main() {\n    let s = \"<b>&amp;</b>\";\n    // ]]> inside\n}\n";
        let block = OutputGenerator::file_block(OutputFormat::Xml, "src/a&b.rs", content);

        assert!(block.starts_with("<file path=\"src/a&amp;b.rs\">\n<![CDATA["));
        assert_eq!(extract_xml_content(&block, "src/a&b.rs").as_deref(), Some(content));
    }

    #[test]
    fn test_xml_round_trip_inside_document() {
        let blocks = vec![
            OutputGenerator::file_block(OutputFormat::Xml, "a.txt", "alpha"),
            OutputGenerator::file_block(OutputFormat::Xml, "b.txt", "]]>beta]]>"),
        ];
        let doc = OutputGenerator::format_full_output("├── a.txt", "└── b.txt", &blocks);

        assert_eq!(extract_xml_content(&doc, "a.txt").as_deref(), Some("alpha"));
        assert_eq!(extract_xml_content(&doc, "b.txt").as_deref(), Some("]]>beta]]>"));
    }

    #[test]
    fn test_markdown_block() {
        let block = OutputGenerator::file_block(OutputFormat::Markdown, "src/app.ts", "const x = 1;\n");
        assert_eq!(block, "```src/app.ts\nconst x = 1;\n\n```\n\n");
    }

    #[test]
    fn test_markdown_fence_outgrows_content_backticks() {
        let content = "Example:\n```rust\nfn f() {}\n```\n";
        let block = OutputGenerator::file_block(OutputFormat::Markdown, "README.md", content);

        assert!(block.starts_with("````README.md\n"));
        let body = block
            .strip_prefix("````README.md\n")
            .and_then(|rest| rest.strip_suffix("\n````\n\n"))
            .unwrap();
        assert_eq!(body, content);
    }

    #[test]
    fn test_full_output_layout() {
        let blocks = vec![OutputGenerator::read_error("gone.txt", "No such file")];
        let doc = OutputGenerator::format_full_output("FULL", "INCLUDED", &blocks);
        assert_eq!(
            doc,
            "Directory Structure:\nFULL\n\nIncluded Files:\nINCLUDED\n\nFile Contents:\n\n[Error reading gone.txt: No such file]\n\n"
        );
    }
}
