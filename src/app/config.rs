use crate::app::cli::Cli;
use crate::app::error::{ContextError, Result};
use crate::app::models::{OutputFormat, RuntimeConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "context-bundle.json";

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, ConfigLayer>,
}

/// One partial configuration source. Present keys replace earlier values.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default, alias = "max_file_size")]
    pub max_file_size: Option<u64>,
    #[serde(default, alias = "output_format")]
    pub output_format: Option<OutputFormat>,
}

impl ConfigLayer {
    fn apply(self, config: &mut RuntimeConfig) {
        if let Some(include) = self.include {
            config.include = include;
        }
        if let Some(exclude) = self.exclude {
            config.exclude = exclude;
        }
        if let Some(max_file_size) = self.max_file_size {
            config.max_file_size = max_file_size;
        }
        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
        }
    }

    fn from_cli(cli: &Cli) -> Self {
        Self {
            include: cli.include.clone(),
            exclude: cli.exclude.clone(),
            max_file_size: cli.max_size,
            output_format: cli.format,
        }
    }
}

fn presets_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(
        home.join(".config")
            .join("context-bundle")
            .join("presets.toml"),
    )
}

fn parse_presets(content: &str) -> Result<HashMap<String, ConfigLayer>> {
    let parsed: PresetsFile = toml::from_str(content)?;
    Ok(parsed.presets)
}

fn load_presets_file(path: &Path) -> Result<HashMap<String, ConfigLayer>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path).map_err(|source| ContextError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_presets(&content)
}

pub fn parse_json_config(content: &str) -> Result<ConfigLayer> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(ContextError::Config(
            "config file must contain a JSON object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

fn load_json_config(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path).map_err(|source| ContextError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json_config(&content)
}

/// Picks the preset layer: explicit name first, then the project directory name.
fn select_preset(
    presets: &HashMap<String, ConfigLayer>,
    explicit: Option<&str>,
    project_name: Option<&str>,
) -> ConfigLayer {
    if let Some(name) = explicit {
        if !presets.contains_key(name) {
            log::warn!("Preset '{}' not found, ignoring", name);
        }
    }
    explicit
        .or(project_name)
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default()
}

/// Merges defaults, preset, JSON file and CLI flags (later wins).
///
/// Failures while loading a layer are logged and the layer is skipped.
pub fn resolve_config(cli: &Cli, working_dir: &Path, project_name: Option<&str>) -> RuntimeConfig {
    let presets = match presets_path() {
        Some(path) => load_presets_file(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load presets from {}: {}", path.display(), e);
            HashMap::new()
        }),
        None => HashMap::new(),
    };
    resolve_with_presets(cli, working_dir, project_name, &presets)
}

fn resolve_with_presets(
    cli: &Cli,
    working_dir: &Path,
    project_name: Option<&str>,
    presets: &HashMap<String, ConfigLayer>,
) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();

    select_preset(presets, cli.preset.as_deref(), project_name).apply(&mut config);

    let json_path = match &cli.config {
        Some(path) => Some(working_dir.join(path)),
        None => Some(working_dir.join(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };
    if let Some(path) = json_path {
        match load_json_config(&path) {
            Ok(layer) => {
                log::debug!("Loaded config file {}", path.display());
                layer.apply(&mut config);
            }
            Err(e) => log::warn!(
                "Failed to load config {}: {}. Using defaults.",
                path.display(),
                e
            ),
        }
    }

    ConfigLayer::from_cli(cli).apply(&mut config);
    log::debug!("Resolved config: {:?}", config);
    config
}

/// Output path from the CLI, or the default name for the chosen format.
pub fn resolve_output_path(cli: &Cli, working_dir: &Path, format: OutputFormat) -> PathBuf {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("context-bundle.{}", format.extension())));
    working_dir.join(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_any_source() {
        let temp = TempDir::new().unwrap();
        let config = resolve_with_presets(&Cli::default(), temp.path(), None, &HashMap::new());
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_json_config_merges_shallowly() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{"include": ["src/**/*.ts"], "maxFileSize": 2048, "unknown": true}"#,
        )
        .unwrap();

        let config = resolve_with_presets(&Cli::default(), temp.path(), None, &HashMap::new());
        assert_eq!(config.include, vec!["src/**/*.ts".to_string()]);
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.exclude, RuntimeConfig::default().exclude);
        assert_eq!(config.output_format, OutputFormat::Xml);
    }

    #[test]
    fn test_cli_overrides_json() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("custom.json"),
            r#"{"outputFormat": "markdown", "exclude": ["dist/"]}"#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(PathBuf::from("custom.json")),
            exclude: Some(vec!["*.log".to_string()]),
            ..Cli::default()
        };
        let config = resolve_with_presets(&cli, temp.path(), None, &HashMap::new());
        assert_eq!(config.exclude, vec!["*.log".to_string()]);
        assert_eq!(config.output_format, OutputFormat::Markdown);
    }

    #[test]
    fn test_malformed_or_missing_json_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        let config = resolve_with_presets(&Cli::default(), temp.path(), None, &HashMap::new());
        assert_eq!(config, RuntimeConfig::default());

        let cli = Cli {
            config: Some(PathBuf::from("missing.json")),
            ..Cli::default()
        };
        let config = resolve_with_presets(&cli, temp.path(), None, &HashMap::new());
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(matches!(
            parse_json_config("[1, 2]"),
            Err(ContextError::Config(_))
        ));
    }

    #[test]
    fn test_preset_selection() {
        let presets = parse_presets(
            r#"
            [webapp]
            include = ["src/**"]
            max_file_size = 4096

            [other]
            output_format = "markdown"
            "#,
        )
        .unwrap();
        let temp = TempDir::new().unwrap();

        let auto = resolve_with_presets(&Cli::default(), temp.path(), Some("webapp"), &presets);
        assert_eq!(auto.include, vec!["src/**".to_string()]);
        assert_eq!(auto.max_file_size, 4096);

        let cli = Cli {
            preset: Some("other".to_string()),
            ..Cli::default()
        };
        let explicit = resolve_with_presets(&cli, temp.path(), Some("webapp"), &presets);
        assert_eq!(explicit.output_format, OutputFormat::Markdown);
        assert_eq!(explicit.include, RuntimeConfig::default().include);
    }

    #[test]
    fn test_output_path_defaults_by_format() {
        let dir = Path::new("/work");
        assert_eq!(
            resolve_output_path(&Cli::default(), dir, OutputFormat::Markdown),
            PathBuf::from("/work/context-bundle.md")
        );
        let cli = Cli {
            output: Some(PathBuf::from("out/ctx.txt")),
            ..Cli::default()
        };
        assert_eq!(
            resolve_output_path(&cli, dir, OutputFormat::Xml),
            PathBuf::from("/work/out/ctx.txt")
        );
    }
}
