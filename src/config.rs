//! # Configuration
//!
//! Application configuration loaded from YAML. Every field is optional:
//!
//! ```yaml
//! log:
//!   log_level: debug
//!   format: pretty
//! views:
//!   templates_dir: templates
//!   mime_types:
//!     atom: application/atom+xml
//! ```
//!
//! A relative `templates_dir` is resolved against the directory holding the
//! config file.

use crate::logging::LogConfig;
use crate::views::{MimeTypes, MiniJinjaRenderer, Views};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    pub views: ViewsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Directory of templates loaded into the renderer at startup
    pub templates_dir: Option<PathBuf>,
    /// Extra logical kind to MIME entries layered over the built-in table
    pub mime_types: HashMap<String, String>,
}

impl AppConfig {
    /// Read and parse `path`.
    ///
    /// # Errors
    ///
    /// The file cannot be read or is not valid configuration YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_yaml_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        if let (Some(dir), Some(base)) = (config.views.templates_dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

impl ViewsConfig {
    /// Built-in MIME table extended with the configured entries
    #[must_use]
    pub fn mime_types(&self) -> MimeTypes {
        let mut mime = MimeTypes::default();
        mime.extend(self.mime_types.iter().map(|(k, v)| (k.clone(), v.clone())));
        mime
    }

    /// Renderer holding the templates from `templates_dir`, or an empty one.
    pub fn renderer(&self) -> Result<MiniJinjaRenderer> {
        match &self.templates_dir {
            Some(dir) => MiniJinjaRenderer::from_dir(dir),
            None => Ok(MiniJinjaRenderer::new()),
        }
    }

    pub fn views(&self) -> Result<Views> {
        Ok(Views::new(self.renderer()?, self.mime_types()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use crate::views::Renderer;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_yaml_str("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
log:
  log_level: debug
  format: pretty
  async_logging: true
views:
  templates_dir: /srv/templates
  mime_types:
    atom: application/atom+xml
";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.log.log_level, "debug");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert!(config.log.async_logging);
        assert_eq!(
            config.views.templates_dir.as_deref(),
            Some(Path::new("/srv/templates"))
        );
        let mime = config.views.mime_types();
        assert_eq!(mime.resolve("atom"), "application/atom+xml");
        assert_eq!(mime.resolve("json"), "application/json");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(AppConfig::from_yaml_str("log: [1, 2").is_err());
        assert!(AppConfig::from_yaml_str("log:\n  format: 7\n").is_err());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = AppConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn test_load_resolves_relative_templates_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("tpl")).unwrap();
        fs::write(dir.path().join("tpl/hello.txt"), "hi {{ who }}").unwrap();

        let path = dir.path().join("app.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "views:\n  templates_dir: tpl").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.views.templates_dir, Some(dir.path().join("tpl")));

        let views = config.views.views().unwrap();
        let out = views
            .renderer()
            .render("hello.txt", &json!({"who": "there"}))
            .unwrap();
        assert_eq!(out, "hi there");
    }
}
