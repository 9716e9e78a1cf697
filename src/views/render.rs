use crate::error::Result;
use anyhow::Context;
use minijinja::Environment;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Rendering collaborator: a template identifier and a data payload in, a
/// serialized body out.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, template: &str, data: &Value) -> Result<String>;
}

/// Template extensions picked up by [`MiniJinjaRenderer::from_dir`]
const TEMPLATE_EXTENSIONS: [&str; 4] = ["html", "txt", "json", "xml"];

/// [`Renderer`] backed by a `minijinja` environment.
///
/// Template names keep their extension (`todos/index.html`) so minijinja's
/// default auto-escaping applies to HTML templates.
#[derive(Debug, Default)]
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Builder form of [`MiniJinjaRenderer::add_template`]
    pub fn with_template(
        mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self> {
        self.add_template(name, source)?;
        Ok(self)
    }

    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        debug!(template = %name, "Template registered");
        self.env.add_template_owned(name, source.into())?;
        Ok(())
    }

    /// Load every template under `dir`, named by its path relative to `dir`
    /// with `/` separators.
    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut renderer = Self::new();
        renderer.load_dir(dir, dir)?;
        Ok(renderer)
    }

    fn load_dir(&mut self, root: &Path, dir: &Path) -> anyhow::Result<()> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read template directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                self.load_dir(root, &path)?;
                continue;
            }
            let is_template = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext));
            if !is_template {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read template {}", path.display()))?;
            self.add_template(name, source)?;
        }
        Ok(())
    }
}

impl Renderer for MiniJinjaRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(data)?)
    }
}
