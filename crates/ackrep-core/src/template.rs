//! Template rendering.
//!
//! Templates are handlebars files located by a naming convention: a template
//! named `template_metadata.yml` renders to `metadata.yml` next to it unless an
//! explicit target is given. Every render stamps a `warning` entry into the
//! context so generated files identify the template they came from.

use std::path::{Path, PathBuf};

use chrono::Local;
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext as HbRenderContext,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Default substring removed from template file names.
pub const DEFAULT_MARKER_TOKEN: &str = "template_";

/// Key of the generated-file notice in the render context.
pub const WARNING_KEY: &str = "warning";

/// Variables available to a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    vars: Map<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Context holding every entry of a descriptor mapping.
    pub fn from_mapping(mapping: &serde_yaml::Mapping) -> Self {
        let vars = mapping
            .iter()
            .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
            .collect();
        Self { vars }
    }

    /// Data handed to handlebars: the variables at top level and under `context`.
    fn render_data(&self) -> Value {
        let mut data = self.vars.clone();
        data.insert("context".to_string(), Value::Object(self.vars.clone()));
        Value::Object(data)
    }
}

impl From<Map<String, Value>> for TemplateContext {
    fn from(vars: Map<String, Value>) -> Self {
        Self { vars }
    }
}

/// Result of a render that wrote its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub target_path: PathBuf,
    pub text: String,
}

/// Renders templates by path convention.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
    base_path: Option<PathBuf>,
    marker_token: String,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // output is YAML or Markdown, never HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("join", Box::new(join_helper));
        handlebars.register_helper("yaml_list", Box::new(yaml_list_helper));

        Self {
            handlebars,
            base_path: None,
            marker_token: DEFAULT_MARKER_TOKEN.to_string(),
        }
    }

    /// Resolve template directories against `base_path` instead of the
    /// current directory.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    #[must_use]
    pub fn with_marker_token(mut self, token: impl Into<String>) -> Self {
        self.marker_token = token.into();
        self
    }

    /// Render `template` and write the result.
    ///
    /// Without `target` the output lands next to the template, named after it
    /// with the marker token removed. Existing files are overwritten.
    pub fn render(
        &self,
        template: impl AsRef<Path>,
        context: &TemplateContext,
        target: Option<&Path>,
    ) -> Result<RenderOutput> {
        let resolved = self.resolve(template.as_ref())?;
        let target_path = match target {
            Some(path) => path.to_path_buf(),
            None => resolved
                .dir
                .join(derive_target_name(&resolved.file_name, &self.marker_token)?),
        };

        let text = self.render_resolved(&resolved, context)?;
        ackrep_common_fs::write_string_atomic(&target_path, &text)?;
        debug!(template = %resolved.path().display(), target = %target_path.display(), "rendered template");

        Ok(RenderOutput { target_path, text })
    }

    /// Render `template` without writing anything.
    pub fn render_to_string(
        &self,
        template: impl AsRef<Path>,
        context: &TemplateContext,
    ) -> Result<String> {
        let resolved = self.resolve(template.as_ref())?;
        self.render_resolved(&resolved, context)
    }

    fn resolve(&self, template: &Path) -> Result<ResolvedTemplate> {
        let dir = template.parent().filter(|p| !p.as_os_str().is_empty());
        let (Some(dir), Some(file_name)) = (dir, template.file_name()) else {
            return Err(CatalogError::Config(format!(
                "template path `{}` must name a file inside a directory",
                template.display()
            )));
        };

        let base = match &self.base_path {
            Some(base) => base.clone(),
            None => std::env::current_dir().map_err(|e| {
                CatalogError::io("failed to resolve current directory", Path::new("."), e)
            })?,
        };

        Ok(ResolvedTemplate {
            dir: base.join(dir),
            file_name: file_name.to_string_lossy().into_owned(),
        })
    }

    fn render_resolved(&self, template: &ResolvedTemplate, context: &TemplateContext) -> Result<String> {
        let path = template.path();
        let source = ackrep_common_fs::read_to_string(&path, ackrep_common_fs::DEFAULT_MAX_FILE_SIZE)?;

        let mut context = context.clone();
        if !context.contains(WARNING_KEY) {
            context.set(WARNING_KEY, generation_notice(&template.file_name));
        }

        self.handlebars
            .render_template(&source, &context.render_data())
            .map_err(|e| CatalogError::Template {
                template: path,
                message: e.to_string(),
            })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

struct ResolvedTemplate {
    dir: PathBuf,
    file_name: String,
}

impl ResolvedTemplate {
    fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Output file name for a template: `file_name` with `marker` removed once.
///
/// The marker must be longer than one character, shorter than the file name
/// and occur in it exactly once.
pub fn derive_target_name(file_name: &str, marker: &str) -> Result<String> {
    let marker_len = marker.chars().count();
    let valid = marker_len > 1
        && marker_len < file_name.chars().count()
        && file_name.matches(marker).count() == 1;

    if !valid {
        return Err(CatalogError::AmbiguousTemplateName {
            file_name: file_name.to_string(),
            marker: marker.to_string(),
        });
    }
    Ok(file_name.replacen(marker, "", 1))
}

/// The notice stamped into generated files.
pub fn generation_notice(template_file_name: &str) -> String {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("This file was autogenerated from the template: {template_file_name} ({now}).")
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn yaml_to_json(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64().map(Value::from).unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(m) => Value::Object(
            m.iter().map(|(k, v)| (yaml_key(k), yaml_to_json(v))).collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `{{join list ", "}}`
fn join_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HbRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let separator = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");
    let joined = match h.param(0).map(|v| v.value()) {
        Some(Value::Array(items)) => items.iter().map(value_text).collect::<Vec<_>>().join(separator),
        Some(other) => value_text(other),
        None => String::new(),
    };
    out.write(&joined)?;
    Ok(())
}

/// `{{yaml_list list}}`: block sequence items, or `[]` when empty.
fn yaml_list_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut HbRenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let items: Vec<String> = match h.param(0).map(|v| v.value()) {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![value_text(other)],
    };

    if items.is_empty() {
        out.write("[]")?;
    } else {
        let rendered: Vec<String> = items.iter().map(|item| format!("\n- {item}")).collect();
        out.write(&rendered.concat())?;
    }
    Ok(())
}
