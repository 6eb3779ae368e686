//! Per-service descriptor types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// One named service as declared in the source document.
///
/// Recognized keys are typed; anything else lands in `unknown` and is
/// surfaced as an unsupported-keys warning rather than an error.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServiceDescriptor {
    #[serde(default)]
    pub build: Option<BuildDecl>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub command: Option<CommandDecl>,

    #[serde(default)]
    pub ports: Vec<PortDecl>,

    #[serde(default)]
    pub expose: Vec<PortDecl>,

    /// `name` or `name:alias[:alias...]` strings. A non-list value is
    /// tolerated and treated as no links at all.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub links: Vec<String>,

    #[serde(default)]
    pub depends_on: Vec<String>,

    #[serde(default)]
    pub environment: Option<EnvDecl>,

    #[serde(default)]
    pub env_file: Option<EnvFileDecl>,

    #[serde(default)]
    pub extends: Option<ExtendsDecl>,

    /// Every key the pipeline does not recognize, kept for diagnostics.
    #[serde(flatten)]
    pub unknown: IndexMap<String, Value>,
}

impl ServiceDescriptor {
    /// Names of all declared-but-unsupported keys, in declaration order.
    pub fn unsupported_keys(&self) -> Vec<String> {
        self.unknown.keys().cloned().collect()
    }

    /// Environment assignments normalized to `KEY=VALUE` strings.
    ///
    /// Map-form declarations serialize scalar values (numbers, bools) the
    /// way YAML spells them.
    pub fn environment_lines(&self) -> Vec<String> {
        match &self.environment {
            None => Vec::new(),
            Some(EnvDecl::List(lines)) => lines.clone(),
            Some(EnvDecl::Map(map)) => map
                .iter()
                .map(|(key, value)| format!("{}={}", key, scalar_to_string(value)))
                .collect(),
        }
    }
}

/// `build:` — a bare path/URL string or a context object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BuildDecl {
    Path(String),
    Config(BuildConfig),
}

impl BuildDecl {
    pub fn context(&self) -> &str {
        match self {
            BuildDecl::Path(path) => path,
            BuildDecl::Config(config) => config.context.as_deref().unwrap_or(""),
        }
    }

    pub fn dockerfile(&self) -> &str {
        match self {
            BuildDecl::Path(_) => "Dockerfile",
            BuildDecl::Config(config) => config.dockerfile.as_deref().unwrap_or("Dockerfile"),
        }
    }

    pub fn disabled(&self) -> bool {
        matches!(self, BuildDecl::Config(config) if config.disabled.unwrap_or(false))
    }

    pub fn args(&self) -> Option<&Value> {
        match self {
            BuildDecl::Path(_) => None,
            BuildDecl::Config(config) => config.args.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BuildConfig {
    #[serde(default)]
    pub context: Option<String>,

    #[serde(default)]
    pub dockerfile: Option<String>,

    /// Build args are not supported downstream; declaring them only earns
    /// a warning.
    #[serde(default)]
    pub args: Option<Value>,

    /// Escape hatch: a disabled build behaves as if no build was declared.
    #[serde(default)]
    pub disabled: Option<bool>,
}

/// `command:` — a shell string or an argv list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommandDecl {
    Line(String),
    Argv(Vec<String>),
}

/// Port declarations may be quoted strings or bare YAML integers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortDecl {
    Number(i64),
    Text(String),
}

impl PortDecl {
    pub fn as_text(&self) -> String {
        match self {
            PortDecl::Number(n) => n.to_string(),
            PortDecl::Text(s) => s.clone(),
        }
    }
}

/// `environment:` — `KEY=VALUE` list form or mapping form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvDecl {
    List(Vec<String>),
    Map(IndexMap<String, Value>),
}

/// `env_file:` — a single path or a list of paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvFileDecl {
    One(String),
    Many(Vec<String>),
}

impl EnvFileDecl {
    pub fn paths(&self) -> Vec<&str> {
        match self {
            EnvFileDecl::One(path) => vec![path.as_str()],
            EnvFileDecl::Many(paths) => paths.iter().map(String::as_str).collect(),
        }
    }
}

/// `extends: {service, file}` — one level of inheritance from another
/// declared service, optionally in another descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendsDecl {
    #[serde(default)]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Sequence(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(yaml: &str) -> ServiceDescriptor {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_build_string_form() {
        let service = descriptor("build: ./app");
        let build = service.build.unwrap();
        assert_eq!(build.context(), "./app");
        assert_eq!(build.dockerfile(), "Dockerfile");
        assert!(!build.disabled());
    }

    #[test]
    fn test_build_object_form() {
        let service = descriptor(
            "build:\n  context: ./src\n  dockerfile: custom.Dockerfile\n  args:\n    - WOW=1",
        );
        let build = service.build.unwrap();
        assert_eq!(build.context(), "./src");
        assert_eq!(build.dockerfile(), "custom.Dockerfile");
        assert!(build.args().is_some());
    }

    #[test]
    fn test_environment_map_is_normalized() {
        let service = descriptor("environment:\n  PORT: 8080\n  DEBUG: true\n  NAME: api");
        assert_eq!(
            service.environment_lines(),
            vec!["PORT=8080", "DEBUG=true", "NAME=api"]
        );
    }

    #[test]
    fn test_environment_list_passes_through() {
        let service = descriptor("environment:\n  - A=1\n  - B=2");
        assert_eq!(service.environment_lines(), vec!["A=1", "B=2"]);
    }

    #[test]
    fn test_non_list_links_are_tolerated() {
        let service = descriptor("links: not-a-list");
        assert!(service.links.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_captured_in_order() {
        let service = descriptor("image: nginx\nvolumes:\n  - ./a:/a\nrestart: always");
        assert_eq!(service.unsupported_keys(), vec!["volumes", "restart"]);
    }

    #[test]
    fn test_ports_accept_bare_numbers() {
        let service = descriptor("ports:\n  - 80\n  - \"9000:9000\"");
        let texts: Vec<String> = service.ports.iter().map(PortDecl::as_text).collect();
        assert_eq!(texts, vec!["80", "9000:9000"]);
    }
}
