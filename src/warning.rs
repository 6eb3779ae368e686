//! Structured, non-fatal diagnostics attached to a parse run.
//!
//! Every recoverable oddity in a descriptor (unsupported keys, dropped
//! ports, ignored images, ...) lands here instead of failing the parse.
//! The sink is append-only and ordered; consumers read it as a plain list.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// A single diagnostic record: a human-readable message plus arbitrary
/// metadata flattened alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub message: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }

    pub fn unsupported_keys(keys: Vec<String>) -> Self {
        Warning::new("The following keys specified in this service are not supported")
            .with("keys", json!(keys))
    }

    pub fn image_ignored(image: &str) -> Self {
        Warning::new("The `image` has been ignored since a `build` was provided")
            .with("image", json!(image))
    }

    pub fn build_args_unsupported(args: &Value) -> Self {
        Warning::new(
            "The `args` argument is not supported for builds. \
             These args will not be passed to the build.",
        )
        .with("args", args.clone())
    }

    pub fn invalid_port(port: &str) -> Self {
        Warning::new("An invalid port was added and will be ignored").with("port", json!(port))
    }

    pub fn invalid_port_mapping(host: &str, container: &str) -> Self {
        Warning::new("An invalid port mapping was added and will be ignored")
            .with("ports", json!([host, container]))
    }

    pub fn parent_not_found(service_name: &str, parent_service_name: &str) -> Self {
        Warning::new("Parent service is not found")
            .with("serviceName", json!(service_name))
            .with("parentServiceName", json!(parent_service_name))
    }
}

/// Ordered, append-only warning sink for one service's parse.
#[derive(Debug, Default, Clone)]
pub struct Warnings {
    records: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        self.records.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.records.iter()
    }

    /// Snapshot the sink as a plain list for the output record.
    pub fn into_vec(self) -> Vec<Warning> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_preserve_order() {
        let mut warnings = Warnings::new();
        warnings.push(Warning::invalid_port("abc"));
        warnings.push(Warning::invalid_port_mapping("9000", "5000"));

        let records = warnings.into_vec();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].details["port"], json!("abc"));
        assert_eq!(records[1].details["ports"], json!(["9000", "5000"]));
    }

    #[test]
    fn test_warning_serializes_flat() {
        let warning = Warning::parent_not_found("api", "ghost");
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["message"], "Parent service is not found");
        assert_eq!(value["serviceName"], "api");
        assert_eq!(value["parentServiceName"], "ghost");
    }
}
