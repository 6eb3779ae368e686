//! Compose document loading and schema validation.

use super::ComposeFile;
use crate::error::{Error, Result};
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;

static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();

fn version_regex() -> &'static Regex {
    VERSION_REGEX
        .get_or_init(|| Regex::new(r"^[23](\.\d+)?$").expect("static regex pattern is valid"))
}

impl ComposeFile {
    /// Parse a compose document from YAML text.
    ///
    /// Fatal on malformed YAML, a missing/non-mapping `services` section, a
    /// non-string or unrecognized `version`, or a recognized service key
    /// with the wrong shape. Everything softer is deferred to per-service
    /// warnings during translation.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(text)?;

        if !document.is_mapping() {
            return Err(Error::Compose(
                "descriptor must be a mapping with a `services` section".to_string(),
            ));
        }

        if let Some(version) = document.get("version") {
            let version = version.as_str().ok_or_else(|| {
                Error::Compose("`version` must be a quoted string".to_string())
            })?;
            if !version_regex().is_match(version) {
                return Err(Error::UnsupportedVersion(version.to_string()));
            }
        }

        match document.get("services") {
            Some(Value::Mapping(_)) => {}
            Some(_) => {
                return Err(Error::Compose(
                    "`services` must be a mapping of service names".to_string(),
                ))
            }
            None => {
                return Err(Error::Compose(
                    "descriptor is missing the required `services` section".to_string(),
                ))
            }
        }

        let file: ComposeFile = serde_yaml::from_value(document)?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "
version: '2'
services:
  web:
    build: .
    ports:
      - \"7890:7890\"
";

    #[test]
    fn test_parses_version_2() {
        let file = ComposeFile::from_yaml(MINIMAL).unwrap();
        assert_eq!(file.services.len(), 1);
        assert!(file.services.contains_key("web"));
    }

    #[test]
    fn test_parses_point_releases_and_version_3() {
        for version in ["2.0", "2.1", "3", "3.0"] {
            let yaml = MINIMAL.replace("'2'", &format!("'{}'", version));
            assert!(
                ComposeFile::from_yaml(&yaml).is_ok(),
                "version {} should parse",
                version
            );
        }
    }

    #[test]
    fn test_rejects_garbage_version() {
        let yaml = MINIMAL.replace("'2'", "'2.a'");
        assert!(matches!(
            ComposeFile::from_yaml(&yaml),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_rejects_unquoted_version() {
        let yaml = MINIMAL.replace("'2'", "2");
        assert!(matches!(
            ComposeFile::from_yaml(&yaml),
            Err(Error::Compose(_))
        ));
    }

    #[test]
    fn test_missing_services_is_fatal() {
        assert!(matches!(
            ComposeFile::from_yaml("version: '2'"),
            Err(Error::Compose(_))
        ));
    }

    #[test]
    fn test_version_is_optional() {
        assert!(ComposeFile::from_yaml("services:\n  db:\n    image: postgres").is_ok());
    }

    #[test]
    fn test_service_order_is_declaration_order() {
        let yaml = "
services:
  zebra:
    image: a
  alpha:
    image: b
  middle:
    image: c
";
        let file = ComposeFile::from_yaml(yaml).unwrap();
        let names: Vec<&String> = file.services.keys().collect();
        assert_eq!(names, vec!["zebra", "alpha", "middle"]);
    }
}
