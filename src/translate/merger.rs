//! `extends`-based service merging across a flattened batch.
//!
//! Supports both extension idioms: a child extending a distinctly named
//! base service, and a child redefining a service under its own name in a
//! second descriptor file. One level only; a child whose parent cannot be
//! found survives unmerged, annotated with a warning.

use crate::spec::ParsedService;
use crate::warning::Warning;
use indexmap::IndexMap;

/// Partition the batch (extension-free services first, source order kept
/// within each half), then fold extensions into their parents.
pub fn merge_services(services: Vec<ParsedService>) -> Vec<ParsedService> {
    let (plain, extending): (Vec<_>, Vec<_>) = services
        .into_iter()
        .partition(|service| extends_target(service).is_none());

    let mut merged: Vec<ParsedService> = plain;

    for child in extending {
        let Some(parent_name) = extends_target(&child).map(str::to_string) else {
            merged.push(child);
            continue;
        };

        let slot = merged.iter().position(|candidate| {
            candidate.metadata.name == parent_name
                || candidate.metadata.name == child.metadata.name
        });

        match slot {
            Some(index) => {
                let combined = shallow_merge(&merged[index], &child);
                merged[index] = combined;
            }
            None => {
                let mut orphan = child;
                orphan.warnings.push(Warning::parent_not_found(
                    &orphan.metadata.name,
                    &parent_name,
                ));
                merged.push(orphan);
            }
        }
    }

    merged
}

fn extends_target(service: &ParsedService) -> Option<&str> {
    service
        .metadata
        .extends
        .as_ref()
        .and_then(|extends| extends.service.as_deref())
        .filter(|target| !target.is_empty())
}

/// Child's populated top-level fields override the parent's; env is the one
/// field merged key-wise instead of replaced.
fn shallow_merge(parent: &ParsedService, child: &ParsedService) -> ParsedService {
    let mut merged = child.clone();
    merged.build = child.build.clone().or_else(|| parent.build.clone());
    merged.code = child.code.clone().or_else(|| parent.code.clone());
    merged.files = child.files.clone().or_else(|| parent.files.clone());
    merged.instance.env = merge_env(&parent.instance.env, &child.instance.env);
    // The extension is resolved; don't let it re-trigger on a later pass.
    merged.metadata.extends = None;
    merged
}

/// Overlay child env entries on the parent's: parent key order first, new
/// child keys appended, child values winning on collision.
pub fn merge_env(parent: &[String], child: &[String]) -> Vec<String> {
    let mut map: IndexMap<&str, Option<&str>> = IndexMap::new();
    for entry in parent.iter().chain(child.iter()) {
        match entry.split_once('=') {
            Some((key, value)) => {
                map.insert(key, Some(value));
            }
            None => {
                map.insert(entry.as_str(), None);
            }
        }
    }
    map.into_iter()
        .map(|(key, value)| match value {
            Some(value) => format!("{}={}", key, value),
            None => key.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ExtendsDecl;
    use crate::spec::{Instance, ServiceMetadata};

    fn service(name: &str, extends: Option<&str>, env: &[&str]) -> ParsedService {
        ParsedService {
            metadata: ServiceMetadata {
                name: name.to_string(),
                is_main: false,
                links: vec![],
                env_files: vec![],
                hostname: None,
                extends: extends.map(|target| ExtendsDecl {
                    service: Some(target.to_string()),
                    file: None,
                }),
            },
            build: None,
            code: None,
            files: None,
            instance: Instance {
                name: format!("repo-{}", name),
                container_start_command: None,
                ports: vec![],
                env: env.iter().map(|s| s.to_string()).collect(),
                aliases: IndexMap::new(),
            },
            warnings: vec![],
        }
    }

    #[test]
    fn test_merge_env_child_wins_parent_order_kept() {
        let parent = vec!["URL=BASE".to_string(), "URL2=BASE".to_string()];
        let child = vec!["URL=TEST".to_string()];
        assert_eq!(merge_env(&parent, &child), vec!["URL=TEST", "URL2=BASE"]);
    }

    #[test]
    fn test_merge_env_appends_new_child_keys() {
        let parent = vec!["A=1".to_string()];
        let child = vec!["B=2".to_string(), "A=9".to_string()];
        assert_eq!(merge_env(&parent, &child), vec!["A=9", "B=2"]);
    }

    #[test]
    fn test_extension_merges_into_distinct_parent() {
        let base = service("db", None, &["URL=BASE", "URL2=BASE"]);
        let child = service("db-override", Some("db"), &["URL=TEST"]);

        let merged = merge_services(vec![base, child]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].metadata.name, "db-override");
        assert_eq!(merged[0].instance.env, vec!["URL=TEST", "URL2=BASE"]);
        assert!(merged[0].metadata.extends.is_none());
    }

    #[test]
    fn test_same_name_redefinition_merges() {
        let base = service("api", None, &["A=1"]);
        let child = service("api", Some("api"), &["B=2"]);

        let merged = merge_services(vec![base, child]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].instance.env, vec!["A=1", "B=2"]);
    }

    #[test]
    fn test_extension_order_is_independent_of_declaration_order() {
        // The extending child is declared before its parent; the partition
        // step still merges it.
        let child = service("db-override", Some("db"), &["URL=TEST"]);
        let base = service("db", None, &["URL=BASE"]);

        let merged = merge_services(vec![child, base]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].instance.env, vec!["URL=TEST"]);
    }

    #[test]
    fn test_missing_parent_keeps_child_with_warning() {
        let orphan = service("api", Some("ghost"), &["A=1"]);

        let merged = merge_services(vec![orphan]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].warnings.len(), 1);
        let warning = &merged[0].warnings[0];
        assert_eq!(warning.message, "Parent service is not found");
        assert_eq!(warning.details["parentServiceName"], "ghost");
        assert_eq!(warning.details["serviceName"], "api");
        // Unmerged child keeps its extends declaration.
        assert!(merged[0].metadata.extends.is_some());
    }

    #[test]
    fn test_child_optionals_override_parent() {
        let mut base = service("db", None, &[]);
        base.files = crate::translate::build::files_parser(Some("postgres:9.6"));
        let child = service("db2", Some("db"), &[]);

        let merged = merge_services(vec![base, child]);
        // Child has no files of its own, so the parent's survive.
        assert!(merged[0].files.is_some());
    }

    #[test]
    fn test_empty_input_merges_to_empty() {
        assert!(merge_services(Vec::new()).is_empty());
    }
}
