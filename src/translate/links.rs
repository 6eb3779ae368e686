//! Link and alias resolution.
//!
//! A raw link is `service` or `service:alias[:alias...]`. When explicit
//! aliases are given the full token list (service name included) is the
//! alias set; a bare name aliases itself.

use crate::spec::AliasInstance;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;
use std::collections::HashMap;

/// One decoded link declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub service_name: String,
    pub aliases: Vec<String>,
}

impl Link {
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.split(':').collect();
        let service_name = tokens[0].to_string();
        let aliases = if tokens.len() == 1 {
            vec![service_name.clone()]
        } else {
            tokens.iter().map(|t| t.to_string()).collect()
        };
        Link {
            service_name,
            aliases,
        }
    }
}

/// Service names referenced by a set of raw links, aliases stripped.
pub fn service_names(raw_links: &[String]) -> Vec<String> {
    raw_links
        .iter()
        .map(|raw| Link::parse(raw).service_name)
        .collect()
}

/// Flatten every alias across every link into one alias → service-name map.
/// Later links overwrite earlier ones on alias collision.
pub fn alias_map(raw_links: &[String]) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    for raw in raw_links {
        let link = Link::parse(raw);
        for alias in link.aliases {
            map.insert(alias, link.service_name.clone());
        }
    }
    map
}

/// Re-key an alias map by the base64 encoding of each alias and resolve the
/// target service to its instance name. Unknown targets keep the alias but
/// carry no instance name.
pub fn alias_instances(
    aliases: &IndexMap<String, String>,
    instance_names: &HashMap<String, String>,
) -> IndexMap<String, AliasInstance> {
    aliases
        .iter()
        .map(|(alias, service_name)| {
            let key = STANDARD.encode(alias.as_bytes());
            let entry = AliasInstance {
                alias: alias.clone(),
                instance_name: instance_names.get(service_name).cloned(),
            };
            (key, entry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_link_aliases_itself() {
        let link = Link::parse("postgres");
        assert_eq!(link.service_name, "postgres");
        assert_eq!(link.aliases, vec!["postgres"]);
    }

    #[test]
    fn test_explicit_aliases_keep_full_token_list() {
        let link = Link::parse("db:postgres:primary");
        assert_eq!(link.service_name, "db");
        assert_eq!(link.aliases, vec!["db", "postgres", "primary"]);
    }

    #[test]
    fn test_service_names_strip_aliases() {
        let raw = vec!["db:postgres".to_string(), "cache".to_string()];
        assert_eq!(service_names(&raw), vec!["db", "cache"]);
    }

    #[test]
    fn test_alias_map_last_writer_wins() {
        let raw = vec!["db:shared".to_string(), "cache:shared".to_string()];
        let map = alias_map(&raw);
        assert_eq!(map.get("shared"), Some(&"cache".to_string()));
        assert_eq!(map.get("db"), Some(&"db".to_string()));
        assert_eq!(map.get("cache"), Some(&"cache".to_string()));
    }

    #[test]
    fn test_alias_instances_use_base64_keys() {
        let mut aliases = IndexMap::new();
        aliases.insert("pg".to_string(), "db".to_string());

        let mut names = HashMap::new();
        names.insert("db".to_string(), "repo-db".to_string());

        let out = alias_instances(&aliases, &names);
        // "pg" => "cGc="
        let entry = out.get("cGc=").expect("base64 key");
        assert_eq!(entry.alias, "pg");
        assert_eq!(entry.instance_name.as_deref(), Some("repo-db"));
    }

    #[test]
    fn test_alias_instances_tolerate_unknown_service() {
        let mut aliases = IndexMap::new();
        aliases.insert("ghost".to_string(), "missing".to_string());

        let out = alias_instances(&aliases, &HashMap::new());
        let (_, entry) = out.first().unwrap();
        assert_eq!(entry.alias, "ghost");
        assert!(entry.instance_name.is_none());
    }
}
