//! Instance-name sanitization and hostname synthesis.

use regex::Regex;
use std::sync::OnceLock;

static NON_WORD_REGEX: OnceLock<Regex> = OnceLock::new();

fn non_word_regex() -> &'static Regex {
    NON_WORD_REGEX.get_or_init(|| Regex::new(r"\W").expect("static regex pattern is valid"))
}

/// Derive the instance name for a service: `repository-service` with every
/// non-word character replaced by `-`.
///
/// Known limitation: two services whose names sanitize to the same string
/// produce colliding instance names; collisions are not detected here.
pub fn instance_name(service_name: &str, repository_name: &str) -> String {
    let joined = format!("{}-{}", repository_name, service_name);
    non_word_regex().replace_all(&joined, "-").into_owned()
}

/// Inputs to hostname synthesis. The shard token is required by the naming
/// scheme but ignored for master pods, which is all this pipeline creates.
#[derive(Debug, Clone)]
pub struct HostnameInputs<'a> {
    pub short_hash: &'a str,
    pub instance_name: &'a str,
    pub owner_username: &'a str,
    pub user_content_domain: &'a str,
    pub master_pod: bool,
}

/// Seam for the hostname-generation collaborator. The pipeline only supplies
/// inputs and treats the output as an opaque string.
pub trait HostnameGenerator {
    fn elastic(&self, inputs: &HostnameInputs<'_>) -> String;
}

/// Default elastic naming scheme:
/// `{instance-name}-staging-{owner}.{domain}`, lowercased, with the shard
/// token prepended only for non-master pods.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElasticHostnames;

/// Shard token supplied to the generator; required by the scheme, unused
/// for master pods.
pub const PLACEHOLDER_SHORT_HASH: &str = "000";

impl HostnameGenerator for ElasticHostnames {
    fn elastic(&self, inputs: &HostnameInputs<'_>) -> String {
        let base = format!(
            "{}-staging-{}.{}",
            inputs.instance_name, inputs.owner_username, inputs.user_content_domain
        );
        let name = if inputs.master_pod {
            base
        } else {
            format!("{}-{}", inputs.short_hash, base)
        };
        name.to_lowercase()
    }
}
