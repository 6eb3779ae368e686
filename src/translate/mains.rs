//! Main-service selection.
//!
//! Exactly one service in a batch is the "main" — the primary buildable
//! entry point for the repository. Services declaring a local build context
//! outrank services whose build points at the SCM domain; ties break on
//! declaration order. When nothing is buildable a placeholder main is
//! synthesized so the batch always has an entry point, unless the caller
//! opts out.

use crate::compose::ServiceDescriptor;
use crate::spec::{FileSpec, Instance, ParsedService, ServiceMetadata};
use indexmap::IndexMap;

/// Buildable services bucketed by build-source kind, keyed by service name.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MainServices {
    pub builds: IndexMap<String, ParsedService>,
    pub externals: IndexMap<String, ParsedService>,
}

/// Pick the main service from raw descriptors.
///
/// Local builds (context does not mention the SCM domain) win over
/// external ones; within a bucket the first declaration wins. Image-only
/// batches have no main.
pub fn select_main<'a>(
    services: &'a IndexMap<String, ServiceDescriptor>,
    scm_domain: &str,
) -> Option<&'a str> {
    let mut first_local: Option<&str> = None;
    let mut first_external: Option<&str> = None;

    for (name, service) in services {
        let build = match &service.build {
            Some(build) if !build.disabled() => build,
            _ => continue,
        };
        let context = build.context().replacen(".git", "", 1);
        if context.contains(scm_domain) {
            first_external.get_or_insert(name.as_str());
        } else {
            first_local.get_or_insert(name.as_str());
        }
    }

    first_local.or(first_external)
}

/// Re-pick the main over already-translated services (used after the
/// extension merger rebuilds the batch). Returns the index of the winner.
pub fn select_main_parsed(results: &[ParsedService]) -> Option<usize> {
    let local = results
        .iter()
        .position(|service| service.build.is_some() && service.code.is_none());
    local.or_else(|| results.iter().position(|service| service.code.is_some()))
}

/// Bucket every buildable service for the auxiliary `mains` output.
pub fn categorize(results: &[ParsedService]) -> MainServices {
    let mut mains = MainServices::default();
    for service in results {
        if service.code.is_some() {
            mains
                .externals
                .insert(service.metadata.name.clone(), service.clone());
        } else if service.build.is_some() {
            mains
                .builds
                .insert(service.metadata.name.clone(), service.clone());
        }
    }
    mains
}

/// Synthesize the placeholder main: named after the repository, built from
/// a configurable stock image, with no env and no links. Its hostname is
/// filled in with the rest of the batch.
pub fn placeholder_main(repository_name: &str, missing_main_image: &str) -> ParsedService {
    let mut files = IndexMap::new();
    files.insert(
        "/Dockerfile".to_string(),
        FileSpec {
            body: format!(
                "# Placeholder main service created from docker-compose file\nFROM {}",
                missing_main_image
            ),
        },
    );

    ParsedService {
        metadata: ServiceMetadata {
            name: repository_name.to_string(),
            is_main: true,
            links: Vec::new(),
            env_files: Vec::new(),
            hostname: None,
            extends: None,
        },
        build: None,
        code: None,
        files: Some(files),
        instance: Instance {
            name: repository_name.to_string(),
            container_start_command: None,
            ports: Vec::new(),
            env: Vec::new(),
            aliases: IndexMap::new(),
        },
        warnings: Vec::new(),
    }
}
