//! Deployment-spec output model.
//!
//! This is the wire contract consumed by the remote build-and-run API, so
//! field names serialize in its camelCase convention and absent optionals
//! are omitted rather than emitted as null.

use crate::compose::ExtendsDecl;
use crate::warning::Warning;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// One fully translated service, ready to drive a build-and-run request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedService {
    pub metadata: ServiceMetadata,

    /// Local build coordinates. Absent for image-only and remote-checkout
    /// context services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSpec>,

    /// Remote SCM checkout coordinates. Absent for local builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,

    /// Synthetic in-container files, keyed by absolute path. Only generated
    /// for image-based services that need a wrapper Dockerfile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<IndexMap<String, FileSpec>>,

    pub instance: Instance,

    pub warnings: Vec<Warning>,
}

impl ParsedService {
    /// Whether this service can be built at all (locally or from a remote
    /// checkout), as opposed to running a prebuilt image.
    pub fn is_buildable(&self) -> bool {
        self.build.is_some() || self.code.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    /// The service's key in the source document.
    pub name: String,

    pub is_main: bool,

    /// Referenced service names: parsed `links` service names followed by
    /// `depends_on`, duplicates preserved.
    pub links: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env_files: Vec<PathBuf>,

    /// Synthesized network hostname. Only populated once the whole batch's
    /// instance names are known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Inheritance declaration, carried through for the extension merger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<ExtendsDecl>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    pub docker_file_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_build_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    pub repo: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitish: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSpec {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Sanitized, batch-unique identifier derived from repository and
    /// service name.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_start_command: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,

    pub env: Vec<String>,

    /// Link aliases keyed by the base64 encoding of the alias string —
    /// downstream consumers key off the literal encoding.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, AliasInstance>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasInstance {
    pub alias: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
}
