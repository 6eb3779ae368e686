use super::ServiceDescriptor;
use indexmap::IndexMap;
use serde::Deserialize;

/// A parsed compose document: declaration-ordered map of named services.
///
/// Declaration order is load-bearing — main-service selection breaks ties
/// by source order — so services live in an [`IndexMap`], never a hash map.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ComposeFile {
    #[serde(default)]
    pub version: Option<String>,

    pub services: IndexMap<String, ServiceDescriptor>,
}
