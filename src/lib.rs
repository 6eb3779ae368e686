//! # Harbormaster
//!
//! Translates multi-service compose descriptors into normalized per-service
//! deployment specifications for a remote build-and-run API.
//!
//! ## Pipeline
//!
//! - **Descriptor parsing**: a narrow compose v2 key subset, with unknown
//!   keys downgraded to warnings instead of errors
//! - **Main-service selection**: deterministic choice of the primary
//!   buildable service, with a placeholder synthesized when none qualifies
//! - **Hostname synthesis**: every instance gets a globally addressable
//!   synthetic hostname
//! - **Environment rewriting**: linked-service names embedded in env values
//!   (bare, `host:port`, or URL hosts) are rewritten to those hostnames
//! - **Extension merging**: one level of `extends`-based inheritance across
//!   descriptor files
//!
//! ## Quick start
//!
//! ```no_run
//! use harbor::{TranslateOptions, Translator};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), harbor::Error> {
//! let options = TranslateOptions::new("my-repo", "my-org", "example.net");
//! let translator = Translator::new(options);
//!
//! let yaml = std::fs::read_to_string("docker-compose.yml")?;
//! let translation = translator.parse(&yaml, Path::new("docker-compose.yml"))?;
//!
//! for service in &translation.results {
//!     println!("{} -> {}", service.metadata.name, service.instance.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The whole pipeline is synchronous pure computation: no I/O, no shared
//! state across invocations. Callers that need env-file expansion read the
//! files themselves and hand the contents to
//! [`Translator::populate_env_from_files`].

pub mod compose;
pub mod error;
pub mod spec;
pub mod translate;
pub mod warning;

// Re-export commonly used types
pub use compose::ComposeFile;
pub use error::{Error, Result};
pub use spec::ParsedService;
pub use translate::{ComposeSource, TranslateOptions, Translation, Translator};
pub use warning::Warning;
