use miette::Diagnostic;
use std::io;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Invalid compose descriptor: {0}")]
    #[diagnostic(
        code(harbor::compose::invalid),
        help("Check the descriptor against the compose v2 subset harbormaster understands")
    )]
    Compose(String),

    #[error("Unsupported compose version '{0}'")]
    #[diagnostic(
        code(harbor::compose::version),
        help("Supported versions are '2', '3' and their point releases, e.g. version: '2.1'")
    )]
    UnsupportedVersion(String),

    #[error("YAML error: {0}")]
    #[diagnostic(code(harbor::compose::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
