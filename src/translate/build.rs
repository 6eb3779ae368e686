//! Build-source resolution and the simple per-field mappers.

use crate::compose::{BuildDecl, CommandDecl, EnvFileDecl};
use crate::spec::{BuildSpec, Code, FileSpec};
use crate::warning::{Warning, Warnings};
use indexmap::IndexMap;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static PLAIN_PORT_REGEX: OnceLock<Regex> = OnceLock::new();
static MAPPED_PORT_REGEX: OnceLock<Regex> = OnceLock::new();

fn plain_port_regex() -> &'static Regex {
    PLAIN_PORT_REGEX.get_or_init(|| Regex::new(r"^\d+$").expect("static regex pattern is valid"))
}

fn mapped_port_regex() -> &'static Regex {
    MAPPED_PORT_REGEX
        .get_or_init(|| Regex::new(r"^(\d+):(\d+)$").expect("static regex pattern is valid"))
}

/// How a service's `build` resolves with respect to remote source code.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeResolution {
    /// No build declared, or the build is explicitly disabled.
    Disabled,
    /// A local build context; remote code is not applicable.
    Local,
    /// The build points into the SCM domain; check out this repo instead.
    Remote(Code),
}

impl CodeResolution {
    pub fn into_code(self) -> Option<Code> {
        match self {
            CodeResolution::Remote(code) => Some(code),
            _ => None,
        }
    }
}

/// Resolve `build` into Dockerfile/context coordinates.
///
/// Remote (SCM-hosted) contexts yield only a root-relative Dockerfile path;
/// the checkout root is the implied context. Declared build args are not
/// supported downstream and are dropped with a warning.
pub fn resolve_build(
    build: Option<&BuildDecl>,
    scm_domain: &str,
    warnings: &mut Warnings,
) -> Option<BuildSpec> {
    let build = build?;
    if build.disabled() {
        return None;
    }

    if let Some(args) = build.args() {
        let args = serde_json::to_value(args).unwrap_or(serde_json::Value::Null);
        warnings.push(Warning::build_args_unsupported(&args));
    }

    let dockerfile = build.dockerfile();
    // The downstream API takes repo paths without a .git suffix.
    let context = strip_dot_git(build.context());

    if is_scm_url(scm_domain, &context) {
        return Some(BuildSpec {
            docker_file_path: resolve_absolute(&["/", dockerfile]),
            docker_build_context: None,
        });
    }

    Some(BuildSpec {
        docker_file_path: resolve_absolute(&["/", &context, dockerfile]),
        docker_build_context: Some(context),
    })
}

/// Resolve `build` into remote checkout coordinates.
///
/// The path after the SCM domain token splits on `#` into repo and
/// commitish. Local contexts are not an error; they are simply not remote.
pub fn resolve_remote_code(build: Option<&BuildDecl>, scm_domain: &str) -> CodeResolution {
    let build = match build {
        Some(build) if !build.disabled() => build,
        _ => return CodeResolution::Disabled,
    };

    let context = strip_dot_git(build.context());
    if !is_scm_url(scm_domain, &context) {
        return CodeResolution::Local;
    }

    let after_domain = context
        .split_once(scm_domain)
        .map(|(_, rest)| rest)
        .unwrap_or("");
    let repo_path = after_domain.strip_prefix('/').unwrap_or(after_domain);
    let (repo, commitish) = match repo_path.split_once('#') {
        Some((repo, commitish)) => (repo.to_string(), Some(commitish.to_string())),
        None => (repo_path.to_string(), None),
    };

    CodeResolution::Remote(Code { repo, commitish })
}

fn is_scm_url(scm_domain: &str, path: &str) -> bool {
    path.contains(scm_domain)
}

fn strip_dot_git(path: &str) -> String {
    path.replacen(".git", "", 1)
}

/// Flatten `ports` + `expose` declarations to container ports.
///
/// Only plain ports and symmetric `host:container` mappings survive; the
/// target runtime cannot remap ports, so asymmetric mappings are dropped
/// with a warning.
pub fn ports_parser(ports: &[String], expose: &[String], warnings: &mut Warnings) -> Vec<u16> {
    ports
        .iter()
        .chain(expose.iter())
        .filter_map(|port| {
            if plain_port_regex().is_match(port) {
                match port.parse::<u16>() {
                    Ok(number) => return Some(number),
                    Err(_) => {
                        warnings.push(Warning::invalid_port(port));
                        return None;
                    }
                }
            }
            if let Some(captures) = mapped_port_regex().captures(port) {
                let host = &captures[1];
                let container = &captures[2];
                if host == container {
                    match host.parse::<u16>() {
                        Ok(number) => return Some(number),
                        Err(_) => {
                            warnings.push(Warning::invalid_port(port));
                            return None;
                        }
                    }
                }
                warnings.push(Warning::invalid_port_mapping(host, container));
                return None;
            }
            warnings.push(Warning::invalid_port(port));
            None
        })
        .collect()
}

/// Normalize `command` to a single start command string.
pub fn command_parser(command: Option<&CommandDecl>) -> Option<String> {
    match command? {
        CommandDecl::Line(line) => Some(line.clone()),
        CommandDecl::Argv(argv) => Some(argv.join(" ")),
    }
}

/// Synthesize a wrapper Dockerfile for image-based services.
pub fn files_parser(image: Option<&str>) -> Option<IndexMap<String, FileSpec>> {
    let image = image?;
    let mut files = IndexMap::new();
    files.insert(
        "/Dockerfile".to_string(),
        FileSpec {
            body: format!(
                "# Image automatically created from docker-compose file\nFROM {}",
                image
            ),
        },
    );
    Some(files)
}

/// Resolve `env_file` declarations against the descriptor's directory.
pub fn env_file_parser(env_file: Option<&EnvFileDecl>, compose_dir: &Path) -> Vec<PathBuf> {
    match env_file {
        None => Vec::new(),
        Some(decl) => decl.paths().iter().map(|p| compose_dir.join(p)).collect(),
    }
}

/// Join path segments from the root, resolving `.` and `..` and letting an
/// absolute segment restart the path (Node `path.resolve` semantics, which
/// the downstream API's Dockerfile paths were built around).
pub fn resolve_absolute(segments: &[&str]) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in segments {
        if segment.starts_with('/') {
            stack.clear();
        }
        for part in segment.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    stack.pop();
                }
                other => stack.push(other),
            }
        }
    }
    format!("/{}", stack.join("/"))
}
