//! The descriptor → deployment-spec translation pipeline.
//!
//! Stages, in order: document parse, main-service selection, per-service
//! field extraction, placeholder injection, batch hostname synthesis,
//! alias resolution, environment rewriting. Hostname synthesis is a
//! barrier: rewriting for one service may reference any other service's
//! hostname, so no env is rewritten until every instance name and hostname
//! in the batch is final.

pub mod build;
pub mod links;
pub mod mains;
pub mod merger;
pub mod naming;
pub mod rewrite;

use crate::compose::{ComposeFile, ServiceDescriptor};
use crate::error::Result;
use crate::spec::{Instance, ParsedService, ServiceMetadata};
use crate::warning::{Warning, Warnings};
use indexmap::IndexMap;
use mains::MainServices;
use naming::{ElasticHostnames, HostnameGenerator, HostnameInputs, PLACEHOLDER_SHORT_HASH};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything the pipeline needs to know about the deployment target.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Repository the descriptor belongs to; prefixes every instance name.
    pub repository_name: String,

    /// Organization owning the deployment; embedded in hostnames.
    pub owner_username: String,

    /// DNS zone for synthesized hostnames.
    pub user_content_domain: String,

    /// Domain substring that marks a build context as a remote checkout.
    pub scm_domain: String,

    /// Image for the synthesized placeholder main service.
    pub missing_main_image: String,

    /// When set, batches without a buildable service get no placeholder;
    /// would-be mains are still recorded in the `mains` index.
    pub skip_missing_main_check: bool,
}

impl TranslateOptions {
    pub fn new(
        repository_name: impl Into<String>,
        owner_username: impl Into<String>,
        user_content_domain: impl Into<String>,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            owner_username: owner_username.into(),
            user_content_domain: user_content_domain.into(),
            scm_domain: "github.com".to_string(),
            missing_main_image: "busybox".to_string(),
            skip_missing_main_check: false,
        }
    }

    pub fn scm_domain(mut self, domain: impl Into<String>) -> Self {
        self.scm_domain = domain.into();
        self
    }

    pub fn missing_main_image(mut self, image: impl Into<String>) -> Self {
        self.missing_main_image = image.into();
        self
    }

    pub fn skip_missing_main_check(mut self, skip: bool) -> Self {
        self.skip_missing_main_check = skip;
        self
    }
}

/// One descriptor file fed to [`Translator::merge_multiple`].
#[derive(Debug, Clone)]
pub struct ComposeSource {
    pub text: String,
    pub path: PathBuf,
}

/// The pipeline's output: the translated batch plus auxiliary indexes.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub results: Vec<ParsedService>,

    /// Union of every service's resolved env-file paths.
    pub env_files: Vec<PathBuf>,

    /// Every buildable service, bucketed by build-source kind.
    pub mains: MainServices,
}

/// Stateless translation engine bound to one set of options.
pub struct Translator {
    options: TranslateOptions,
    hostnames: Box<dyn HostnameGenerator>,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self {
            options,
            hostnames: Box::new(ElasticHostnames),
        }
    }

    /// Swap the hostname-generation collaborator (tests, other naming
    /// schemes).
    pub fn with_generator(options: TranslateOptions, hostnames: Box<dyn HostnameGenerator>) -> Self {
        Self { options, hostnames }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Translate one descriptor into a deployment batch.
    pub fn parse(&self, text: &str, file_path: &Path) -> Result<Translation> {
        self.parse_inner(text, file_path, self.options.skip_missing_main_check)
    }

    fn parse_inner(
        &self,
        text: &str,
        file_path: &Path,
        skip_missing_main_check: bool,
    ) -> Result<Translation> {
        let compose = ComposeFile::from_yaml(text)?;
        let compose_dir = file_path.parent().map(Path::to_path_buf).unwrap_or_default();

        let main_name =
            mains::select_main(&compose.services, &self.options.scm_domain).map(str::to_string);
        debug!(
            services = compose.services.len(),
            main = main_name.as_deref().unwrap_or("<none>"),
            "selected main service"
        );

        let mut results = Vec::with_capacity(compose.services.len() + 1);
        let mut alias_maps = Vec::with_capacity(compose.services.len() + 1);
        for (name, raw) in &compose.services {
            let (service, aliases) =
                self.parse_service(name, raw, main_name.as_deref(), &compose_dir);
            results.push(service);
            alias_maps.push(aliases);
        }

        let mut placeholder_added = false;
        if main_name.is_none() && !skip_missing_main_check {
            debug!("no buildable service; injecting placeholder main");
            results.push(mains::placeholder_main(
                &self.options.repository_name,
                &self.options.missing_main_image,
            ));
            alias_maps.push(IndexMap::new());
            placeholder_added = true;
        }

        self.finalize_batch(&mut results, &alias_maps);
        Ok(self.assemble(results, placeholder_added))
    }

    /// Extract one service's fields. Batch-dependent pieces (hostname,
    /// alias instance names, env rewriting) stay unset here.
    fn parse_service(
        &self,
        name: &str,
        raw: &ServiceDescriptor,
        main_name: Option<&str>,
        compose_dir: &Path,
    ) -> (ParsedService, IndexMap<String, String>) {
        let mut warnings = Warnings::new();

        let unsupported = raw.unsupported_keys();
        if !unsupported.is_empty() {
            warnings.push(Warning::unsupported_keys(unsupported));
        }

        let mut image = raw.image.as_deref();
        if raw.build.is_some() {
            if let Some(ignored) = image {
                warnings.push(Warning::image_ignored(ignored));
                image = None;
            }
        }

        let build_spec =
            build::resolve_build(raw.build.as_ref(), &self.options.scm_domain, &mut warnings);
        let code = build::resolve_remote_code(raw.build.as_ref(), &self.options.scm_domain)
            .into_code();

        let mut link_names = links::service_names(&raw.links);
        link_names.extend(raw.depends_on.iter().cloned());

        let ports: Vec<String> = raw.ports.iter().map(|p| p.as_text()).collect();
        let expose: Vec<String> = raw.expose.iter().map(|p| p.as_text()).collect();

        let service = ParsedService {
            metadata: ServiceMetadata {
                name: name.to_string(),
                is_main: main_name == Some(name),
                links: link_names,
                env_files: build::env_file_parser(raw.env_file.as_ref(), compose_dir),
                hostname: None,
                extends: raw.extends.clone(),
            },
            build: build_spec,
            code,
            files: build::files_parser(image),
            instance: Instance {
                name: naming::instance_name(name, &self.options.repository_name),
                container_start_command: build::command_parser(raw.command.as_ref()),
                ports: build::ports_parser(&ports, &expose, &mut warnings),
                env: raw.environment_lines(),
                aliases: IndexMap::new(),
            },
            warnings: warnings.into_vec(),
        };

        (service, links::alias_map(&raw.links))
    }

    /// Batch barrier: finalize every instance name and hostname, then — and
    /// only then — resolve aliases and rewrite env values.
    fn finalize_batch(
        &self,
        results: &mut [ParsedService],
        alias_maps: &[IndexMap<String, String>],
    ) {
        let instance_names: HashMap<String, String> = results
            .iter()
            .map(|service| (service.metadata.name.clone(), service.instance.name.clone()))
            .collect();

        for service in results.iter_mut() {
            service.metadata.hostname = Some(self.hostname_for(&service.instance.name));
        }

        let hostnames: HashMap<String, String> = results
            .iter()
            .filter_map(|service| {
                service
                    .metadata
                    .hostname
                    .as_ref()
                    .map(|hostname| (service.metadata.name.clone(), hostname.clone()))
            })
            .collect();

        for (service, aliases) in results.iter_mut().zip(alias_maps) {
            service.instance.aliases = links::alias_instances(aliases, &instance_names);
            service.instance.env =
                rewrite::rewrite(&service.instance.env, &hostnames, &service.metadata.links);
        }
    }

    fn hostname_for(&self, instance_name: &str) -> String {
        self.hostnames.elastic(&HostnameInputs {
            short_hash: PLACEHOLDER_SHORT_HASH,
            instance_name,
            owner_username: &self.options.owner_username,
            user_content_domain: &self.options.user_content_domain,
            master_pod: true,
        })
    }

    fn assemble(&self, results: Vec<ParsedService>, placeholder_added: bool) -> Translation {
        let mut env_files: Vec<PathBuf> = Vec::new();
        for service in &results {
            for path in &service.metadata.env_files {
                if !env_files.contains(path) {
                    env_files.push(path.clone());
                }
            }
        }

        let mut mains = mains::categorize(&results);
        if placeholder_added {
            if let Some(placeholder) = results.last() {
                mains
                    .builds
                    .insert(placeholder.metadata.name.clone(), placeholder.clone());
            }
        }

        Translation {
            results,
            env_files,
            mains,
        }
    }

    /// Expand env-file contents into each service's env, then re-run the
    /// rewrite pass over the whole batch.
    ///
    /// `contents` maps resolved env-file paths (as found in
    /// `metadata.envFiles`) to their raw `KEY=VALUE` text.
    pub fn populate_env_from_files(
        &self,
        mut results: Vec<ParsedService>,
        contents: &HashMap<PathBuf, String>,
    ) -> Vec<ParsedService> {
        for service in &mut results {
            for path in service.metadata.env_files.clone() {
                let Some(text) = contents.get(&path) else {
                    warn!(path = %path.display(), "env file contents not supplied; skipping");
                    continue;
                };
                for item in dotenvy::from_read_iter(text.as_bytes()) {
                    match item {
                        Ok((key, value)) => {
                            service.instance.env.push(format!("{}={}", key, value))
                        }
                        Err(error) => {
                            warn!(path = %path.display(), %error, "skipping malformed env line");
                        }
                    }
                }
            }
        }

        let hostnames: HashMap<String, String> = results
            .iter()
            .filter_map(|service| {
                service
                    .metadata
                    .hostname
                    .as_ref()
                    .map(|hostname| (service.metadata.name.clone(), hostname.clone()))
            })
            .collect();

        for service in &mut results {
            service.instance.env =
                rewrite::rewrite(&service.instance.env, &hostnames, &service.metadata.links);
        }

        results
    }

    /// Merge an already-translated batch: resolve `extends`, recompute the
    /// env-file union and re-select the main (placeholder included, unless
    /// suppressed).
    pub fn merge_parsed(&self, services: Vec<ParsedService>) -> Translation {
        let mut merged = merger::merge_services(services);

        for service in &mut merged {
            service.metadata.is_main = false;
        }

        let mut placeholder_added = false;
        match mains::select_main_parsed(&merged) {
            Some(index) => merged[index].metadata.is_main = true,
            None if !self.options.skip_missing_main_check => {
                let mut placeholder = mains::placeholder_main(
                    &self.options.repository_name,
                    &self.options.missing_main_image,
                );
                placeholder.metadata.hostname = Some(self.hostname_for(&placeholder.instance.name));
                merged.push(placeholder);
                placeholder_added = true;
            }
            None => {}
        }

        self.assemble(merged, placeholder_added)
    }

    /// Run `parse` over several descriptor files and merge the combined
    /// batch. Individual files never get placeholder mains; only the merged
    /// set does.
    pub fn merge_multiple(&self, sources: &[ComposeSource]) -> Result<Translation> {
        let mut combined = Vec::new();
        for source in sources {
            let translation = self.parse_inner(&source.text, &source.path, true)?;
            combined.extend(translation.results);
        }
        Ok(self.merge_parsed(combined))
    }
}
