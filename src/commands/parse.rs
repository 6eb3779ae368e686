use super::{report_warnings, to_json};
use crate::cli::TargetArgs;
use crate::output::UserOutput;
use anyhow::Context;
use harbor::{TranslateOptions, Translator};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn parse(
    file: &Path,
    target: &TargetArgs,
    load_env_files: bool,
    pretty: bool,
    output: &dyn UserOutput,
) -> anyhow::Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read descriptor '{}'", file.display()))?;

    let translator = Translator::new(options_from(target));
    let mut translation = translator.parse(&text, file)?;

    if load_env_files && !translation.env_files.is_empty() {
        let mut contents: HashMap<PathBuf, String> = HashMap::new();
        for path in &translation.env_files {
            debug!(path = %path.display(), "loading env file");
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read env file '{}'", path.display()))?;
            contents.insert(path.clone(), text);
        }
        translation.results = translator.populate_env_from_files(translation.results, &contents);
    }

    report_warnings(&translation, output);
    output.result(&to_json(&translation, pretty)?);
    Ok(())
}

pub(crate) fn options_from(target: &TargetArgs) -> TranslateOptions {
    TranslateOptions::new(&target.repository, &target.owner, &target.domain)
        .scm_domain(&target.scm_domain)
        .missing_main_image(&target.missing_main_image)
        .skip_missing_main_check(target.skip_missing_main)
}
