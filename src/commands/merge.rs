use super::{report_warnings, to_json};
use crate::cli::TargetArgs;
use crate::output::UserOutput;
use anyhow::{bail, Context};
use harbor::{ComposeSource, Translator};
use std::fs;
use std::path::PathBuf;

pub fn merge(
    files: &[PathBuf],
    target: &TargetArgs,
    pretty: bool,
    output: &dyn UserOutput,
) -> anyhow::Result<()> {
    if files.is_empty() {
        bail!("merge needs at least one descriptor file");
    }

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read descriptor '{}'", path.display()))?;
        sources.push(ComposeSource {
            text,
            path: path.clone(),
        });
    }

    let translator = Translator::new(super::parse::options_from(target));
    let translation = translator.merge_multiple(&sources)?;

    report_warnings(&translation, output);
    output.result(&to_json(&translation, pretty)?);
    Ok(())
}
