mod merge;
mod parse;
mod validate;

pub use merge::merge;
pub use parse::parse;
pub use validate::validate;

use crate::output::UserOutput;
use harbor::Translation;

/// Summarize per-service warnings on stderr so the stdout JSON stays clean.
pub(crate) fn report_warnings(translation: &Translation, output: &dyn UserOutput) {
    for service in &translation.results {
        for warning in &service.warnings {
            output.warning(&format!(
                "warning [{}]: {}",
                service.metadata.name, warning.message
            ));
        }
    }
}

pub(crate) fn to_json(translation: &Translation, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(translation)?
    } else {
        serde_json::to_string(translation)?
    };
    Ok(json)
}
