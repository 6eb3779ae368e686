use crate::output::UserOutput;
use anyhow::Context;
use harbor::ComposeFile;
use std::fs;
use std::path::Path;

pub fn validate(file: &Path, output: &dyn UserOutput) -> anyhow::Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read descriptor '{}'", file.display()))?;

    let compose = ComposeFile::from_yaml(&text)?;

    output.status(&format!(
        "{}: OK ({} service{})",
        file.display(),
        compose.services.len(),
        if compose.services.len() == 1 { "" } else { "s" }
    ));

    for (name, service) in &compose.services {
        let unsupported = service.unsupported_keys();
        if !unsupported.is_empty() {
            output.warning(&format!(
                "warning [{}]: unsupported keys will be ignored: {}",
                name,
                unsupported.join(", ")
            ));
        }
    }

    Ok(())
}
