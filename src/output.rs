/// Abstraction over user-facing output.
///
/// Command modules use this trait instead of `println!`/`eprintln!` so that
/// results stay on stdout (pipeable JSON) while status and warnings go to
/// stderr, and so tests can capture both.
pub trait UserOutput {
    /// Machine-readable result payload (stdout).
    fn result(&self, payload: &str);

    /// Informational status message (stderr).
    fn status(&self, message: &str);

    /// Warning message (stderr).
    fn warning(&self, message: &str);
}

/// Standard CLI output — JSON to stdout, diagnostics to stderr.
pub struct CliOutput;

impl UserOutput for CliOutput {
    fn result(&self, payload: &str) {
        println!("{}", payload);
    }

    fn status(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("\x1b[33m{}\x1b[0m", message);
    }
}
