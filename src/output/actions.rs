//! GitHub Actions workflow commands.
//!
//! See <https://docs.github.com/actions/reference/workflow-commands-for-github-actions>.

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::EnvSource;
use crate::error::{GlPipeError, Result};

/// Escapes a command message so it stays on a single line.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn format_command(command: &str, message: impl Display) -> String {
    format!("::{command}::{}", escape_data(&message.to_string()))
}

/// Shows `message` as a notice annotation on the run.
pub fn notice(message: impl Display) {
    println!("{}", format_command("notice", message));
}

/// Shows `message` as an error annotation. The caller sets the exit code.
pub fn set_failed(message: impl Display) {
    println!("{}", format_command("error", message));
}

/// Exposes `name=value` as a step output when `GITHUB_OUTPUT` is set.
///
/// Returns whether an output file was written.
pub fn set_output(env: &impl EnvSource, name: &str, value: &str) -> Result<bool> {
    match env.var("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        Some(path) => {
            append_output(Path::new(&path), name, value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> Result<()> {
    if value.contains('\n') || name.contains('=') {
        return Err(GlPipeError::Config(format!(
            "Output {name} must be a single-line value"
        )));
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{name}={value}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("plain"), "plain");
        assert_eq!(escape_data("50%\r\nnext"), "50%25%0D%0Anext");
    }

    #[test]
    fn test_format_command() {
        assert_eq!(format_command("notice", 1234), "::notice::1234");
        assert_eq!(
            format_command("error", "API request failed\nwith code 500"),
            "::error::API request failed%0Awith code 500"
        );
    }

    #[test]
    fn test_set_output_appends_to_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "previous=1\n").unwrap();

        let env: HashMap<String, String> = HashMap::from([(
            "GITHUB_OUTPUT".to_string(),
            file.path().to_string_lossy().to_string(),
        )]);

        assert!(set_output(&env, "pipeline-id", "99").unwrap());

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "previous=1\npipeline-id=99\n");
    }

    #[test]
    fn test_set_output_without_output_file() {
        let env: HashMap<String, String> = HashMap::new();
        assert!(!set_output(&env, "pipeline-id", "99").unwrap());
    }
}
