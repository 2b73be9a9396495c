pub mod actions;
mod progress;
mod styling;

pub use progress::PhaseProgress;
use styling::{dim, magenta_bold};

/// Prints the `glpipe` banner to stderr.
///
/// Stdout is reserved for workflow commands and the pipeline id.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚀 glpipe"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitLab pipelines for GitHub Actions")
    );
}
