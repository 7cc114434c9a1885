//! Report rendering and terminal message helpers.
//!
//! The report goes to stdout or `--output`; everything else goes to stderr so
//! the report can be piped.

use std::io::Write;

use wizarr_client::BatchReport;

use crate::error::CliResult;
use crate::settings::OutputSettings;

/// Report format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One invitation URL per line
    #[default]
    Urls,
    /// Full JSON report
    Json,
}

/// Render the report in the selected format.
///
/// URL mode joins the URLs with newlines and adds no trailing newline; the
/// writer decides on that.
pub fn render(report: &BatchReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Urls => Ok(report.invitation_urls().join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Write the report to its destination and announce file output on stderr.
pub fn write_report(report: &BatchReport, settings: &OutputSettings) -> CliResult<()> {
    let rendered = render(report, settings.format)?;
    let has_content = match settings.format {
        OutputFormat::Urls => !rendered.is_empty(),
        OutputFormat::Json => true,
    };

    match &settings.path {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            if has_content && settings.format == OutputFormat::Urls {
                file.write_all(b"\n")?;
            }
            if !settings.quiet {
                let message = match settings.format {
                    OutputFormat::Urls => format!(
                        "{} invitation URL(s) saved to {}",
                        report.invitation_urls().len(),
                        path.display()
                    ),
                    OutputFormat::Json => format!("Results saved to {}", path.display()),
                };
                eprintln!();
                print_info(&message);
            }
        }
        None => {
            if has_content {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{rendered}")?;
                stdout.flush()?;
            }
        }
    }
    Ok(())
}

/// Check if color output is enabled
fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Progress line for a created invitation (green checkmark)
pub fn success_line(message: &str) -> String {
    status_line(true, message, use_color())
}

/// Progress line for a failed invitation (red cross)
pub fn failure_line(message: &str) -> String {
    status_line(false, message, use_color())
}

fn status_line(success: bool, message: &str, color: bool) -> String {
    let (symbol, code) = if success { ("✓", "32") } else { ("✗", "31") };
    if color {
        format!("\x1b[{code}m{symbol}\x1b[0m {message}")
    } else {
        format!("{symbol} {message}")
    }
}

/// Print a warning message (yellow)
pub fn print_warning(message: &str) {
    if use_color() {
        eprintln!("\x1b[33mWarning:\x1b[0m {}", message);
    } else {
        eprintln!("Warning: {}", message);
    }
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{}", message);
}
