use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use pagetext_core::{ExtractError, ExtractionStats};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Color decisions for the two output streams, made separately because
/// either one may be redirected on its own.
#[derive(Debug, Clone, Copy)]
pub struct StreamColors {
    /// Stream carrying status lines.
    pub status: ColorMode,
    /// Stream carrying failure messages (always stderr).
    pub error: ColorMode,
}

impl StreamColors {
    pub fn detect(
        enabled: bool,
        status_on_stderr: bool,
        stdout_tty: bool,
        stderr_tty: bool,
    ) -> Self {
        let status_tty = if status_on_stderr { stderr_tty } else { stdout_tty };
        Self {
            status: ColorMode(enabled && status_tty),
            error: ColorMode(enabled && stderr_tty),
        }
    }
}

/// Print the page count once the document has been opened.
pub fn print_page_count(w: &mut dyn Write, pages: usize, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "PDF has {} pages", pages.bold())
    } else {
        writeln!(w, "PDF has {} pages", pages)
    }
}

/// Print the summary after the text file has been written.
pub fn print_success(
    w: &mut dyn Write,
    dest: &Path,
    stats: &ExtractionStats,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "Text extracted successfully to: {}",
            dest.display().cyan()
        )?;
        writeln!(w, "Total characters extracted: {}", stats.chars.bold())?;
        writeln!(
            w,
            "{}",
            "PDF to text conversion completed successfully!".green()
        )?;
    } else {
        writeln!(w, "Text extracted successfully to: {}", dest.display())?;
        writeln!(w, "Total characters extracted: {}", stats.chars)?;
        writeln!(w, "PDF to text conversion completed successfully!")?;
    }
    Ok(())
}

/// Print the summary when the text went to stdout instead of a file.
pub fn print_stdout_summary(
    w: &mut dyn Write,
    stats: &ExtractionStats,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "Total characters extracted: {}", stats.chars.bold())
    } else {
        writeln!(w, "Total characters extracted: {}", stats.chars)
    }
}

/// Print a failed extraction. A missing source gets its own one-line message.
pub fn print_failure(w: &mut dyn Write, err: &ExtractError, color: ColorMode) -> std::io::Result<()> {
    if let ExtractError::NotFound(path) = err {
        if color.enabled() {
            writeln!(w, "{} {}", "PDF file not found:".red(), path.display())?;
        } else {
            writeln!(w, "PDF file not found: {}", path.display())?;
        }
        return Ok(());
    }

    if color.enabled() {
        writeln!(w, "{} {}", "Error extracting PDF:".red(), err)?;
        writeln!(w, "{}", "PDF to text conversion failed!".bold().red())?;
    } else {
        writeln!(w, "Error extracting PDF: {}", err)?;
        writeln!(w, "PDF to text conversion failed!")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pagetext_core::BackendError;

    use super::*;

    fn plain() -> ColorMode {
        ColorMode(false)
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn success_summary_lines() {
        let stats = ExtractionStats {
            pages: 2,
            chars: 44,
            bytes: 44,
        };
        let out = render(|w| print_success(w, Path::new("out.txt"), &stats, plain()));
        assert_eq!(
            out,
            "Text extracted successfully to: out.txt\n\
             Total characters extracted: 44\n\
             PDF to text conversion completed successfully!\n"
        );
    }

    #[test]
    fn not_found_is_a_single_line() {
        let err = ExtractError::NotFound(PathBuf::from("missing.pdf"));
        let out = render(|w| print_failure(w, &err, plain()));
        assert_eq!(out, "PDF file not found: missing.pdf\n");
    }

    #[test]
    fn parse_failure_reports_cause_and_failure_line() {
        let err = ExtractError::Parse {
            path: PathBuf::from("bad.pdf"),
            source: BackendError::Encrypted,
        };
        let out = render(|w| print_failure(w, &err, plain()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Error extracting PDF: failed to read bad.pdf"));
        assert!(lines[0].contains("encrypted"));
        assert_eq!(lines[1], "PDF to text conversion failed!");
    }

    #[test]
    fn redirected_stderr_gets_no_color() {
        let colors = StreamColors::detect(true, false, true, false);
        assert!(colors.status.enabled());
        assert!(!colors.error.enabled());

        let colors = StreamColors::detect(true, true, true, false);
        assert!(!colors.status.enabled());
        assert!(!colors.error.enabled());
    }

    #[test]
    fn disabled_color_wins_over_terminals() {
        let colors = StreamColors::detect(false, false, true, true);
        assert!(!colors.status.enabled());
        assert!(!colors.error.enabled());
    }

    #[test]
    fn colored_output_keeps_text() {
        let out = render(|w| print_page_count(w, 3, ColorMode(true)));
        assert!(out.contains("PDF has"));
        assert!(out.contains('3'));
        assert!(out.contains("\u{1b}["));
    }
}
