//! Colored status lines for the launch pipeline.
//!
//! Every print is best-effort: a closed pipe must never abort a run that is
//! managing a live container. Callers discard the io::Result accordingly.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Writes the launcher's status lines to stdout, errors to stderr.
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    verbose: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            verbose: self.verbose,
        }
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
        }
    }

    /// One glyph-prefixed status line: colored glyph, plain message.
    fn status(&self, glyph: &str, color: Color, bold: bool, message: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
        let _ = write!(&mut buffer, "{}", glyph);
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.stdout.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.status("✓", Color::Green, true, message)
    }

    /// Print a warning message
    ///
    /// Warnings are part of normal operation here: a missing packager or a
    /// slow service degrades the run, it does not stop it.
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.status("⚠", Color::Yellow, true, message)
    }

    /// Print a progress message for the step about to run
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.status("⋯", Color::Magenta, false, message)
    }

    /// Print a diagnostic message (only in verbose mode)
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.status("→", Color::Blue, false, message)
    }

    /// Print an error message to stderr (always shown)
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();

        if buffer
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))
            .is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || stderr.print(&buffer).is_err()
        {
            // Stderr failed - fall back to stdout as last resort
            println!("✗ {}", message);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        let _ = writeln!(&mut buffer);
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = writeln!(&mut buffer, "═══ {} ═══", title);
        let _ = buffer.reset();
        self.stdout.print(&buffer)
    }

    /// Print indented text, used for streamed subprocess output
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        let _ = writeln!(&mut buffer, "    {}", message);
        self.stdout.print(&buffer)
    }

    /// Print a plain message
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        let _ = writeln!(&mut buffer, "{}", message);
        self.stdout.print(&buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_lines_are_suppressed_by_default() {
        let output = OutputManager::new(false);
        // Suppressed lines short-circuit before touching the writer
        assert!(output.verbose("not shown").is_ok());
    }

    #[test]
    fn clone_preserves_verbosity() {
        let output = OutputManager::new(true).clone();
        assert!(output.verbose);
    }
}
