//! Shared colored output for the CLI tools.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects the `NO_COLOR` environment variable and never colors a stream
//! that is not a terminal.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` for one stream.
///
/// Priority: `NO_COLOR` env > terminal detection.
pub fn resolve_color_choice(is_terminal: bool) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() || !is_terminal {
        return ColorChoice::Never;
    }
    ColorChoice::Auto
}

/// Styled output writer for terminal.
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new() -> Self {
        Self {
            stdout: StandardStream::stdout(resolve_color_choice(io::stdout().is_terminal())),
            stderr: StandardStream::stderr(resolve_color_choice(io::stderr().is_terminal())),
        }
    }

    /// Write text with a specific color and style.
    pub fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Green bold text.
    pub fn success(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Green), true);
    }

    /// Cyan text.
    pub fn info(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Cyan), false);
    }

    /// Plain text (no color).
    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
    }

    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }

    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    // ── Error output (stderr) ────────────────────────────────────────

    /// Write `ERROR <message>` as one line to stderr.
    pub fn error_line(&mut self, message: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "ERROR");
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, " {}", message);
    }

    /// Write unstyled text to stderr.
    pub fn stderr_plain(&mut self, text: &str) {
        let _ = write!(self.stderr, "{}", text);
    }
}

impl Default for StyledOutput {
    fn default() -> Self {
        Self::new()
    }
}
