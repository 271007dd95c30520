//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.
//! Labels whose file is known are rendered as `path:line:col` followed by
//! the source line and a caret underline.

use std::io::{self, Write};

use rustc_hash::FxHashMap;

use folio_ir::{FileId, Source, Span};

use crate::{Diagnostic, Label, Severity};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const HINT: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    sources: FxHashMap<FileId, Source>,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            sources: FxHashMap::default(),
        }
    }

    /// Register a source so labels inside it render with excerpts.
    pub fn add_source(&mut self, source: Source) {
        self.sources.insert(source.id(), source);
    }

    /// Register a source, builder style.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.add_source(source);
        self
    }

    /// Consume the emitter and return its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
        };
        self.write_colored(&severity.to_string(), color);
    }

    fn write_code(&mut self, code: &str) {
        if self.colors {
            let _ = write!(self.writer, "{}[{code}]{}", colors::BOLD, colors::RESET);
        } else {
            let _ = write!(self.writer, "[{code}]");
        }
    }

    fn write_label(&mut self, label: &Label, severity: Severity) {
        let marker = if label.is_primary { "-->" } else { ":::" };
        let color = if !label.is_primary {
            colors::SECONDARY
        } else if severity == Severity::Warning {
            colors::WARNING
        } else {
            colors::ERROR
        };

        let Some(excerpt) = self.excerpt(label.span) else {
            if !label.message.is_empty() {
                let _ = write!(self.writer, "  {marker} ");
                self.write_colored(&label.message, color);
                let _ = writeln!(self.writer);
            }
            return;
        };

        let _ = writeln!(
            self.writer,
            "  {marker} {}:{}:{}",
            excerpt.path,
            excerpt.line + 1,
            excerpt.column + 1
        );
        let gutter = " ".repeat(excerpt.line_number_width());
        let _ = writeln!(self.writer, "{gutter} |");
        let _ = writeln!(self.writer, "{} | {}", excerpt.line + 1, excerpt.text);
        let carets = format!(
            "{}{}",
            " ".repeat(excerpt.column),
            "^".repeat(excerpt.width.max(1))
        );
        let _ = write!(self.writer, "{gutter} | ");
        self.write_colored(&carets, color);
        if !label.message.is_empty() {
            let _ = write!(self.writer, " ");
            self.write_colored(&label.message, color);
        }
        let _ = writeln!(self.writer);
    }

    /// Locate a span in a registered source.
    fn excerpt(&self, span: Span) -> Option<Excerpt> {
        let source = self.sources.get(&span.id()?)?;
        let line = source.byte_to_line(span.start);
        let column = source.byte_to_column(span.start);
        let text = source.line(line)?.to_string();
        let end_line = source.byte_to_line(span.end);
        let width = if end_line == line {
            source.byte_to_column(span.end).saturating_sub(column)
        } else {
            text.chars().count().saturating_sub(column)
        };
        Some(Excerpt {
            path: source.id().vpath().to_string(),
            line,
            column,
            width,
            text,
        })
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

/// A resolved label location.
struct Excerpt {
    path: String,
    line: usize,
    column: usize,
    width: usize,
    text: String,
}

impl Excerpt {
    fn line_number_width(&self) -> usize {
        (self.line + 1).to_string().len()
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: severity[CODE]: message
        self.write_severity(diagnostic.severity);
        self.write_code(diagnostic.code.as_str());
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            self.write_label(label, diagnostic.severity);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::NOTE);
            let _ = writeln!(self.writer, ": {note}");
        }

        for hint in &diagnostic.hints {
            let _ = write!(self.writer, "  = ");
            self.write_colored("hint", colors::HINT);
            let _ = writeln!(self.writer, ": {hint}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count > 0 {
            self.write_colored("error", colors::ERROR);

            let error_part = if error_count == 1 {
                "previous error".to_string()
            } else {
                format!("{error_count} previous errors")
            };

            if warning_count > 0 {
                let _ = writeln!(
                    self.writer,
                    ": aborting due to {error_part}; {} warning{} emitted",
                    warning_count,
                    plural_s(warning_count)
                );
            } else {
                let _ = writeln!(self.writer, ": aborting due to {error_part}");
            }
        } else if warning_count > 0 {
            self.write_colored("warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {} warning{} emitted",
                warning_count,
                plural_s(warning_count)
            );
        }
    }
}
