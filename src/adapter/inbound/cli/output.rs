//! Shared CLI output helpers for consistent operator-facing text.
//!
//! Command output goes to the `out` stream and failures to `err`, both held
//! as trait objects so handlers can be driven against in-memory buffers.

use std::fmt::Display;
use std::io::{self, Write};

use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::error::Result;

/// Writer pair used by command handlers.
pub struct Output<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Output<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }

    /// Print a plain line.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// Print an empty line.
    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Print a `Label: value` line.
    pub fn field(&mut self, label: &str, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{label}: {value}")
    }

    /// Print a success line.
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            message.if_supports_color(Stream::Stdout, |m| m.green())
        )
    }

    /// Print a value as indented JSON.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Print a pre-rendered block (e.g. a table).
    pub fn block(&mut self, content: &str) -> io::Result<()> {
        writeln!(self.out, "{}", content.trim_end())
    }

    /// Print an `Error:` line to the error stream.
    pub fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.err, "Error: {message}")
    }

    /// Flush both streams.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

/// A check or cross mark for a yes/no flag.
pub fn mark(flag: bool) -> String {
    if flag {
        "✓".if_supports_color(Stream::Stdout, |m| m.green()).to_string()
    } else {
        "✗".if_supports_color(Stream::Stdout, |m| m.red()).to_string()
    }
}
