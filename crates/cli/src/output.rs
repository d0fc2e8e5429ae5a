//! Terminal output helpers

use colored::Colorize;
use std::io::{self, Write};

pub fn success(out: &mut dyn Write, message: impl AsRef<str>) -> io::Result<()> {
    writeln!(out, "{} {}", "✓".green().bold(), message.as_ref())
}

pub fn warning(out: &mut dyn Write, message: impl AsRef<str>) -> io::Result<()> {
    writeln!(out, "{} {}", "!".yellow().bold(), message.as_ref())
}

pub fn error(out: &mut dyn Write, message: impl AsRef<str>) -> io::Result<()> {
    writeln!(out, "{} {}", "✗".red().bold(), message.as_ref())
}

pub fn heading(out: &mut dyn Write, title: impl AsRef<str>) -> io::Result<()> {
    writeln!(out, "{}", title.as_ref().bold().underline())
}

/// `label: value` with the label dimmed
pub fn field(out: &mut dyn Write, label: &str, value: impl std::fmt::Display) -> io::Result<()> {
    writeln!(out, "  {} {}", format!("{}:", label).dimmed(), value)
}
