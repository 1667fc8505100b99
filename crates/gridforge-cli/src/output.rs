use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Print a command result as pretty JSON.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

/// Human-mode status line: a colored marker plus the message.
pub fn status_line(ok: bool, msg: &str) -> anyhow::Result<()> {
    let mut out = StandardStream::stdout(ColorChoice::Auto);
    let (marker, color) = if ok { ("ok", Color::Green) } else { ("fail", Color::Red) };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{marker:>4}")?;
    out.reset()?;
    writeln!(out, "  {msg}")?;
    Ok(())
}
