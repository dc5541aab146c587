//! TerminalRenderer: shows a text snapshot on a real terminal.
//!
//! The snapshot is drawn line by line from the top-left corner. Raw mode turns
//! off newline translation, so every line is positioned explicitly. Between
//! draws only lines that changed are rewritten.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Print, ResetColor, SetAttribute},
    terminal, QueueableCommand,
};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Vec<String>>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `text`, rewriting only lines that differ from the previous draw.
    pub fn draw_text(&mut self, text: &str) -> Result<()> {
        self.buf.clear();
        match self.last.as_deref() {
            Some(prev) => encode_text_diff_into(prev, text, &mut self.buf)?,
            None => encode_text_full_into(text, &mut self.buf)?,
        }
        if !self.buf.is_empty() {
            self.flush_buf()?;
        }
        self.last = Some(text.lines().map(str::to_owned).collect());
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full redraw of `text` into `out`.
pub fn encode_text_full_into(text: &str, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for (y, line) in text.lines().enumerate() {
        out.queue(cursor::MoveTo(0, row(y)))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

/// Encode only the lines of `next` that differ from `prev` into `out`.
///
/// Lines that no longer exist are cleared. Nothing is written when the two
/// snapshots are identical.
pub fn encode_text_diff_into(prev: &[String], next: &str, out: &mut Vec<u8>) -> Result<()> {
    let mut count = 0usize;
    for (y, line) in next.lines().enumerate() {
        count = y + 1;
        if prev.get(y).map(String::as_str) == Some(line) {
            continue;
        }
        out.queue(cursor::MoveTo(0, row(y)))?;
        out.queue(Print(line))?;
        out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
    }

    for y in count..prev.len() {
        out.queue(cursor::MoveTo(0, row(y)))?;
        out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    }
    Ok(())
}

fn row(y: usize) -> u16 {
    u16::try_from(y).unwrap_or(u16::MAX)
}
