//! Clipboard backends

use std::io;

use kubebind_types::{Clipboard, Result};

/// The desktop clipboard through `arboard`.
///
/// A handle is opened per write so nothing platform-specific is held
/// between commands.
#[derive(Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().map_err(io::Error::other)?;
        clipboard
            .set_text(text.to_string())
            .map_err(io::Error::other)?;
        Ok(())
    }
}

/// Prints the text instead; used with `--no-clipboard`
#[derive(Default)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}
