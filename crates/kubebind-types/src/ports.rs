//! Interaction ports implemented by the front end

use async_trait::async_trait;

use crate::Result;

/// Lets the user choose one entry from a list
#[async_trait]
pub trait Picker: Send {
    /// Returns `Ok(None)` when the user dismisses the prompt
    async fn pick(&mut self, placeholder: &str, items: &[String]) -> Result<Option<String>>;
}

/// User-visible messages
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Plain-text clipboard
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> Result<()>;
}
