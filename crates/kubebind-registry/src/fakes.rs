//! Recording stand-ins for the interaction ports

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use kubebind_types::{BindError, Clipboard, Notifier, Picker, Result};

/// Answers picks from a script; an exhausted script dismisses the prompt
#[derive(Clone, Default)]
pub struct ScriptedPicker {
    answers: Arc<Mutex<VecDeque<Option<String>>>>,
    placeholders: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPicker {
    pub fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: Arc::new(Mutex::new(
                answers.iter().map(|a| a.map(str::to_string)).collect(),
            )),
            placeholders: Arc::default(),
        }
    }

    pub fn placeholders(&self) -> Vec<String> {
        self.placeholders.lock().clone()
    }
}

#[async_trait]
impl Picker for ScriptedPicker {
    async fn pick(&mut self, placeholder: &str, _items: &[String]) -> Result<Option<String>> {
        self.placeholders.lock().push(placeholder.to_string());
        Ok(self.answers.lock().pop_front().flatten())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    infos: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

#[derive(Clone, Default)]
pub struct RecordingClipboard {
    texts: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingClipboard {
    pub fn last(&self) -> Option<String> {
        self.texts.lock().last().cloned()
    }

    pub fn fail(&self) {
        *self.failing.lock() = true;
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if *self.failing.lock() {
            return Err(BindError::NotFound("no display".to_string()));
        }
        self.texts.lock().push(text.to_string());
        Ok(())
    }
}
