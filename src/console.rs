//! Terminal implementations of the notification and picker ports

use async_trait::async_trait;

use kubebind_types::{BindError, Notifier, Picker, Result};

/// Info on stdout, errors on stderr
#[derive(Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// Stands in for the picker when there is no terminal to draw on
#[derive(Default)]
pub struct NonInteractivePicker;

#[async_trait]
impl Picker for NonInteractivePicker {
    async fn pick(&mut self, placeholder: &str, items: &[String]) -> Result<Option<String>> {
        Err(BindError::NotFound(format!(
            "{}: no terminal to choose on, pass --name or --chart. Candidates: {}",
            placeholder,
            items.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_interactive_picker_lists_candidates() {
        let mut picker = NonInteractivePicker;
        let err = picker
            .pick("Select a chart", &["api".to_string(), "web".to_string()])
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Select a chart: no terminal to choose on, pass --name or --chart. Candidates: api, web"
        );
    }
}
