//! Filterable list picker
//!
//! Typing narrows the list to items containing the filter text (case
//! insensitive). Enter picks the highlighted item, Esc dismisses the picker.

use async_trait::async_trait;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, ListState, Paragraph},
};
use tracing::debug;

use kubebind_types::{Picker, Result};

use crate::action::PickerAction;
use crate::keybindings::KeyBindings;
use crate::layout::Layout;
use crate::list_selector::ListSelector;
use crate::status_bar::{StatusBar, picker_hints};
use crate::terminal::Tui;
use crate::theme::Theme;

/// How a pick ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerOutcome {
    Selected(String),
    Dismissed,
}

/// Items, filter text and cursor of one pick
pub struct PickerState {
    items: Vec<String>,
    filter: String,
    /// Indices into `items` that match the filter
    visible: Vec<usize>,
    list: ListState,
}

impl PickerState {
    pub fn new(items: &[String]) -> Self {
        let mut state = Self {
            items: items.to_vec(),
            filter: String::new(),
            visible: Vec::new(),
            list: ListState::default(),
        };
        state.refilter();
        state
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Items matching the filter, in their original order
    pub fn visible(&self) -> Vec<&str> {
        self.visible
            .iter()
            .map(|&i| self.items[i].as_str())
            .collect()
    }

    /// The highlighted item
    pub fn selected(&self) -> Option<&str> {
        self.list
            .selected()
            .and_then(|pos| self.visible.get(pos))
            .map(|&i| self.items[i].as_str())
    }

    /// Apply an action; returns the outcome once the pick is over
    pub fn apply(&mut self, action: PickerAction) -> Option<PickerOutcome> {
        match action {
            PickerAction::Up => {
                if let Some(pos) = self.list.selected() {
                    self.list.select(Some(pos.saturating_sub(1)));
                }
            }
            PickerAction::Down => {
                if let Some(pos) = self.list.selected() {
                    if pos + 1 < self.visible.len() {
                        self.list.select(Some(pos + 1));
                    }
                }
            }
            PickerAction::Select => {
                // Enter on an empty list does nothing
                return self
                    .selected()
                    .map(|item| PickerOutcome::Selected(item.to_string()));
            }
            PickerAction::Cancel => return Some(PickerOutcome::Dismissed),
            PickerAction::Input(c) => {
                self.filter.push(c);
                self.refilter();
            }
            PickerAction::Backspace => {
                if self.filter.pop().is_some() {
                    self.refilter();
                }
            }
            PickerAction::ClearFilter => {
                self.filter.clear();
                self.refilter();
            }
        }
        None
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.list
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    pub fn render(&mut self, frame: &mut Frame, placeholder: &str) {
        let area = Layout::centered(frame.area(), 80);
        let (input_area, list_area, status_area) = Layout::picker(area);

        let input = if self.filter.is_empty() {
            Line::from(Span::styled("type to filter", Theme::text_dim()))
        } else {
            Line::from(Span::styled(self.filter.clone(), Theme::text()))
        };
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(" Filter ", Theme::title()));
        frame.render_widget(Paragraph::new(input).block(input_block), input_area);

        let selector = ListSelector::new(placeholder).items(self.visible(), &self.filter);
        frame.render_stateful_widget(selector, list_area, &mut self.list);

        let counter = format!("{}/{}", self.visible.len(), self.items.len());
        frame.render_widget(
            StatusBar::new().hints(picker_hints()).right(counter),
            status_area,
        );
    }
}

/// Full-screen picker on the terminal
#[derive(Default)]
pub struct TuiPicker {
    keybindings: KeyBindings,
}

impl TuiPicker {
    pub fn new() -> Self {
        Self::default()
    }

    async fn run(&self, tui: &mut Tui, placeholder: &str, items: &[String]) -> Result<PickerOutcome> {
        let mut state = PickerState::new(items);
        let mut events = EventStream::new();

        loop {
            tui.terminal()
                .draw(|frame| state.render(frame, placeholder))?;

            let Some(event) = events.next().await else {
                return Ok(PickerOutcome::Dismissed);
            };

            // Release events arrive too on Windows
            if let Event::Key(key) = event? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = self.keybindings.get_action(&key) {
                    if let Some(outcome) = state.apply(action) {
                        return Ok(outcome);
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Picker for TuiPicker {
    async fn pick(&mut self, placeholder: &str, items: &[String]) -> Result<Option<String>> {
        let mut tui = Tui::new()?;
        let outcome = self.run(&mut tui, placeholder, items).await;
        tui.restore()?;

        match outcome? {
            PickerOutcome::Selected(item) => {
                debug!(placeholder, %item, "picked");
                Ok(Some(item))
            }
            PickerOutcome::Dismissed => Ok(None),
        }
    }
}
