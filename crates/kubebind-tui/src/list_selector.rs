use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::theme::Theme;

/// List of picker items with the filter match emphasised
pub struct ListSelector<'a> {
    items: Vec<ListItem<'a>>,
    title: &'a str,
    highlight_symbol: &'a str,
}

impl<'a> ListSelector<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            items: Vec::new(),
            title,
            highlight_symbol: "▶ ",
        }
    }

    /// Items to show, highlighting the first case-insensitive match of `filter`
    pub fn items<I, S>(mut self, items: I, filter: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items
            .into_iter()
            .map(|text| ListItem::new(highlight_match(text.into(), filter)))
            .collect();
        self
    }
}

fn highlight_match(text: String, filter: &str) -> Line<'static> {
    if filter.is_empty() {
        return Line::from(Span::styled(text, Theme::list_item()));
    }

    // Offsets from the lowercased text only line up when lowercasing kept the length
    let lowered = text.to_lowercase();
    let needle = filter.to_lowercase();
    let range = lowered
        .find(&needle)
        .map(|start| (start, start + needle.len()))
        .filter(|&(start, end)| {
            lowered.len() == text.len() && text.is_char_boundary(start) && text.is_char_boundary(end)
        });
    let Some((start, end)) = range else {
        return Line::from(Span::styled(text, Theme::list_item()));
    };

    Line::from(vec![
        Span::styled(text[..start].to_string(), Theme::list_item()),
        Span::styled(text[start..end].to_string(), Theme::text_match()),
        Span::styled(text[end..].to_string(), Theme::list_item()),
    ])
}

impl StatefulWidget for ListSelector<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(self.title, Theme::title()));

        let list = List::new(self.items)
            .block(block)
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol(self.highlight_symbol);

        StatefulWidget::render(list, area, buf, state);
    }
}
