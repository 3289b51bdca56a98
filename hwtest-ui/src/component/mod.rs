pub mod button;
pub mod card;
pub mod notification;
pub mod text;

use iced::Length;

use crate::{theme, widget::*};

pub fn separation<'a, T: 'a>() -> Container<'a, T> {
    Container::new(Column::new().push(text::text(" ")))
        .style(theme::card::border)
        .height(Length::Fixed(1.0))
        .width(Length::Fill)
}

/// A selectable value displayed as monospace text.
pub fn code<'a, T: 'a>(content: impl std::fmt::Display) -> Container<'a, T> {
    Container::new(text::monospace(content))
        .padding(10)
        .width(Length::Fill)
        .style(theme::container::foreground)
}
