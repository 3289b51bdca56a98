use super::text::text;
use crate::font::MEDIUM;
use crate::{theme, widget::*};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::container;

pub fn primary<'a, T: 'a>(t: &'static str) -> Button<'a, T> {
    Button::new(content(
        text(t)
            .font(MEDIUM)
            .align_y(iced::Alignment::Center)
            .align_x(iced::Alignment::Center),
    ))
    .style(theme::button::primary)
}

pub fn secondary<'a, T: 'a>(t: &'static str) -> Button<'a, T> {
    Button::new(content(
        text(t)
            .align_y(iced::Alignment::Center)
            .align_x(iced::Alignment::Center),
    ))
    .style(theme::button::secondary)
}

pub fn transparent<'a, T: 'a>(t: &'static str) -> Button<'a, T> {
    Button::new(container(text(t)).align_y(Vertical::Center).padding(5))
        .style(theme::button::transparent)
}

/// Entry of a menu, `active` for the one currently displayed.
pub fn menu<'a, T: 'a>(t: Text<'a>, active: bool) -> Button<'a, T> {
    Button::new(container(t).padding(5).align_y(Vertical::Center))
        .width(iced::Length::Fill)
        .style(if active {
            theme::button::menu_pressed
        } else {
            theme::button::menu
        })
}

fn content<'a, T: 'a>(text: Text<'a>) -> Container<'a, T> {
    container(text)
        .align_y(Vertical::Center)
        .align_x(Horizontal::Center)
        .padding(5)
}
