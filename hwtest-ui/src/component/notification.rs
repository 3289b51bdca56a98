use crate::{
    color,
    component::{button, text},
    theme,
    widget::*,
};
use iced::{Alignment, Length};

/// A dismissable banner on top of the window.
pub fn error<'a, T: 'a + Clone>(message: &'a str, on_dismiss: T) -> Container<'a, T> {
    Container::new(
        Row::new()
            .push(
                Container::new(text::p1_bold(message).color(color::LIGHT_BLACK))
                    .width(Length::Fill),
            )
            .push(
                button::transparent("Dismiss")
                    .style(|_, _| iced::widget::button::Style {
                        text_color: color::LIGHT_BLACK,
                        ..Default::default()
                    })
                    .on_press(on_dismiss),
            )
            .align_y(Alignment::Center)
            .spacing(10),
    )
    .padding(10)
    .style(theme::notification::error)
    .width(Length::Fill)
}
