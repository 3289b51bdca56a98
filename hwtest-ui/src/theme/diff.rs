use iced::widget::container::Style;
use iced::{Background, Border};

use super::palette::ContainerPalette;
use super::Theme;

fn segment(palette: &ContainerPalette) -> Style {
    Style {
        background: Some(Background::Color(palette.background)),
        text_color: palette.text,
        border: Border {
            radius: 4.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn added(theme: &Theme) -> Style {
    segment(&theme.colors.diffs.added)
}

pub fn removed(theme: &Theme) -> Style {
    segment(&theme.colors.diffs.removed)
}

pub fn common(theme: &Theme) -> Style {
    segment(&theme.colors.diffs.common)
}
