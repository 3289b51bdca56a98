use iced::{
    widget::{
        container,
        scrollable::{Catalog, Rail, Scroller, Status, Style, StyleFn},
    },
    Border,
};

use super::Theme;

impl Catalog for Theme {
    type Class<'a> = StyleFn<'a, Self>;

    fn default<'a>() -> Self::Class<'a> {
        Box::new(primary)
    }

    fn style(&self, class: &Self::Class<'_>, status: Status) -> Style {
        class(self, status)
    }
}

fn rail(theme: &Theme) -> Rail {
    Rail {
        background: None,
        border: Border::default(),
        scroller: Scroller {
            color: theme.colors.general.scrollable,
            border: Border {
                radius: 10.0.into(),
                ..Default::default()
            },
        },
    }
}

pub fn primary(theme: &Theme, _status: Status) -> Style {
    Style {
        container: container::Style::default(),
        vertical_rail: rail(theme),
        horizontal_rail: rail(theme),
        gap: None,
    }
}
