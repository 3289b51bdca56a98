use iced::{
    widget::overlay::menu::{Catalog, Style, StyleFn},
    Border,
};

use super::Theme;

impl Catalog for Theme {
    type Class<'a> = StyleFn<'a, Self>;

    fn default<'a>() -> <Self as Catalog>::Class<'a> {
        Box::new(kind_menu)
    }

    fn style(&self, class: &<Self as Catalog>::Class<'_>) -> Style {
        class(self)
    }
}

/// Dropdown of the keystore type list.
pub fn kind_menu(theme: &Theme) -> Style {
    let menus = theme.colors.menus;
    Style {
        text_color: menus.entry.text,
        background: menus.entry.background.into(),
        selected_text_color: menus.selected.text,
        selected_background: menus.selected.background.into(),
        border: menus
            .entry
            .border
            .map(|color| Border {
                radius: 15.0.into(),
                width: 1.0,
                color,
            })
            .unwrap_or_default(),
    }
}
