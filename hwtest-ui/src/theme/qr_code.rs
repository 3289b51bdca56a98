use iced::widget::qr_code::{Catalog, Style, StyleFn};

use super::Theme;

impl Catalog for Theme {
    type Class<'a> = StyleFn<'a, Self>;

    fn default<'a>() -> Self::Class<'a> {
        Box::new(request)
    }

    fn style(&self, class: &Self::Class<'_>) -> Style {
        class(self)
    }
}

/// QR code of a keystore request.
pub fn request(theme: &Theme) -> Style {
    Style {
        background: theme.colors.qr_codes.background,
        cell: theme.colors.qr_codes.cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[test]
    fn dark_cells_on_light_background() {
        let style = request(&<Theme as Default>::default());
        assert_eq!(style.background, color::WHITE);
        assert_eq!(style.cell, color::BLACK);
    }
}
