use crate::color;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub general: General,
    pub text: Text,
    pub buttons: Buttons,
    pub cards: Cards,
    pub notifications: Notifications,
    pub text_inputs: TextInputs,
    pub diffs: Diffs,
    pub menus: Menus,
    pub qr_codes: QrCodes,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Text {
    pub primary: iced::Color,
    pub secondary: iced::Color,
    pub warning: iced::Color,
    pub success: iced::Color,
    pub error: iced::Color,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct General {
    pub background: iced::Color,
    pub foreground: iced::Color,
    pub scrollable: iced::Color,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Buttons {
    pub primary: Button,
    pub secondary: Button,
    pub transparent: Button,
    pub menu: Button,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Button {
    pub active: ButtonPalette,
    pub hovered: ButtonPalette,
    pub pressed: Option<ButtonPalette>,
    pub disabled: Option<ButtonPalette>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ButtonPalette {
    pub background: iced::Color,
    pub text: iced::Color,
    pub border: Option<iced::Color>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContainerPalette {
    pub background: iced::Color,
    pub text: Option<iced::Color>,
    pub border: Option<iced::Color>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cards {
    pub simple: ContainerPalette,
    pub border: ContainerPalette,
    pub success: ContainerPalette,
    pub warning: ContainerPalette,
    pub error: ContainerPalette,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Notifications {
    pub error: ContainerPalette,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextInputs {
    pub primary: TextInput,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextInput {
    pub active: TextInputPalette,
    pub disabled: TextInputPalette,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextInputPalette {
    pub background: iced::Color,
    pub icon: iced::Color,
    pub placeholder: iced::Color,
    pub value: iced::Color,
    pub selection: iced::Color,
    pub border: Option<iced::Color>,
}

/// Backgrounds of the segments of a word diff.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Diffs {
    pub added: ContainerPalette,
    pub removed: ContainerPalette,
    pub common: ContainerPalette,
}

/// Dropdown of the pick lists, the hovered entry being the selected one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Menus {
    pub entry: ButtonPalette,
    pub selected: ButtonPalette,
}

/// Requests shown to QR-driven keystores need dark cells on a light background.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QrCodes {
    pub background: iced::Color,
    pub cell: iced::Color,
}

impl std::default::Default for Palette {
    fn default() -> Self {
        Self {
            general: General {
                background: color::LIGHT_BLACK,
                foreground: color::GREY_6,
                scrollable: color::GREY_7,
            },
            text: Text {
                primary: color::WHITE,
                secondary: color::GREY_2,
                warning: color::ORANGE,
                success: color::GREEN,
                error: color::RED,
            },
            buttons: Buttons {
                primary: Button {
                    active: ButtonPalette {
                        background: color::GREEN,
                        text: color::LIGHT_BLACK,
                        border: color::GREEN.into(),
                    },
                    hovered: ButtonPalette {
                        background: color::TRANSPARENT_GREEN,
                        text: color::GREEN,
                        border: color::GREEN.into(),
                    },
                    pressed: Some(ButtonPalette {
                        background: color::TRANSPARENT_GREEN,
                        text: color::GREEN,
                        border: color::GREEN.into(),
                    }),
                    disabled: Some(ButtonPalette {
                        background: color::GREY_5,
                        text: color::GREY_2,
                        border: color::GREY_4.into(),
                    }),
                },
                secondary: Button {
                    active: ButtonPalette {
                        background: color::GREY_6,
                        text: color::WHITE,
                        border: color::GREY_7.into(),
                    },
                    hovered: ButtonPalette {
                        background: color::GREY_6,
                        text: color::GREEN,
                        border: color::GREEN.into(),
                    },
                    pressed: Some(ButtonPalette {
                        background: color::GREY_6,
                        text: color::GREEN,
                        border: color::GREEN.into(),
                    }),
                    disabled: Some(ButtonPalette {
                        background: color::GREY_6,
                        text: color::GREY_3,
                        border: color::GREY_7.into(),
                    }),
                },
                transparent: Button {
                    active: ButtonPalette {
                        background: color::TRANSPARENT,
                        text: color::GREY_2,
                        border: None,
                    },
                    hovered: ButtonPalette {
                        background: color::TRANSPARENT,
                        text: color::WHITE,
                        border: None,
                    },
                    pressed: None,
                    disabled: None,
                },
                menu: Button {
                    active: ButtonPalette {
                        background: color::TRANSPARENT,
                        text: color::WHITE,
                        border: color::TRANSPARENT.into(),
                    },
                    hovered: ButtonPalette {
                        background: color::GREY_6,
                        text: color::WHITE,
                        border: color::TRANSPARENT.into(),
                    },
                    pressed: Some(ButtonPalette {
                        background: color::GREY_5,
                        text: color::GREEN,
                        border: color::TRANSPARENT.into(),
                    }),
                    disabled: None,
                },
            },
            cards: Cards {
                simple: ContainerPalette {
                    background: color::GREY_6,
                    text: None,
                    border: Some(color::GREY_7),
                },
                border: ContainerPalette {
                    background: color::TRANSPARENT,
                    text: None,
                    border: color::GREY_7.into(),
                },
                success: ContainerPalette {
                    background: color::GREY_6,
                    text: color::GREEN.into(),
                    border: color::GREEN.into(),
                },
                warning: ContainerPalette {
                    background: color::GREY_6,
                    text: color::ORANGE.into(),
                    border: color::ORANGE.into(),
                },
                error: ContainerPalette {
                    background: color::GREY_6,
                    text: color::RED.into(),
                    border: color::RED.into(),
                },
            },
            notifications: Notifications {
                error: ContainerPalette {
                    background: color::ORANGE,
                    text: color::LIGHT_BLACK.into(),
                    border: Some(color::ORANGE),
                },
            },
            text_inputs: TextInputs {
                primary: TextInput {
                    active: TextInputPalette {
                        background: color::GREY_6,
                        icon: color::TRANSPARENT,
                        placeholder: color::GREY_3,
                        value: color::WHITE,
                        selection: color::TRANSPARENT_GREEN,
                        border: Some(color::GREY_7),
                    },
                    disabled: TextInputPalette {
                        background: color::GREY_5,
                        icon: color::TRANSPARENT,
                        placeholder: color::GREY_4,
                        value: color::GREY_3,
                        selection: color::TRANSPARENT_GREEN,
                        border: Some(color::GREY_5),
                    },
                },
            },
            diffs: Diffs {
                added: ContainerPalette {
                    background: color::TRANSPARENT_GREEN,
                    text: color::WHITE.into(),
                    border: None,
                },
                removed: ContainerPalette {
                    background: color::TRANSPARENT_RED,
                    text: color::WHITE.into(),
                    border: None,
                },
                common: ContainerPalette {
                    background: color::TRANSPARENT,
                    text: None,
                    border: None,
                },
            },
            menus: Menus {
                entry: ButtonPalette {
                    background: color::GREY_6,
                    text: color::WHITE,
                    border: Some(color::GREY_7),
                },
                selected: ButtonPalette {
                    background: color::GREY_5,
                    text: color::GREEN,
                    border: None,
                },
            },
            qr_codes: QrCodes {
                background: color::WHITE,
                cell: color::BLACK,
            },
        }
    }
}
