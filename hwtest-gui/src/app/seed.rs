use hwtest::{
    keystore::KeystoreKind,
    seed::{groups, simulator_command, WordGroup, TEST_PHRASE},
};
use hwtest_ui::{
    component::{card, code, text},
    theme,
    widget::*,
};
use iced::Length;

fn group<'a, M: 'a>(group: &WordGroup) -> Column<'a, M> {
    group
        .words
        .iter()
        .enumerate()
        .fold(Column::new().spacing(5), |col, (i, word)| {
            col.push(
                Row::new()
                    .spacing(5)
                    .push(
                        text::p1_regular(format!("{}.", group.start + i))
                            .style(theme::text::secondary)
                            .width(Length::Fixed(30.0)),
                    )
                    .push(text::p1_bold(*word)),
            )
        })
        .width(Length::FillPortion(1))
}

/// The phrase every keystore under test must be loaded with.
pub fn view<'a, M: 'a>(kind: Option<KeystoreKind>) -> Element<'a, M> {
    let mut col = Column::new()
        .spacing(15)
        .push(text::h4_bold("Test seed"))
        .push(
            text::p2_regular(
                "Load this seed on the keystore before running the tests. \
                 Never use it to store funds.",
            )
            .style(theme::text::warning),
        )
        .push(
            groups(&TEST_PHRASE)
                .iter()
                .fold(Row::new().spacing(20), |row, g| row.push(group(g))),
        );

    if let Some(command) = simulator_command(kind, &TEST_PHRASE) {
        col = col
            .push(text::p2_regular(
                "Or start the Coldcard simulator with this seed:",
            ))
            .push(code(command));
    }

    card::simple(col).width(Length::Fill).into()
}
