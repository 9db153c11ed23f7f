use iced::widget::{button, column, scrollable, text, Column, Row};
use iced::{Element, Length};

use crate::state::Catalog;
use crate::Message;

/// Categories offered as smart albums
pub const SMART_CATEGORIES: [&str; 4] = ["Nature", "Architecture", "People", "Other"];

/// Smart category tiles with photo counts, two per row
pub fn view(catalog: &Catalog) -> Element<'_, Message> {
    let rows: Vec<Element<Message>> = SMART_CATEGORIES
        .chunks(2)
        .map(|pair| {
            Row::with_children(pair.iter().map(|category| album(catalog, *category)))
                .spacing(16)
                .into()
        })
        .collect();

    scrollable(
        column![
            text("Smart Categories").size(24),
            Column::with_children(rows).spacing(16),
        ]
        .spacing(16)
        .padding(24),
    )
    .height(Length::Fill)
    .into()
}

fn album<'a>(catalog: &Catalog, category: &'static str) -> Element<'a, Message> {
    let count = catalog.count_in_category(category);

    button(
        column![
            text(category).size(18),
            text(format!("{} photos", count)).size(12),
        ]
        .spacing(4),
    )
    .width(Length::Fill)
    .height(128.0)
    .padding(16)
    .style(button::secondary)
    .on_press(Message::CategoryChosen(category.to_string()))
    .into()
}
