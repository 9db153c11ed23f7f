/// Views
///
/// Every function here borrows the gallery state and builds widgets; none
/// of them change anything. User input comes back as `Message`s.
///
/// - `grid.rs` - thumbnail grid of the filtered catalog
/// - `albums.rs` - smart category tiles
/// - `detail.rs` - single photo with the magic-edit panel

pub mod albums;
pub mod detail;
pub mod grid;

use iced::widget::{button, column, container, horizontal_space, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::state::gallery::{Notice, NoticeKind};
use crate::state::Tab;
use crate::Message;

/// Title, upload button and search field
pub fn header(search_query: &str, uploading: bool) -> Element<'_, Message> {
    let upload = button(text(if uploading { "Uploading..." } else { "+ Upload" }))
        .padding(10)
        .on_press_maybe((!uploading).then_some(Message::UploadPressed));

    let search = text_input("Search people, places, things...", search_query)
        .on_input(Message::SearchChanged)
        .padding(10);

    column![
        row![text("Photos").size(32), horizontal_space(), upload].align_y(Alignment::Center),
        search,
    ]
    .spacing(12)
    .padding(20)
    .into()
}

/// Bottom navigation between Gallery and Albums
pub fn tab_bar(active: Tab) -> Element<'static, Message> {
    let tab = |label: &'static str, target: Tab| {
        let style = if active == target {
            button::primary
        } else {
            button::secondary
        };
        button(text(label))
            .padding([8, 24])
            .style(style)
            .on_press(Message::TabSelected(target))
    };

    container(row![tab("Gallery", Tab::Grid), tab("Albums", Tab::Albums)].spacing(40))
        .width(Length::Fill)
        .padding(12)
        .center_x(Length::Fill)
        .into()
}

/// Dismissable toast for the latest notice
pub fn notice_bar(notice: &Notice) -> Element<'_, Message> {
    let message = match notice.kind {
        NoticeKind::Info => text(&notice.message).style(text::success),
        NoticeKind::Error => text(&notice.message).style(text::danger),
    };

    container(
        row![
            message,
            horizontal_space(),
            button(text("Dismiss"))
                .style(button::text)
                .on_press(Message::DismissNotice),
        ]
        .align_y(Alignment::Center),
    )
    .padding(10)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}
