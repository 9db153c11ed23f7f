use iced::widget::{button, column, container, image, row, scrollable, text, text_input, Row};
use iced::{ContentFit, Element, Length};

use crate::state::gallery::EditSession;
use crate::state::PhotoRecord;
use crate::Message;

/// Single photo with its metadata and the magic-edit panel
pub fn view<'a>(
    photo: &'a PhotoRecord,
    handle: Option<&image::Handle>,
    editor: Option<&'a EditSession>,
    editing: bool,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match handle {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
        None => text("Image unavailable").into(),
    };

    let photo_area = column![
        button(text("✕ Close"))
            .style(button::secondary)
            .on_press(Message::CloseDetail),
        picture,
    ]
    .spacing(12)
    .padding(16)
    .width(Length::FillPortion(2))
    .height(Length::Fill);

    let mut chips = Row::new()
        .spacing(8)
        .push(text(&photo.category).style(text::primary));
    for tag in &photo.tags {
        chips = chips.push(text(format!("#{}", tag)));
    }

    let mut info = column![
        text(&photo.title).size(26),
        text(photo.created_at.format("%b %-d, %Y").to_string()).size(13),
        chips,
        text(format!("\"{}\"", photo.description)),
    ]
    .spacing(12);

    if photo.ai_generated {
        info = info.push(text("⚡ AI edited").size(12).style(text::primary));
    }

    let panel = column![
        scrollable(info).height(Length::Fill),
        actions(photo, editor, editing),
    ]
    .spacing(16)
    .padding(24)
    .width(Length::FillPortion(1))
    .height(Length::Fill);

    row![photo_area, container(panel).style(container::rounded_box)]
        .height(Length::Fill)
        .into()
}

/// Magic-edit and delete buttons, or the prompt form while editing
fn actions<'a>(
    photo: &'a PhotoRecord,
    editor: Option<&'a EditSession>,
    editing: bool,
) -> Element<'a, Message> {
    match editor {
        None => column![
            button(text("AI Magic Edit"))
                .width(Length::Fill)
                .padding(12)
                .style(button::primary)
                .on_press(Message::OpenEditor),
            button(text("Delete Photo"))
                .width(Length::Fill)
                .padding(12)
                .style(button::danger)
                .on_press(Message::DeletePressed(photo.id.clone())),
        ]
        .spacing(12)
        .into(),
        Some(session) => {
            let prompt = text_input(
                "e.g., 'Add a dramatic sunset background' or 'Change the car to red'",
                &session.prompt,
            )
            .on_input(Message::PromptChanged)
            .on_submit(Message::ApplyEdit)
            .padding(10);

            let apply_label = if editing { "Processing..." } else { "Apply AI" };
            let can_apply = !editing && !session.prompt.trim().is_empty();

            column![
                text("AI PROMPT").size(12).style(text::primary),
                prompt,
                row![
                    button(text(apply_label))
                        .width(Length::Fill)
                        .style(button::primary)
                        .on_press_maybe(can_apply.then_some(Message::ApplyEdit)),
                    button(text("Cancel"))
                        .style(button::secondary)
                        .on_press(Message::CancelEdit),
                ]
                .spacing(8),
            ]
            .spacing(12)
            .into()
        }
    }
}
