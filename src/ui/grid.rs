use iced::widget::{button, column, container, image, scrollable, text};
use iced::{ContentFit, Element, Length};
use iced_aw::Wrap;
use std::collections::HashMap;

use crate::state::{PhotoId, PhotoRecord};
use crate::Message;

/// Edge length of a grid tile
const TILE_SIZE: f32 = 160.0;

/// Thumbnail grid of the photos currently matching the search
pub fn view<'a>(
    photos: impl Iterator<Item = &'a PhotoRecord>,
    thumbnails: &'a HashMap<PhotoId, image::Handle>,
) -> Element<'a, Message> {
    let tiles: Vec<Element<'a, Message>> = photos
        .map(|photo| tile(photo, thumbnails.get(&photo.id)))
        .collect();

    if tiles.is_empty() {
        return container(text("No photos found").size(18))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    scrollable(Wrap::with_elements(tiles).spacing(4.0).line_spacing(4.0))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn tile<'a>(photo: &'a PhotoRecord, handle: Option<&image::Handle>) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match handle {
        Some(handle) => image(handle.clone())
            .width(TILE_SIZE)
            .height(TILE_SIZE)
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text(&photo.title))
            .width(TILE_SIZE)
            .height(TILE_SIZE)
            .center_x(TILE_SIZE)
            .center_y(TILE_SIZE)
            .into(),
    };

    // Lightning badge for photos produced by a magic edit
    let caption = if photo.ai_generated {
        text(format!("⚡ {}", photo.title)).size(12)
    } else {
        text(&photo.title).size(12)
    };

    button(column![picture, caption].spacing(2).width(TILE_SIZE))
        .padding(0)
        .style(button::text)
        .on_press(Message::PhotoSelected(photo.id.clone()))
        .into()
}
