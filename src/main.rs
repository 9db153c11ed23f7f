use chrono::Utc;
use iced::widget::{column, image};
use iced::{Element, Length, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod ai;
mod config;
mod encode;
mod error;
mod pipeline;
mod state;
mod ui;

use ai::{Gateway, GeminiGateway};
use config::GalleryConfig;
use error::EncodeError;
use pipeline::{EditCompletion, PreparedUpload};
use state::{Catalog, EditReport, GalleryState, Library, PhotoId, Tab};

/// Extensions offered by the upload picker
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Main application state
struct Gallery {
    /// Catalog, selection, search and busy flags
    state: GalleryState,
    /// Remote model for analysis and magic edits
    gateway: Arc<dyn Gateway>,
    /// On-disk copy of the catalog, when persistence is enabled
    library: Option<Library>,
    /// Decoded-image handles, keyed by photo
    thumbnails: HashMap<PhotoId, image::Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the upload button
    UploadPressed,
    /// Background encode + analysis finished
    UploadPrepared(Result<PreparedUpload, EncodeError>),
    SearchChanged(String),
    TabSelected(Tab),
    /// A smart album was chosen on the Albums tab
    CategoryChosen(String),
    PhotoSelected(PhotoId),
    CloseDetail,
    DeletePressed(PhotoId),
    OpenEditor,
    PromptChanged(String),
    ApplyEdit,
    CancelEdit,
    /// Background magic edit finished
    EditFinished(EditCompletion),
    DismissNotice,
}

impl Gallery {
    /// Create a new instance of the application
    fn new(gateway: Arc<dyn Gateway>, library: Option<Library>) -> (Self, Task<Message>) {
        let catalog = match &library {
            Some(library) => match library.load_photos() {
                Ok(photos) => Catalog::from_records(photos),
                Err(err) => {
                    tracing::error!("❌ Could not load library: {}", err);
                    Catalog::new()
                }
            },
            None => Catalog::new(),
        };

        tracing::info!("🎨 Photo gallery initialized with {} photos", catalog.len());

        let mut gallery = Gallery {
            state: GalleryState::from_catalog(catalog),
            gateway,
            library,
            thumbnails: HashMap::new(),
        };
        let ids: Vec<PhotoId> = gallery.state.catalog().iter().map(|p| p.id.clone()).collect();
        for id in &ids {
            gallery.refresh_thumbnail(id);
        }

        (gallery, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadPressed => {
                if !self.state.begin_upload() {
                    return Task::none();
                }

                // Show the native file picker
                let file = FileDialog::new()
                    .set_title("Choose a Photo")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => {
                        tracing::info!("⏳ Uploading {}", path.display());
                        Task::perform(
                            pipeline::prepare_upload(self.gateway.clone(), path),
                            Message::UploadPrepared,
                        )
                    }
                    None => {
                        self.state.cancel_upload();
                        Task::none()
                    }
                }
            }
            Message::UploadPrepared(upload) => {
                let report = self
                    .state
                    .complete_upload(upload, PhotoId::generate(), Utc::now());

                if let Some(id) = report.added() {
                    self.refresh_thumbnail(id);
                    self.persist(id);
                }
                Task::none()
            }
            Message::SearchChanged(query) => {
                self.state.set_search_query(query);
                Task::none()
            }
            Message::TabSelected(tab) => {
                self.state.set_tab(tab);
                Task::none()
            }
            Message::CategoryChosen(category) => {
                self.state.show_category(&category);
                Task::none()
            }
            Message::PhotoSelected(id) => {
                self.state.select(&id);
                Task::none()
            }
            Message::CloseDetail => {
                self.state.close_detail();
                Task::none()
            }
            Message::DeletePressed(id) => {
                let confirmed = MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title("Delete Photo")
                    .set_description("Are you sure you want to delete this photo?")
                    .set_buttons(MessageButtons::YesNo)
                    .show();

                if matches!(confirmed, MessageDialogResult::Yes) && self.state.delete(&id).is_some() {
                    self.thumbnails.remove(&id);
                    if let Some(library) = &self.library {
                        if let Err(err) = library.delete_photo(&id) {
                            tracing::error!("❌ Could not delete {} from library: {}", id, err);
                        }
                    }
                }
                Task::none()
            }
            Message::OpenEditor => {
                self.state.open_editor();
                Task::none()
            }
            Message::PromptChanged(prompt) => {
                self.state.set_prompt(prompt);
                Task::none()
            }
            Message::ApplyEdit => match self.state.begin_edit() {
                Some(request) => Task::perform(
                    pipeline::run_edit(self.gateway.clone(), request),
                    Message::EditFinished,
                ),
                None => Task::none(),
            },
            Message::CancelEdit => {
                self.state.cancel_edit();
                Task::none()
            }
            Message::EditFinished(completion) => {
                let id = completion.id.clone();
                if self.state.complete_edit(completion) == EditReport::Applied {
                    self.refresh_thumbnail(&id);
                    self.persist(&id);
                }
                Task::none()
            }
            Message::DismissNotice => {
                self.state.dismiss_notice();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body: Element<Message> = match self.state.selected_photo() {
            Some(photo) => ui::detail::view(
                photo,
                self.thumbnails.get(&photo.id),
                self.state.editor(),
                self.state.is_editing(&photo.id),
            ),
            None => {
                let view = self.state.view();
                let tab: Element<Message> = match view.active_tab {
                    Tab::Grid => ui::grid::view(self.state.visible(), &self.thumbnails),
                    Tab::Albums => ui::albums::view(self.state.catalog()),
                };

                column![
                    ui::header(&view.search_query, self.state.is_uploading()),
                    tab,
                    ui::tab_bar(view.active_tab),
                ]
                .height(Length::Fill)
                .into()
            }
        };

        match self.state.notice() {
            Some(notice) => column![ui::notice_bar(notice), body].into(),
            None => body,
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }

    /// Rebuild the cached image handle after a photo's image changed
    fn refresh_thumbnail(&mut self, id: &PhotoId) {
        if let Some(photo) = self.state.catalog().get(id) {
            let handle = image::Handle::from_bytes(photo.image.bytes().to_vec());
            self.thumbnails.insert(id.clone(), handle);
        }
    }

    /// Mirror a photo to the library, if persistence is enabled
    fn persist(&self, id: &PhotoId) {
        let (Some(library), Some(photo)) = (&self.library, self.state.catalog().get(id)) else {
            return;
        };
        if let Err(err) = library.save_photo(photo) {
            tracing::error!("❌ Could not save {} to library: {}", id, err);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("photo_gallery=info")),
        )
        .init();

    let config = GalleryConfig::load().unwrap_or_else(|err| {
        tracing::error!("❌ {}; using defaults", err);
        GalleryConfig::default()
    });

    let gateway: Arc<dyn Gateway> = Arc::new(GeminiGateway::new(&config.gemini)?);

    let library = if config.library.persist {
        match Library::open(&config.library.db_path()) {
            Ok(library) => {
                if let Ok(count) = library.photo_count() {
                    tracing::info!("📚 {} photos in {}", count, library.path().display());
                }
                Some(library)
            }
            Err(err) => {
                tracing::error!("❌ Library unavailable, keeping photos in memory only: {}", err);
                None
            }
        }
    } else {
        None
    };

    iced::application("Photos", Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .centered()
        .run_with(move || Gallery::new(gateway, library))?;

    Ok(())
}
