/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The in-memory photo catalog (catalog.rs)
/// - Tab, selection and search state (view.rs)
/// - The state container that applies uploads, edits and deletes (gallery.rs)
/// - The optional SQLite library (library.rs)

pub mod catalog;
pub mod data;
pub mod gallery;
pub mod library;
pub mod view;

pub use catalog::Catalog;
pub use data::{PhotoId, PhotoRecord};
pub use gallery::{EditReport, GalleryState};
pub use library::Library;
pub use view::Tab;
