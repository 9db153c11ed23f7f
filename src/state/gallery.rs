/// The gallery state container
///
/// Owns the catalog and everything the UI needs to know about it. Views
/// borrow it; changes only happen through the methods here, which in turn
/// only touch the catalog through insert, update and delete.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::catalog::Catalog;
use super::data::{PhotoId, PhotoRecord};
use super::view::{Tab, ViewState};
use crate::ai::AnalysisResult;
use crate::encode::ImageData;
use crate::error::EncodeError;
use crate::pipeline::{EditCompletion, PreparedUpload};

/// Shown when an upload was added without an analysis
const ANALYSIS_FAILED: &str = "Failed to analyze image. It has been added with default info.";
/// Shown for every edit that did not produce a new image
const EDIT_FAILED: &str = "AI editing failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message for the user, shown until dismissed or replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// The magic-edit panel of the detail view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    pub prompt: String,
}

/// Everything a background edit needs
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub id: PhotoId,
    pub image: ImageData,
    pub instruction: String,
}

/// What happened to an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReport {
    /// Added with the gateway's title, description, tags and category
    Described(PhotoId),
    /// Added with placeholder text
    Placeholder(PhotoId),
    /// The file could not be read; nothing was added
    Aborted,
}

impl UploadReport {
    /// Id of the new record, if one was added
    pub fn added(&self) -> Option<&PhotoId> {
        match self {
            UploadReport::Described(id) | UploadReport::Placeholder(id) => Some(id),
            UploadReport::Aborted => None,
        }
    }
}

/// What happened to a magic edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditReport {
    /// The record now holds the edited image
    Applied,
    /// The model answered without an image; nothing changed
    NoImage,
    /// The gateway call failed; nothing changed
    Failed,
    /// The photo was deleted while the edit was running
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    catalog: Catalog,
    view: ViewState,
    /// Scoped to the upload control, not a global lock
    uploading: bool,
    editor: Option<EditSession>,
    /// Photos with an edit request out. Outlives the panel, so closing and
    /// reopening it cannot start a second edit of the same photo.
    editing: HashSet<PhotoId>,
    notice: Option<Notice>,
}

impl GalleryState {
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn editor(&self) -> Option<&EditSession> {
        self.editor.as_ref()
    }

    /// Whether an edit of this photo is still running
    pub fn is_editing(&self, id: &PhotoId) -> bool {
        self.editing.contains(id)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Photos matching the current search, re-derived on every call
    pub fn visible(&self) -> impl Iterator<Item = &PhotoRecord> {
        self.catalog.filter(&self.view.search_query)
    }

    pub fn selected_photo(&self) -> Option<&PhotoRecord> {
        self.view
            .selected
            .as_ref()
            .and_then(|id| self.catalog.get(id))
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.view.active_tab = tab;
    }

    pub fn set_search_query(&mut self, query: String) {
        self.view.search_query = query;
    }

    /// Search for a category and show the results
    pub fn show_category(&mut self, category: &str) {
        self.view.search_query = category.to_string();
        self.view.active_tab = Tab::Grid;
    }

    /// Open the detail view. Unknown ids are ignored.
    pub fn select(&mut self, id: &PhotoId) -> bool {
        if !self.catalog.contains(id) {
            return false;
        }
        if !self.view.is_selected(id) {
            self.editor = None;
        }
        self.view.selected = Some(id.clone());
        true
    }

    pub fn close_detail(&mut self) {
        self.view.selected = None;
        self.editor = None;
    }

    /// Mark an upload as started. Returns false if one is already running.
    pub fn begin_upload(&mut self) -> bool {
        if self.uploading {
            return false;
        }
        self.uploading = true;
        true
    }

    /// Release the upload control without adding anything (e.g. the picker was cancelled)
    pub fn cancel_upload(&mut self) {
        self.uploading = false;
    }

    /// Apply a finished upload.
    ///
    /// A readable file always produces a record: with the analysis when it
    /// is valid, otherwise with placeholder text and the image that was
    /// already encoded.
    pub fn complete_upload(
        &mut self,
        upload: Result<PreparedUpload, EncodeError>,
        id: PhotoId,
        created_at: DateTime<Utc>,
    ) -> UploadReport {
        self.uploading = false;

        let PreparedUpload { image, analysis } = match upload {
            Ok(upload) => upload,
            Err(err) => {
                tracing::error!("❌ Upload aborted: {}", err);
                self.notice = Some(Notice::error(format!("Could not read the selected file: {}", err)));
                return UploadReport::Aborted;
            }
        };

        let (record, report) = match analysis {
            Ok(AnalysisResult::Valid(analysis)) => (
                PhotoRecord::from_analysis(id.clone(), image, analysis, created_at),
                UploadReport::Described(id),
            ),
            Ok(AnalysisResult::Malformed) => {
                tracing::warn!("Analysis response was malformed; using placeholders for {}", id);
                self.notice = Some(Notice::error(ANALYSIS_FAILED));
                (
                    PhotoRecord::placeholder(id.clone(), image, created_at),
                    UploadReport::Placeholder(id),
                )
            }
            Err(err) => {
                tracing::warn!("Analysis failed ({}); using placeholders for {}", err, id);
                self.notice = Some(Notice::error(ANALYSIS_FAILED));
                (
                    PhotoRecord::placeholder(id.clone(), image, created_at),
                    UploadReport::Placeholder(id),
                )
            }
        };

        tracing::info!("📸 Added \"{}\" ({} photos)", record.title, self.catalog.len() + 1);
        self.catalog.insert(record);
        report
    }

    /// Show the magic-edit panel for the selected photo
    pub fn open_editor(&mut self) {
        if self.view.selected.is_some() && self.editor.is_none() {
            self.editor = Some(EditSession::default());
        }
    }

    pub fn set_prompt(&mut self, prompt: String) {
        if let Some(editor) = &mut self.editor {
            editor.prompt = prompt;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    /// Start an edit of the selected photo.
    ///
    /// Returns `None` (and changes nothing) when there is no selection or
    /// open editor, the prompt is blank, or an edit of the photo is
    /// already out. The prompt is sent as typed.
    pub fn begin_edit(&mut self) -> Option<EditRequest> {
        let id = self.view.selected.clone()?;
        let photo = self.catalog.get(&id)?;
        let editor = self.editor.as_ref()?;

        if self.editing.contains(&id) || editor.prompt.trim().is_empty() {
            return None;
        }

        let request = EditRequest {
            id: id.clone(),
            image: photo.image.clone(),
            instruction: editor.prompt.clone(),
        };
        self.editing.insert(id);
        Some(request)
    }

    /// Apply a finished edit.
    ///
    /// Success replaces the image, marks the photo AI-generated, appends
    /// the instruction to the description and closes the panel. Anything
    /// else leaves the photo untouched and the panel open.
    pub fn complete_edit(&mut self, completion: EditCompletion) -> EditReport {
        let EditCompletion { id, instruction, result } = completion;
        let for_open_editor = self.view.is_selected(&id);
        self.editing.remove(&id);

        match result {
            Ok(Some(image)) => {
                let Some(current) = self.catalog.get(&id) else {
                    tracing::info!("Dropping edit for deleted photo {}", id);
                    return EditReport::Stale;
                };

                let edited = current.with_ai_edit(image, &instruction);
                self.catalog.update_by_id(&id, edited);
                if for_open_editor {
                    self.editor = None;
                }
                self.notice = Some(Notice::info("✨ AI edit applied"));
                EditReport::Applied
            }
            Ok(None) => {
                tracing::warn!("Edit of {} returned no image", id);
                self.notice = Some(Notice::error(EDIT_FAILED));
                EditReport::NoImage
            }
            Err(err) => {
                tracing::warn!("Edit of {} failed: {}", id, err);
                self.notice = Some(Notice::error(EDIT_FAILED));
                EditReport::Failed
            }
        }
    }

    /// Delete a photo, clearing the selection if it was the one open
    pub fn delete(&mut self, id: &PhotoId) -> Option<PhotoRecord> {
        let removed = self.catalog.delete_by_id(id)?;

        if self.view.is_selected(id) {
            self.view.selected = None;
            self.editor = None;
        }

        tracing::info!("🗑️  Deleted \"{}\"", removed.title);
        Some(removed)
    }
}
