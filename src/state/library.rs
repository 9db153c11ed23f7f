use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use super::data::{PhotoId, PhotoRecord};
use crate::encode::ImageData;
use crate::error::LibraryError;

/// The Library keeps a SQLite copy of the catalog between runs.
///
/// It is only used when `library.persist` is enabled. The in-memory
/// catalog stays authoritative; the library mirrors every change.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

/// One `photos` row before conversion
struct StoredPhoto {
    id: String,
    image_uri: String,
    title: String,
    description: String,
    tags_json: String,
    category: String,
    created_at: String,
    ai_generated: bool,
}

impl Library {
    /// Open (or create) the library database at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, LibraryError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        tracing::info!("📁 Library opened at: {}", db_path.display());

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// A throwaway library, for tests
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, LibraryError> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Creates the photos table if it doesn't exist.
    ///
    /// `seq` records insertion order so the catalog reloads newest first
    /// even when two photos share a timestamp.
    fn init_schema(&self) -> Result<(), LibraryError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS photos (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT NOT NULL UNIQUE,
                image_uri       TEXT NOT NULL,
                title           TEXT NOT NULL,
                description     TEXT NOT NULL,
                tags_json       TEXT NOT NULL,
                category        TEXT NOT NULL,
                created_at      TEXT NOT NULL,
                ai_generated    INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        tracing::debug!("✅ Library schema initialized");
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Get a count of photos in the library
    pub fn photo_count(&self) -> Result<i64, LibraryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a photo, or update it in place if its id is already stored.
    /// An update keeps the original `created_at` and position.
    pub fn save_photo(&self, photo: &PhotoRecord) -> Result<(), LibraryError> {
        let tags_json = serde_json::to_string(&photo.tags)?;

        self.conn.execute(
            "INSERT INTO photos
                (id, image_uri, title, description, tags_json, category, created_at, ai_generated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                image_uri = excluded.image_uri,
                title = excluded.title,
                description = excluded.description,
                tags_json = excluded.tags_json,
                category = excluded.category,
                ai_generated = excluded.ai_generated",
            params![
                photo.id.as_str(),
                photo.image.to_data_uri(),
                &photo.title,
                &photo.description,
                &tags_json,
                &photo.category,
                photo.created_at.to_rfc3339(),
                photo.ai_generated,
            ],
        )?;
        Ok(())
    }

    /// Remove a photo. Returns whether a row was deleted.
    pub fn delete_photo(&self, id: &PhotoId) -> Result<bool, LibraryError> {
        let deleted = self
            .conn
            .execute("DELETE FROM photos WHERE id = ?1", params![id.as_str()])?;
        Ok(deleted > 0)
    }

    /// Get all photos, newest first
    pub fn load_photos(&self) -> Result<Vec<PhotoRecord>, LibraryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, image_uri, title, description, tags_json, category, created_at, ai_generated
             FROM photos ORDER BY seq DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StoredPhoto {
                id: row.get(0)?,
                image_uri: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                tags_json: row.get(4)?,
                category: row.get(5)?,
                created_at: row.get(6)?,
                ai_generated: row.get(7)?,
            })
        })?;

        let mut photos = Vec::new();
        for row in rows {
            photos.push(row?.into_record()?);
        }

        tracing::info!("📚 Loaded {} photos from library", photos.len());
        Ok(photos)
    }
}

impl StoredPhoto {
    fn into_record(self) -> Result<PhotoRecord, LibraryError> {
        Ok(PhotoRecord {
            id: PhotoId::from(self.id),
            image: ImageData::from_data_uri(&self.image_uri)?,
            title: self.title,
            description: self.description,
            tags: serde_json::from_str(&self.tags_json)?,
            category: self.category,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)?.with_timezone(&Utc),
            ai_generated: self.ai_generated,
        })
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use chrono::TimeZone;

    fn photo(id: &str, minute: u32) -> PhotoRecord {
        PhotoRecord {
            id: PhotoId::from(id),
            image: encode(vec![0xFF, 0xD8, minute as u8], "image/jpeg"),
            title: format!("Photo {}", id),
            description: "Stored".to_string(),
            tags: vec!["one".to_string(), "two".to_string()],
            category: "Nature".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            ai_generated: false,
        }
    }

    #[test]
    fn test_round_trip_newest_first() {
        let library = Library::open_in_memory().unwrap();
        library.save_photo(&photo("first", 0)).unwrap();
        library.save_photo(&photo("second", 0)).unwrap();

        let loaded = library.load_photos().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], photo("second", 0));
        assert_eq!(loaded[1], photo("first", 0));
    }

    #[test]
    fn test_update_keeps_position_and_created_at() {
        let library = Library::open_in_memory().unwrap();
        library.save_photo(&photo("a", 1)).unwrap();
        library.save_photo(&photo("b", 2)).unwrap();

        let mut edited = photo("a", 59);
        edited.ai_generated = true;
        edited.description = "Stored (AI Edited: brighter)".to_string();
        library.save_photo(&edited).unwrap();

        let loaded = library.load_photos().unwrap();
        assert_eq!(library.photo_count().unwrap(), 2);
        assert_eq!(loaded[1].id.as_str(), "a");
        assert!(loaded[1].ai_generated);
        assert_eq!(loaded[1].image.bytes(), &[0xFF, 0xD8, 59]);
        assert_eq!(
            loaded[1].created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 1, 0).unwrap()
        );
    }

    #[test]
    fn test_delete() {
        let library = Library::open_in_memory().unwrap();
        library.save_photo(&photo("a", 0)).unwrap();

        assert!(library.delete_photo(&PhotoId::from("a")).unwrap());
        assert!(!library.delete_photo(&PhotoId::from("a")).unwrap());
        assert_eq!(library.photo_count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("gallery.db");

        {
            let library = Library::open(&db_path).unwrap();
            library.save_photo(&photo("kept", 3)).unwrap();
        }

        let library = Library::open(&db_path).unwrap();
        assert_eq!(library.path(), db_path.as_path());
        assert_eq!(library.load_photos().unwrap(), vec![photo("kept", 3)]);
    }
}
