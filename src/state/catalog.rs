use super::data::{PhotoId, PhotoRecord};

/// The Catalog owns every photo in the gallery, newest first.
///
/// Outside code only ever borrows records; changes go through
/// `insert`, `update_by_id` and `delete_by_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    photos: Vec<PhotoRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records already in newest-first order
    pub fn from_records(photos: Vec<PhotoRecord>) -> Self {
        Self { photos }
    }

    /// Prepend a record. The caller guarantees its id is not already present.
    pub fn insert(&mut self, record: PhotoRecord) {
        debug_assert!(!self.contains(&record.id), "duplicate photo id {}", record.id);
        self.photos.insert(0, record);
    }

    /// Replace the record with the given id, keeping its position.
    ///
    /// `record.id` must equal `id`. The stored `created_at` is kept.
    /// Returns false (and changes nothing) when no record matches.
    pub fn update_by_id(&mut self, id: &PhotoId, mut record: PhotoRecord) -> bool {
        if record.id != *id {
            return false;
        }

        match self.photos.iter_mut().find(|photo| photo.id == *id) {
            Some(slot) => {
                record.created_at = slot.created_at;
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove the record with the given id, returning it
    pub fn delete_by_id(&mut self, id: &PhotoId) -> Option<PhotoRecord> {
        let index = self.photos.iter().position(|photo| photo.id == *id)?;
        Some(self.photos.remove(index))
    }

    /// Records matching a search query, in catalog order.
    ///
    /// An empty or whitespace-only query matches everything. Otherwise a
    /// record matches when the lowercase query is a substring of its
    /// lowercase title, description, category or any tag.
    pub fn filter<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a PhotoRecord> + 'a {
        let needle = if query.trim().is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };

        self.photos.iter().filter(move |photo| match &needle {
            Some(needle) => photo.matches(needle),
            None => true,
        })
    }

    pub fn get(&self, id: &PhotoId) -> Option<&PhotoRecord> {
        self.photos.iter().find(|photo| photo.id == *id)
    }

    pub fn contains(&self, id: &PhotoId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.photos.iter()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Number of photos whose category is exactly `category`
    pub fn count_in_category(&self, category: &str) -> usize {
        self.photos.iter().filter(|photo| photo.category == category).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use chrono::{TimeZone, Utc};

    fn photo(id: &str, title: &str, tags: &[&str]) -> PhotoRecord {
        PhotoRecord {
            id: PhotoId::from(id),
            image: encode(id.as_bytes().to_vec(), "image/jpeg"),
            title: title.to_string(),
            description: format!("{} description", title),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            category: "Other".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            ai_generated: false,
        }
    }

    fn ids<'a>(records: impl Iterator<Item = &'a PhotoRecord>) -> Vec<&'a str> {
        records.map(|photo| photo.id.as_str()).collect()
    }

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(photo("b", "Neon Nights", &["city"]));
        catalog.insert(photo("a", "Morning Mist", &["nature"]));
        catalog
    }

    #[test]
    fn test_insert_prepends() {
        let mut catalog = sample_catalog();
        assert_eq!(ids(catalog.iter()), vec!["a", "b"]);

        catalog.insert(photo("c", "Fresh", &[]));
        assert_eq!(ids(catalog.iter()), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let catalog = sample_catalog();
        assert_eq!(ids(catalog.filter("")), vec!["a", "b"]);
        assert_eq!(ids(catalog.filter("   \t")), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_on_tags() {
        let catalog = sample_catalog();
        assert_eq!(ids(catalog.filter("NATURE")), vec!["a"]);
        assert_eq!(ids(catalog.filter("CiTy")), vec!["b"]);
    }

    #[test]
    fn test_filter_matches_each_field() {
        let mut catalog = sample_catalog();
        let mut categorized = photo("c", "Plain", &[]);
        categorized.category = "Architecture".to_string();
        catalog.insert(categorized);

        assert_eq!(ids(catalog.filter("mist")), vec!["a"]);
        assert_eq!(ids(catalog.filter("NIGHTS DESC")), vec!["b"]);
        assert_eq!(ids(catalog.filter("archi")), vec!["c"]);
        assert_eq!(ids(catalog.filter("description")), vec!["c", "a", "b"]);
        assert!(ids(catalog.filter("zebra")).is_empty());
    }

    #[test]
    fn test_filter_does_not_tokenize() {
        let catalog = sample_catalog();
        // Substring containment: word order matters
        assert!(ids(catalog.filter("mist morning")).is_empty());
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut catalog = sample_catalog();
        let mut renamed = photo("b", "Renamed", &["city"]);
        renamed.created_at = Utc::now();

        assert!(catalog.update_by_id(&PhotoId::from("b"), renamed));
        assert_eq!(ids(catalog.iter()), vec!["a", "b"]);

        let stored = catalog.get(&PhotoId::from("b")).unwrap();
        assert_eq!(stored.title, "Renamed");
        assert_eq!(stored.created_at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut catalog = sample_catalog();
        let before = catalog.clone();

        assert!(!catalog.update_by_id(&PhotoId::from("zzz"), photo("zzz", "Ghost", &[])));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_update_with_mismatched_id_is_noop() {
        let mut catalog = sample_catalog();
        let before = catalog.clone();

        assert!(!catalog.update_by_id(&PhotoId::from("a"), photo("b", "Swap", &[])));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_delete_keeps_relative_order() {
        let mut catalog = sample_catalog();
        catalog.insert(photo("c", "Third", &[]));

        let removed = catalog.delete_by_id(&PhotoId::from("a")).unwrap();
        assert_eq!(removed.id.as_str(), "a");
        assert_eq!(ids(catalog.iter()), vec!["c", "b"]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut catalog = sample_catalog();
        let before = catalog.clone();

        assert!(catalog.delete_by_id(&PhotoId::from("zzz")).is_none());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_filter_never_mutates() {
        let catalog = sample_catalog();
        let before = catalog.clone();
        let _ = catalog.filter("nature").count();
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_count_in_category_is_exact() {
        let mut catalog = sample_catalog();
        let mut nature = photo("c", "Forest", &[]);
        nature.category = "Nature".to_string();
        catalog.insert(nature);

        assert_eq!(catalog.count_in_category("Other"), 2);
        assert_eq!(catalog.count_in_category("Nature"), 1);
        assert_eq!(catalog.count_in_category("nature"), 0);
    }
}
