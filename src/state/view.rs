use super::data::PhotoId;

/// Top-level tabs of the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Grid,
    Albums,
}

/// What the user is looking at
///
/// `selected` refers into the catalog by id; it never owns a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub selected: Option<PhotoId>,
    pub search_query: String,
}

impl ViewState {
    pub fn is_selected(&self, id: &PhotoId) -> bool {
        self.selected.as_ref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let view = ViewState::default();
        assert_eq!(view.active_tab, Tab::Grid);
        assert!(view.selected.is_none());
        assert!(view.search_query.is_empty());
    }
}
