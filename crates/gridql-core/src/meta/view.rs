use super::{ColumnId, Filter, Sort};

use indexmap::IndexMap;

/// A view over a table: an ordered visibility map plus persisted filters
/// and sorts.
#[derive(Debug, Default)]
pub struct View {
    /// Ordered map from column to shown/hidden. An empty map shows every
    /// column.
    pub visible: IndexMap<ColumnId, bool>,

    pub filters: Vec<Filter>,

    pub sorts: Vec<Sort>,
}

impl View {
    pub fn shows(&self, id: ColumnId) -> bool {
        if self.visible.is_empty() {
            true
        } else {
            self.visible.get(&id).copied().unwrap_or(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::TableId;

    fn column_id(index: usize) -> ColumnId {
        ColumnId {
            table: TableId(0),
            index,
        }
    }

    #[test]
    fn empty_visibility_shows_everything() {
        let view = View::default();
        assert!(view.shows(column_id(0)));
        assert!(view.shows(column_id(7)));
    }

    #[test]
    fn unlisted_columns_are_hidden() {
        let mut view = View::default();
        view.visible.insert(column_id(0), true);
        view.visible.insert(column_id(1), false);

        assert!(view.shows(column_id(0)));
        assert!(!view.shows(column_id(1)));
        assert!(!view.shows(column_id(2)));
    }
}
