//! Editing operations over a [`Document`].
//!
//! The editor's cursor is an explicit [`Selection`]: which main query is
//! current and, in CTE mode, which CTE. The member being edited inside a CTE
//! is tracked by the CTE itself. Operations that cannot apply return an
//! [`EditError`] and leave both the document and the selection unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::generator::generate;
use crate::model::{Cte, Document, Query};

/// Errors for rejected edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("cannot remove the only main query")]
    LastQuery,

    #[error("cannot remove the only query of CTE `{0}`")]
    LastCteQuery(String),

    #[error("query index {index} out of range ({len} queries)")]
    QueryOutOfRange { index: usize, len: usize },

    #[error("CTE index {index} out of range ({len} CTEs)")]
    CteOutOfRange { index: usize, len: usize },

    #[error("a CTE named `{0}` already exists")]
    DuplicateCteName(String),

    #[error("invalid CTE name `{0}`")]
    InvalidCteName(String),

    #[error("no CTE is selected")]
    NoCteSelected,
}

/// Result type for editing operations.
pub type Result<T> = std::result::Result<T, EditError>;

/// What the editor is pointing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Index of the current main query.
    pub query: usize,
    /// Index of the current CTE; `None` means main-query mode.
    pub cte: Option<usize>,
}

impl Selection {
    /// Returns true when a CTE is being edited.
    #[must_use]
    pub const fn in_cte(&self) -> bool {
        self.cte.is_some()
    }
}

/// Keeps `current` pointing at the same element after `removed` is taken
/// out of a list that now has `len` elements.
const fn shift_after_removal(current: usize, removed: usize, len: usize) -> usize {
    let current = if removed < current { current - 1 } else { current };
    if current >= len {
        len.saturating_sub(1)
    } else {
        current
    }
}

impl Document {
    /// Starts over with a fresh document and selection.
    pub fn reset(&mut self, selection: &mut Selection) {
        *self = Self::new();
        *selection = Selection::default();
    }

    /// Appends an empty main query, selects it and leaves CTE mode.
    pub fn add_query(&mut self, selection: &mut Selection) -> usize {
        let index = self.queries.len();
        self.queries.push(Query::named(format!("Query {}", index + 1)));
        *selection = Selection {
            query: index,
            cte: None,
        };
        debug!(index, "added query");
        index
    }

    /// Removes a main query. The last remaining one cannot be removed.
    ///
    /// # Errors
    ///
    /// [`EditError::LastQuery`] or [`EditError::QueryOutOfRange`].
    pub fn remove_query(&mut self, index: usize, selection: &mut Selection) -> Result<Query> {
        let len = self.queries.len();
        if index >= len {
            return Err(EditError::QueryOutOfRange { index, len });
        }
        if len == 1 {
            return Err(EditError::LastQuery);
        }
        let removed = self.queries.remove(index);
        selection.query = shift_after_removal(selection.query, index, self.queries.len());
        debug!(index, "removed query");
        Ok(removed)
    }

    /// Makes a main query current and leaves CTE mode.
    ///
    /// # Errors
    ///
    /// [`EditError::QueryOutOfRange`].
    pub fn select_query(&self, index: usize, selection: &mut Selection) -> Result<()> {
        let len = self.queries.len();
        if index >= len {
            return Err(EditError::QueryOutOfRange { index, len });
        }
        *selection = Selection {
            query: index,
            cte: None,
        };
        Ok(())
    }

    /// Appends a CTE with one empty member and selects it. The name is
    /// `cte_N`, skipping names already taken.
    pub fn add_cte(&mut self, selection: &mut Selection) -> usize {
        let mut n = self.ctes().len() + 1;
        while self.is_cte(&format!("cte_{n}")) {
            n += 1;
        }
        let name = format!("cte_{n}");
        debug!(%name, "added CTE");
        self.ctes_mut().push(Cte::new(name, vec![Query::named("Query")]));
        let index = self.ctes().len() - 1;
        selection.cte = Some(index);
        index
    }

    /// Removes a CTE. When the selected CTE disappears the selection moves
    /// to its neighbour, or back to main mode when none are left.
    ///
    /// # Errors
    ///
    /// [`EditError::CteOutOfRange`].
    pub fn remove_cte(&mut self, index: usize, selection: &mut Selection) -> Result<Cte> {
        let len = self.ctes().len();
        if index >= len {
            return Err(EditError::CteOutOfRange { index, len });
        }
        let removed = self.ctes_mut().remove(index);
        let remaining = self.ctes().len();
        selection.cte = match selection.cte {
            _ if remaining == 0 => None,
            Some(current) => Some(shift_after_removal(current, index, remaining)),
            None => None,
        };
        debug!(name = %removed.name, "removed CTE");
        Ok(removed)
    }

    /// Enters CTE mode on `index`; an out-of-range index returns to main
    /// mode instead.
    pub fn select_cte(&self, index: usize, selection: &mut Selection) {
        selection.cte = (index < self.ctes().len()).then_some(index);
    }

    /// Renames a CTE. Names must be ASCII identifiers and unique.
    ///
    /// # Errors
    ///
    /// [`EditError::CteOutOfRange`], [`EditError::InvalidCteName`] or
    /// [`EditError::DuplicateCteName`].
    pub fn rename_cte(&mut self, index: usize, name: &str) -> Result<()> {
        let len = self.ctes().len();
        if index >= len {
            return Err(EditError::CteOutOfRange { index, len });
        }
        let name = name.trim();
        if !Cte::is_valid_name(name) {
            return Err(EditError::InvalidCteName(name.to_string()));
        }
        if self.cte_index(name).is_some_and(|other| other != index) {
            return Err(EditError::DuplicateCteName(name.to_string()));
        }
        self.ctes_mut()[index].name = name.to_string();
        Ok(())
    }

    /// Appends an empty member to the selected CTE and makes it active.
    ///
    /// # Errors
    ///
    /// [`EditError::NoCteSelected`].
    pub fn add_cte_query(&mut self, selection: &Selection) -> Result<usize> {
        let cte = self.selected_cte_mut(selection)?;
        let index = cte.queries.len();
        cte.queries.push(Query::named(format!("Subquery {}", index + 1)));
        cte.active = index;
        Ok(index)
    }

    /// Removes a member of the selected CTE. The last one cannot be
    /// removed.
    ///
    /// # Errors
    ///
    /// [`EditError::NoCteSelected`], [`EditError::QueryOutOfRange`] or
    /// [`EditError::LastCteQuery`].
    pub fn remove_cte_query(&mut self, index: usize, selection: &Selection) -> Result<Query> {
        let cte = self.selected_cte_mut(selection)?;
        let len = cte.queries.len();
        if index >= len {
            return Err(EditError::QueryOutOfRange { index, len });
        }
        if len == 1 {
            return Err(EditError::LastCteQuery(cte.name.clone()));
        }
        let removed = cte.queries.remove(index);
        cte.active = shift_after_removal(cte.active, index, cte.queries.len());
        Ok(removed)
    }

    /// Makes a member of the selected CTE active.
    ///
    /// # Errors
    ///
    /// [`EditError::NoCteSelected`] or [`EditError::QueryOutOfRange`].
    pub fn select_cte_query(&mut self, index: usize, selection: &Selection) -> Result<()> {
        let cte = self.selected_cte_mut(selection)?;
        let len = cte.queries.len();
        if index >= len {
            return Err(EditError::QueryOutOfRange { index, len });
        }
        cte.active = index;
        Ok(())
    }

    fn selected_cte_mut(&mut self, selection: &Selection) -> Result<&mut Cte> {
        let index = selection.cte.ok_or(EditError::NoCteSelected)?;
        self.ctes_mut().get_mut(index).ok_or(EditError::NoCteSelected)
    }

    /// The selected main query, regardless of mode.
    #[must_use]
    pub fn current_query(&self, selection: &Selection) -> Option<&Query> {
        self.queries.get(selection.query)
    }

    /// The selected CTE, in CTE mode.
    #[must_use]
    pub fn current_cte(&self, selection: &Selection) -> Option<&Cte> {
        selection.cte.and_then(|index| self.ctes().get(index))
    }

    /// The query being edited: the active member of the selected CTE, or
    /// the selected main query.
    #[must_use]
    pub fn current_item(&self, selection: &Selection) -> Option<&Query> {
        match selection.cte {
            Some(_) => self.current_cte(selection).and_then(Cte::active_query),
            None => self.current_query(selection),
        }
    }

    /// Mutable access to the query being edited.
    pub fn current_item_mut(&mut self, selection: &Selection) -> Option<&mut Query> {
        match selection.cte {
            Some(index) => self
                .ctes_mut()
                .get_mut(index)
                .and_then(Cte::active_query_mut),
            None => self.queries.get_mut(selection.query),
        }
    }

    /// The SQL for the whole document.
    #[must_use]
    pub fn preview(&self) -> String {
        generate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_after_removal() {
        assert_eq!(shift_after_removal(2, 0, 3), 1);
        assert_eq!(shift_after_removal(2, 2, 2), 1);
        assert_eq!(shift_after_removal(0, 1, 2), 0);
        assert_eq!(shift_after_removal(0, 0, 0), 0);
    }

    #[test]
    fn test_add_cte_skips_taken_names() {
        let mut document = Document::new();
        let mut selection = Selection::default();
        document.add_cte(&mut selection);
        document.rename_cte(0, "cte_2").unwrap();
        document.add_cte(&mut selection);
        let names: Vec<_> = document.ctes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["cte_2", "cte_3"]);
    }

    #[test]
    fn test_selection_serializes_camel_case() {
        let selection = Selection {
            query: 1,
            cte: Some(0),
        };
        let json = serde_json::to_value(selection).unwrap();
        assert_eq!(json["query"], 1);
        assert_eq!(json["cte"], 0);
    }
}
