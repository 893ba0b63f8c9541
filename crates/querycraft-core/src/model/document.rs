//! CTEs and the top-level document.

use serde::{Deserialize, Serialize};

use super::query::Query;
use crate::editor::EditError;

/// A named, UNION-connected group of queries usable as a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cte {
    pub name: String,
    /// Member statements, chained with each member's `union_all_next`.
    pub queries: Vec<Query>,
    /// Index of the member being edited.
    #[serde(rename = "currentQueryIndex")]
    pub active: usize,
}

impl Cte {
    /// A CTE with the given members; the first one is active.
    #[must_use]
    pub fn new(name: impl Into<String>, queries: Vec<Query>) -> Self {
        Self {
            name: name.into(),
            queries,
            active: 0,
        }
    }

    /// Returns true if `name` can name a CTE: an ASCII identifier, so the
    /// dialect's identifier sanitizing leaves it unchanged.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// The member being edited, if any.
    #[must_use]
    pub fn active_query(&self) -> Option<&Query> {
        self.queries.get(self.active)
    }

    /// Mutable access to the member being edited.
    pub fn active_query_mut(&mut self) -> Option<&mut Query> {
        self.queries.get_mut(self.active)
    }
}

/// Main queries plus the CTEs they may reference.
///
/// CTEs keep their insertion order (which is also the emission order in
/// `WITH`) and names are unique. Deserialized documents are checked for
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "DocumentData")]
pub struct Document {
    /// Main statements, chained with each query's `union_all_next`.
    pub queries: Vec<Query>,
    ctes: Vec<Cte>,
}

/// The unchecked JSON shape of a [`Document`].
#[derive(Deserialize, Default)]
#[serde(default)]
struct DocumentData {
    queries: Vec<Query>,
    ctes: Vec<Cte>,
}

impl TryFrom<DocumentData> for Document {
    type Error = EditError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        let mut document = Self {
            queries: data.queries,
            ctes: Vec::with_capacity(data.ctes.len()),
        };
        for mut cte in data.ctes {
            if !Cte::is_valid_name(&cte.name) {
                return Err(EditError::InvalidCteName(cte.name));
            }
            if document.is_cte(&cte.name) {
                return Err(EditError::DuplicateCteName(cte.name));
            }
            if cte.queries.is_empty() {
                cte.queries.push(Query::named("Query"));
                cte.active = 0;
            }
            document.ctes.push(cte);
        }
        Ok(document)
    }
}

impl Document {
    /// The starting document of an editing session: one empty query.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queries: vec![Query::named("Query")],
            ctes: Vec::new(),
        }
    }

    /// All CTEs in emission order.
    #[must_use]
    pub fn ctes(&self) -> &[Cte] {
        &self.ctes
    }

    /// Mutable access to the CTE list. Renames go through
    /// `Document::rename_cte` so names stay unique.
    pub(crate) fn ctes_mut(&mut self) -> &mut Vec<Cte> {
        &mut self.ctes
    }

    /// Looks up a CTE by name (case-sensitive).
    #[must_use]
    pub fn cte(&self, name: &str) -> Option<&Cte> {
        self.ctes.iter().find(|cte| cte.name == name)
    }

    /// Mutable lookup by name.
    pub fn cte_mut(&mut self, name: &str) -> Option<&mut Cte> {
        self.ctes.iter_mut().find(|cte| cte.name == name)
    }

    /// Position of a CTE in emission order.
    #[must_use]
    pub fn cte_index(&self, name: &str) -> Option<usize> {
        self.ctes.iter().position(|cte| cte.name == name)
    }

    /// Inserts a CTE, replacing (in place) an existing one with the same
    /// name and returning it.
    pub fn insert_cte(&mut self, cte: Cte) -> Option<Cte> {
        match self.cte_index(&cte.name) {
            Some(index) => Some(std::mem::replace(&mut self.ctes[index], cte)),
            None => {
                self.ctes.push(cte);
                None
            }
        }
    }

    /// Removes a CTE by name.
    pub fn remove_cte_named(&mut self, name: &str) -> Option<Cte> {
        let index = self.cte_index(name)?;
        Some(self.ctes.remove(index))
    }

    /// Returns true if `name` refers to a CTE rather than a catalog table.
    #[must_use]
    pub fn is_cte(&self, name: &str) -> bool {
        self.cte_index(name).is_some()
    }
}
