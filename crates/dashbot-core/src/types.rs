use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

// Newtype wrappers for type safety

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical dashboard identifier, e.g. `sales_revenue`.
///
/// This is the join key between the filter catalog, the link table and the
/// dialog flow. Build one from a user-facing label with [`DashboardName::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardName(String);

impl DashboardName {
    /// Normalize a user-facing label: trim, lower-case, collapse whitespace
    /// runs to `_` and drop every `.`.
    ///
    /// Normalizing an already normalized name returns it unchanged.
    pub fn normalize(label: &str) -> Self {
        let lowered = label.trim().to_lowercase();
        let joined = WHITESPACE_RUN.replace_all(&lowered, "_");
        Self(joined.replace('.', ""))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name is already in canonical form.
    pub fn is_normalized(&self) -> bool {
        !self.0.is_empty() && Self::normalize(&self.0).0 == self.0
    }
}

impl std::fmt::Display for DashboardName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DashboardName {
    fn from(label: &str) -> Self {
        Self::normalize(label)
    }
}

impl AsRef<str> for DashboardName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize the user's dimension choice the way it is kept in conversation
/// state: trimmed, lower-cased, whitespace runs collapsed to `_`.
pub fn normalize_dimension(selection: &str) -> String {
    let lowered = selection.trim().to_lowercase();
    WHITESPACE_RUN.replace_all(&lowered, "_").into_owned()
}
