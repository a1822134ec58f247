//! Canonical group-permission label sets.
//!
//! A resource (folder or archive) carries the set of labels a principal
//! must hold to see it; a principal carries the set of labels it holds.
//! Access requires **every** resource label to be held (AND semantics).
//! An empty resource set is unrestricted.
//!
//! Labels are trimmed, empty tokens dropped, and duplicates removed with
//! the first occurrence kept. Comparison is case-sensitive. The canonical
//! string form (`"admin,user"`) is what gets persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use archivehub_core::error::AppError;

/// Label separator in the persisted form.
const SEPARATOR: char = ',';

/// An ordered, deduplicated set of permission labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet {
    labels: Vec<String>,
}

impl PermissionSet {
    /// The empty (unrestricted) set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a comma-separated label string. Never fails: whitespace is
    /// trimmed and empty or repeated tokens are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut set = Self::empty();
        for token in raw.split(SEPARATOR) {
            set.push(token.trim());
        }
        set
    }

    /// Build a set from individual labels.
    ///
    /// Each label is trimmed; a label that is empty after trimming or that
    /// contains the separator is rejected.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(AppError::validation("Permission label cannot be empty"));
            }
            if label.contains(SEPARATOR) {
                return Err(AppError::validation(format!(
                    "Permission label '{label}' must not contain '{SEPARATOR}'"
                )));
            }
            set.push(label);
        }
        Ok(set)
    }

    fn push(&mut self, label: &str) {
        if !label.is_empty() && !self.contains(label) {
            self.labels.push(label.to_string());
        }
    }

    /// Whether the set holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether `label` is a member.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The labels in first-occurrence order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterate over the labels.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Whether a principal holding `principal` may access a resource that
    /// requires `self`.
    pub fn is_satisfied_by(&self, principal: &PermissionSet) -> bool {
        self.labels.iter().all(|required| principal.contains(required))
    }

    /// Canonical comma-joined form.
    pub fn to_joined(&self) -> String {
        self.labels.join(",")
    }
}

/// Whether `principal_labels` covers every label in `resource_labels`.
///
/// Both arguments are comma-separated strings. An empty (or blank)
/// resource string is always satisfied.
pub fn satisfies(resource_labels: &str, principal_labels: &str) -> bool {
    PermissionSet::parse(resource_labels).is_satisfied_by(&PermissionSet::parse(principal_labels))
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_joined())
    }
}

impl FromStr for PermissionSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for PermissionSet {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_joined())
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

impl sqlx::Type<sqlx::Postgres> for PermissionSet {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for PermissionSet {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.to_joined(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PermissionSet {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(raw))
    }
}
