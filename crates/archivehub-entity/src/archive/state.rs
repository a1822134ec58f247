//! Borrow state of an archive record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use archivehub_core::error::AppError;

/// Availability of an archive record.
///
/// Persisted as the single-character codes `"0"` and `"1"`. Audit records
/// store the state a transition moved *to*, so the same codes double as
/// the audit operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BorrowState {
    /// On the shelf.
    #[default]
    #[serde(rename = "0")]
    Available,
    /// Lent out.
    #[serde(rename = "1")]
    Borrowed,
}

impl BorrowState {
    /// Return the persisted code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Available => "0",
            Self::Borrowed => "1",
        }
    }

    /// Return a human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Borrowed => "borrowed",
        }
    }

    /// The name of the transition that moves a record into this state.
    pub fn transition_name(&self) -> &'static str {
        match self {
            Self::Available => "return",
            Self::Borrowed => "borrow",
        }
    }
}

impl fmt::Display for BorrowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BorrowState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "available" => Ok(Self::Available),
            "1" | "borrowed" => Ok(Self::Borrowed),
            _ => Err(AppError::validation(format!("Invalid borrow state: '{s}'"))),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for BorrowState {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for BorrowState {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_code(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BorrowState {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        raw.parse::<BorrowState>()
            .map_err(|e| Box::new(e) as sqlx::error::BoxDynError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(BorrowState::Available.as_code(), "0");
        assert_eq!(BorrowState::Borrowed.as_code(), "1");
        assert_eq!("1".parse::<BorrowState>().expect("code"), BorrowState::Borrowed);
        assert_eq!(
            "Available".parse::<BorrowState>().expect("name"),
            BorrowState::Available
        );
        assert!("2".parse::<BorrowState>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&BorrowState::Borrowed).expect("serialize");
        assert_eq!(json, "\"1\"");
    }
}
