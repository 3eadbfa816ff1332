//! Whitelisted, runtime-selected ordering.
//!
//! Callers name a sort field as a string; each resource maps the names it
//! accepts to a [`SortKey`] variant, and only the variant's static column
//! expression ever reaches SQL.

use serde::Deserialize;

/// Sort direction as accepted on the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// The fixed set of sortable fields for one resource.
pub trait SortKey: Copy + Send + Sync + 'static {
    /// Primary display field; used when no field, or an unknown one, is requested.
    const DEFAULT: Self;

    /// Resolve a normalized (trimmed, lowercase) field name.
    fn from_name(name: &str) -> Option<Self>;

    /// Column expression for `ORDER BY`. Must be a compile-time constant.
    fn column(self) -> &'static str;

    /// Whether the column alone totally orders rows (no tiebreaker needed).
    fn is_unique(self) -> bool {
        false
    }
}

/// A sort field name that is not on the resource's whitelist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort field '{0}'")]
pub struct UnknownSortField(pub String);

/// A resolved ordering over a resource's whitelisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: SortKey> Default for Ordering<K> {
    fn default() -> Self {
        Self {
            key: K::DEFAULT,
            direction: SortDirection::Asc,
        }
    }
}

impl<K: SortKey> Ordering<K> {
    /// Resolve a caller-supplied field name against the whitelist.
    ///
    /// A missing or blank name yields the default ordering. An unknown name
    /// is reported so the caller can log it and fall back to the default.
    pub fn resolve(
        field: Option<&str>,
        direction: Option<SortDirection>,
    ) -> Result<Self, UnknownSortField> {
        let name = match field.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_ascii_lowercase(),
            _ => return Ok(Self::default()),
        };
        let key = K::from_name(&name).ok_or_else(|| UnknownSortField(name))?;
        Ok(Self {
            key,
            direction: direction.unwrap_or_default(),
        })
    }

    /// Render the `ORDER BY` body, appending `tiebreaker ASC` when the key
    /// alone does not totally order rows so that page boundaries are stable.
    pub fn to_sql(&self, tiebreaker: &str) -> String {
        let column = self.key.column();
        if self.key.is_unique() {
            format!("{column} {}", self.direction.as_sql())
        } else {
            format!("{column} {}, {tiebreaker} ASC", self.direction.as_sql())
        }
    }
}
