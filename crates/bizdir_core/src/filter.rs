//! User-entered filter values.

use serde::{Deserialize, Serialize};

/// Selector value meaning "no constraint".
pub const ANY_OPTION: &str = "(any)";

/// The combination of keyword, city, state and ZIP-prefix constraints
/// currently applied in a session.
///
/// Values are kept as entered; the accessors below apply the rules that
/// decide whether a value constrains anything.
///
/// # Examples
///
/// ```
/// use bizdir_core::FilterSet;
///
/// let filters = FilterSet::default().with_city("(any)").with_zip_prefix("  941 ");
/// assert_eq!(filters.city_value(), None);
/// assert_eq!(filters.zip_prefix_value(), Some("941"));
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option, into)]
pub struct FilterSet {
    /// Free-text search over name, address and website
    keyword: Option<String>,
    /// Exact city match
    city: Option<String>,
    /// Exact state / province match
    state: Option<String>,
    /// Postal code prefix
    zip_prefix: Option<String>,
}

impl FilterSet {
    /// Keyword to search for, if non-empty.
    pub fn keyword_value(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    /// Selected city unless empty or the `(any)` sentinel.
    pub fn city_value(&self) -> Option<&str> {
        selected(self.city.as_deref())
    }

    /// Selected state unless empty or the `(any)` sentinel.
    pub fn state_value(&self) -> Option<&str> {
        selected(self.state.as_deref())
    }

    /// Trimmed ZIP prefix, if anything remains after trimming.
    pub fn zip_prefix_value(&self) -> Option<&str> {
        self.zip_prefix
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
    }

    /// True when no filter value would constrain the result set.
    pub fn is_unconstrained(&self) -> bool {
        self.keyword_value().is_none()
            && self.city_value().is_none()
            && self.state_value().is_none()
            && self.zip_prefix_value().is_none()
    }
}

fn selected(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ANY_OPTION)
}
