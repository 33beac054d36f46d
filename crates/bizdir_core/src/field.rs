//! Logical directory fields and their physical column candidates.

use serde::{Deserialize, Serialize};

/// A column of the directory as the UI sees it, independent of the
/// physical column name used by a particular database file.
///
/// Declaration order is display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogicalField {
    Name,
    Phone,
    Address,
    City,
    State,
    PostalCode,
    Country,
    MapLink,
    Website,
}

impl LogicalField {
    /// Physical columns that may back this field, most preferred first.
    ///
    /// # Examples
    ///
    /// ```
    /// use bizdir_core::LogicalField;
    ///
    /// assert_eq!(LogicalField::State.candidates(), &["state_std", "state"]);
    /// ```
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            LogicalField::Name => &["name_std", "name"],
            LogicalField::Phone => &["phone"],
            LogicalField::Address => &["full_address"],
            LogicalField::City => &["city"],
            LogicalField::State => &["state_std", "state"],
            LogicalField::PostalCode => &["postal_code_std", "postal_code"],
            LogicalField::Country => &["country"],
            LogicalField::MapLink => &["location_link"],
            LogicalField::Website => &["site"],
        }
    }

    /// Column header used on screen and in CSV exports.
    pub fn label(self) -> &'static str {
        match self {
            LogicalField::Name => "Name",
            LogicalField::Phone => "Phone",
            LogicalField::Address => "Address",
            LogicalField::City => "City",
            LogicalField::State => "State",
            LogicalField::PostalCode => "ZIP",
            LogicalField::Country => "Country",
            LogicalField::MapLink => "Map",
            LogicalField::Website => "Website",
        }
    }

    /// Result-set alias for this field (`postal_code`, `map_link`, ...).
    pub fn alias(self) -> &'static str {
        self.into()
    }

    /// Whether values of this field are URLs rendered as links.
    pub fn is_link(self) -> bool {
        matches!(self, LogicalField::MapLink | LogicalField::Website)
    }

    /// All fields in display order.
    pub fn all() -> impl Iterator<Item = LogicalField> {
        <LogicalField as strum::IntoEnumIterator>::iter()
    }
}

/// Fields searched by the free-text keyword filter.
pub const KEYWORD_FIELDS: [LogicalField; 3] = [
    LogicalField::Name,
    LogicalField::Address,
    LogicalField::Website,
];
