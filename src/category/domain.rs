//! The category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, user::UserID};

/// The ID of a category row.
pub type CategoryId = i64;

/// Whether a category classifies money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in, e.g. "Salary".
    Income,
    /// Money going out, e.g. "Food & Dining".
    Expense,
}

impl CategoryType {
    /// The string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(Error::InvalidCategoryType(other.to_owned())),
        }
    }
}

/// A non-empty category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create and validate a category name.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a category name without validation, e.g. from a database row.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// The category's ID in the application database.
    pub id: CategoryId,
    /// The display name.
    pub name: CategoryName,
    /// Whether this is an income or expense category.
    pub category_type: CategoryType,
    /// Shared defaults are visible to every user and have no owner.
    pub is_default: bool,
    /// The owning user. `None` for shared defaults.
    pub user_id: Option<UserID>,
}

/// The raw data from the category create and edit forms.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    pub category_type: String,
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let name = CategoryName::new("");

        assert_eq!(name.unwrap_err(), Error::EmptyCategoryName);
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let name = CategoryName::new("\n\t \r");

        assert_eq!(name.unwrap_err(), Error::EmptyCategoryName);
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let name = CategoryName::new("  Food & Dining  ").unwrap();

        assert_eq!(name.as_ref(), "Food & Dining");
    }
}
