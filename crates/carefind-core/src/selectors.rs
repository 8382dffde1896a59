//! Selector table: logical markup sections mapped to CSS selector expressions.
//!
//! The listing site's markup uses generated class names that change when the
//! site is redeployed. Every selector the parsers use lives here so a markup
//! change only means editing this table (or shipping an override file).
//!
//! # Example override file
//!
//! ```json
//! {
//!   "listing_card": "a.provider-card",
//!   "visit_article": "article.visit"
//! }
//! ```
//!
//! Keys left out of an override file keep their built-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Selector expressions for every section the parsers read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorTable {
    /// Anchor of one search-result card on the search page.
    pub listing_card: String,

    /// Container whose own text is the center type.
    pub identity: String,
    /// Following sibling of `identity` holding the provider name.
    pub identity_name: String,
    /// Following sibling of `identity` holding the program level.
    pub identity_program: String,

    /// Personal-info container.
    pub contact: String,
    /// Items inside `contact`: phone, email, address, subsidy contract.
    pub contact_item: String,

    /// One row of the weekly hours table.
    pub day_row: String,
    /// Day label inside a `day_row`.
    pub day_name: String,
    /// Hours text inside a `day_row`.
    pub day_hours: String,

    /// One accepted-age tag.
    pub age_tag: String,

    /// Licensing container.
    pub licensing: String,
    /// Specialist name inside `licensing`.
    pub licensing_specialist: String,
    /// Specialist phone inside `licensing`.
    pub licensing_contact: String,

    /// One licensing visit with observed non-compliances.
    pub visit_article: String,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            listing_card: r#"a[class*="_1b0crnf1 _1q4scjf6 z-[2]"]"#.into(),
            identity: "div._1q4scjf7".into(),
            identity_name: "h1".into(),
            identity_program: "h2".into(),
            contact: r#"div[class="bd04r4l _1q4scjf6 _1umd8ia1"]"#.into(),
            contact_item: "div._1umd8ia2".into(),
            day_row: "div.yuxh4x0".into(),
            day_name: "dt".into(),
            day_hours: "dd".into(),
            age_tag: r#"li[class="_18i9ibq1 _1q4scjf0"]"#.into(),
            licensing: r#"div[class="_18i9ibq1 _1q4scjf0 _1ntxxnq0"]"#.into(),
            licensing_specialist: "h3._1q4scjf4".into(),
            licensing_contact: "div._1ntxxnq1".into(),
            visit_article: r#"article[class="bd04r4l _1q4scjf0 _1elult33"]"#.into(),
        }
    }
}

impl SelectorTable {
    /// Load a table from a JSON file, filling absent keys with defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!(
                "Failed to read selector file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }
}
