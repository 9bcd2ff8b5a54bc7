use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArticleError {
    #[error("article name is empty")]
    EmptyName,
    #[error("price is empty")]
    EmptyPrice,
    #[error("invalid price '{input}'")]
    InvalidPrice { input: String },
}

/// A single catalogue entry.
///
/// On disk the record keeps the field names of the first version of the
/// app (`nom`, `prix`, `photo_path`); the English spellings are accepted
/// on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nom", alias = "name")]
    pub name: String,
    #[serde(rename = "prix", alias = "price")]
    pub price: f64,
    #[serde(rename = "photo_path", alias = "photoPath", default)]
    pub photo_path: Option<PathBuf>,
    #[serde(default)]
    pub description: String,
}

impl Article {
    pub fn new(id: impl Into<String>, draft: ArticleDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            price: draft.price,
            photo_path: draft.photo_path,
            description: String::new(),
        }
    }

    /// Overwrites the user-editable fields, keeping `id` and `description`.
    pub fn apply(&mut self, draft: ArticleDraft) {
        self.name = draft.name;
        self.price = draft.price;
        self.photo_path = draft.photo_path;
    }

    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
    }
}

/// User-editable fields of an [`Article`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDraft {
    pub name: String,
    pub price: f64,
    pub photo_path: Option<PathBuf>,
}

impl ArticleDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            photo_path: None,
        }
    }

    pub fn with_photo(mut self, photo_path: impl Into<PathBuf>) -> Self {
        self.photo_path = Some(photo_path.into());
        self
    }
}

pub fn validate_name(input: &str) -> Result<String, ArticleError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ArticleError::EmptyName);
    }
    Ok(name.to_string())
}

/// Parses a user-entered price. Zero and negative values are accepted.
pub fn parse_price(input: &str) -> Result<f64, ArticleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ArticleError::EmptyPrice);
    }

    let invalid = || ArticleError::InvalidPrice {
        input: trimmed.to_string(),
    };
    // f64::from_str also takes "inf" and "NaN", which JSON cannot carry.
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+'))
    {
        return Err(invalid());
    }
    let price = trimmed.parse::<f64>().map_err(|_| invalid())?;
    if !price.is_finite() {
        return Err(invalid());
    }
    Ok(price)
}

/// `12.5` → `12.5 TND`, `12` → `12.0 TND`.
pub fn format_price(price: f64, currency: &str) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{price:.1} {currency}")
    } else {
        format!("{price} {currency}")
    }
}

/// Second-granularity id, suffixed with `-N` when `taken` already holds it.
pub(crate) fn generate_id<'a, I>(taken: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    unique_id(seconds.to_string(), taken)
}

fn unique_id<'a, I>(base: String, taken: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let is_taken = |candidate: &str| taken.clone().into_iter().any(|id| id == candidate);
    if !is_taken(&base) {
        return base;
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
