//! Per-bank biller catalog
//!
//! Each bank supports a fixed set of external billers, loaded from a JSON
//! file of `code -> metadata`. Lookup is case-insensitive: codes are
//! normalized to uppercase when the catalog is built.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Failure to load a biller catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read biller file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed biller file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Metadata for one supported biller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Biller {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// The set of billers one bank accepts payments for
#[derive(Debug, Clone, Default)]
pub struct BillerCatalog {
    billers: HashMap<String, Biller>,
}

impl BillerCatalog {
    /// Build a catalog, normalizing codes to uppercase
    pub fn new(billers: HashMap<String, Biller>) -> Self {
        let billers = billers
            .into_iter()
            .map(|(code, biller)| (code.to_uppercase(), biller))
            .collect();
        Self { billers }
    }

    /// Empty catalog (bank supports no bill payments)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a JSON file of `{"CODE": {"name": ..., "category": ...}}`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let billers: HashMap<String, Biller> = serde_json::from_str(&contents)?;
        Ok(Self::new(billers))
    }

    /// Case-insensitive lookup by biller code
    pub fn get(&self, code: &str) -> Option<&Biller> {
        self.billers.get(&code.to_uppercase())
    }

    /// All supported billers, keyed by normalized code
    pub fn all(&self) -> &HashMap<String, Biller> {
        &self.billers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BillerCatalog {
        let mut billers = HashMap::new();
        billers.insert(
            "meralco".to_string(),
            Biller {
                name: "Meralco".to_string(),
                category: "utilities".to_string(),
            },
        );
        BillerCatalog::new(billers)
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let catalog = catalog();
        assert!(catalog.get("MERALCO").is_some());
        assert!(catalog.get("Meralco").is_some());
        assert!(catalog.get("pldt").is_none());
    }

    #[test]
    fn test_codes_normalized() {
        let catalog = catalog();
        assert!(catalog.all().contains_key("MERALCO"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BillerCatalog::from_json_file("/nonexistent/billers.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join("bad_billers.json");
        std::fs::write(&path, "not json").unwrap();
        let err = BillerCatalog::from_json_file(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        std::fs::remove_file(&path).ok();
    }
}
