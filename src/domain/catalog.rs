//! Fixed product catalog and case-insensitive name resolution.

use std::fmt;

use thiserror::Error;

const DEFAULT_PRODUCTS: [&str; 12] = [
    "GPT RENEW",
    "GPT GO",
    "GPT new",
    "Cur Pro",
    "Cur Pro+",
    "Cur Ultra",
    "Krea Basic",
    "Krea Pro",
    "Krea Max",
    "Runway Stand",
    "Runway Pro",
    "Runway Unlimited",
];

/// Exact catalog spelling of a product; used as storage key and in all output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("product catalog must contain at least one product")]
    Empty,
    #[error("product catalog contains a blank name at position {position}")]
    BlankName { position: usize },
    #[error("product catalog lists {name:?} more than once (names are case-insensitive)")]
    Duplicate { name: String },
}

/// Ordered list of valid product names.
///
/// The list is small and fixed, so lookups are a linear scan with a
/// lowercase comparison rather than an index keyed by normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<CanonicalName>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: DEFAULT_PRODUCTS
                .iter()
                .map(|name| CanonicalName((*name).to_owned()))
                .collect(),
        }
    }
}

impl Catalog {
    /// Builds a catalog from configured names, keeping their order.
    ///
    /// Names are trimmed. Two names that differ only in case are rejected
    /// because `resolve` could never tell them apart.
    pub fn new<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut products: Vec<CanonicalName> = Vec::new();

        for (position, raw) in names.into_iter().enumerate() {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(CatalogError::BlankName { position });
            }

            let lowered = name.to_lowercase();
            if products
                .iter()
                .any(|existing| existing.0.to_lowercase() == lowered)
            {
                return Err(CatalogError::Duplicate {
                    name: name.to_owned(),
                });
            }

            products.push(CanonicalName(name.to_owned()));
        }

        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { products })
    }

    /// Returns the canonical entry matching `input` case-insensitively after trimming.
    pub fn resolve(&self, input: &str) -> Option<CanonicalName> {
        let name = input.trim();
        if name.is_empty() {
            return None;
        }

        let lowered = name.to_lowercase();
        self.products
            .iter()
            .find(|product| product.0.to_lowercase() == lowered)
            .cloned()
    }

    /// Catalog entries in display order.
    pub fn list(&self) -> &[CanonicalName] {
        &self.products
    }
}
