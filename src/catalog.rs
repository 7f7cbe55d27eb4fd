//! Reference catalogs: the known-customer and known-product lists.
//!
//! Loaded once at process start and read-only for the life of the
//! run. Order matters: the matcher breaks score ties by first
//! occurrence.

use std::fs;
use std::path::Path;

use crate::error::IntakeError;

/// Two ordered, immutable lists of canonical strings.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    customers: Vec<String>,
    products: Vec<String>,
}

impl Catalog {
    pub fn new(customers: Vec<String>, products: Vec<String>) -> Self {
        Self {
            customers,
            products,
        }
    }

    /// Load both lists from text files, one entry per line. Blank
    /// lines are skipped, entries are trimmed.
    pub fn from_files(
        customers_path: impl AsRef<Path>,
        products_path: impl AsRef<Path>,
    ) -> Result<Self, IntakeError> {
        Ok(Self {
            customers: load_list(customers_path.as_ref())?,
            products: load_list(products_path.as_ref())?,
        })
    }

    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }
}

fn load_list(path: &Path) -> Result<Vec<String>, IntakeError> {
    let content = fs::read_to_string(path).map_err(|source| IntakeError::Catalog {
        path: path.display().to_string(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
