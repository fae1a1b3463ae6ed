// catalog.rs - Shared exercise catalog
//
// Catalog rows are exercises with no owner. Imports match existing rows by
// normalized name so re-running an import updates instead of duplicating.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

use crate::database::models::ExerciseInput;
use crate::database::{DatabaseError, ExerciseStore};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub updated: usize,
}

/// Entries shipped with the service
pub fn builtin() -> Result<Vec<ExerciseInput>, CatalogError> {
    parse(BUILTIN_CATALOG)
}

pub fn parse(json: &str) -> Result<Vec<ExerciseInput>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_file(path: &Path) -> Result<Vec<ExerciseInput>, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    parse(&contents)
}

/// Matching key for exercise names: "Pull-Up", "pull up" and "PULL  UP!" agree
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upsert `entries` into the catalog, keyed by normalized name.
///
/// All entries are validated before anything is written. Later duplicates in
/// the same batch win.
pub async fn import<S>(store: &S, entries: Vec<ExerciseInput>) -> Result<ImportReport, CatalogError>
where
    S: ExerciseStore + ?Sized,
{
    for entry in &entries {
        entry.validate().map_err(|reason| CatalogError::InvalidEntry {
            name: entry.name.clone(),
            reason,
        })?;
    }

    let mut existing: HashMap<String, Uuid> = store
        .list_catalog_exercises()
        .await?
        .into_iter()
        .map(|exercise| (normalize_name(&exercise.name), exercise.id))
        .collect();

    let mut report = ImportReport::default();
    for entry in entries {
        let key = normalize_name(&entry.name);
        match existing.get(&key) {
            Some(&id) => {
                if store.update_exercise(id, None, entry).await?.is_some() {
                    report.updated += 1;
                }
            }
            None => {
                let created = store.insert_exercise(None, entry).await?;
                existing.insert(key, created.id);
                report.inserted += 1;
            }
        }
    }

    tracing::info!(
        "Catalog import finished: {} inserted, {} updated",
        report.inserted,
        report.updated
    );
    Ok(report)
}
