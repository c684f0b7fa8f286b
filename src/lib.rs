//! Recipe editing with nutrition lookups.
//!
//! The crate has three layers:
//! - [`storage`]: saved recipes and the in-progress draft in a key-value store
//! - [`nutrition`]: a Basic-auth client for the remote ingredient service
//! - [`editor`]: the form controller tying the two together

pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod nutrition;
pub mod storage;

use std::sync::Arc;

pub use crate::config::{AppConfig, ApiConfig, StorageConfig};
pub use editor::RecipeEditor;
pub use error::{AppError, EditorError, NutritionError, StoreError, ValidationError};
pub use model::{Draft, MacroTotals, NewIngredient, Nutrition, Recipe, RecipeIngredient};
pub use nutrition::{AddResponse, Lookup, NutritionClient, NutritionSource};
pub use storage::{FileStore, KeyValueStore, MemoryStore, RecipeStore};

/// Build an editor backed by the configured storage directory and
/// nutrition service
pub fn open_editor(config: &AppConfig) -> Result<RecipeEditor<FileStore>, AppError> {
    let store = FileStore::open(&config.storage.dir)?;
    let client = NutritionClient::new(&config.api)?;
    Ok(RecipeEditor::new(store, Arc::new(client), config.info_ttl()))
}
