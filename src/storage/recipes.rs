use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::model::{Draft, Recipe};
use crate::storage::KeyValueStore;

/// Slot holding the saved recipe collection as a JSON array
pub const RECIPES_KEY: &str = "recipes";
/// Slot holding the single in-progress draft as a JSON object
pub const DRAFT_KEY: &str = "recipe_draft_v1";

/// Gateway between the editor and the key-value store.
///
/// Reads are forgiving: a missing or malformed slot comes back empty rather
/// than as an error. Writes report storage failures. The two slots are
/// written independently with no transaction between them.
#[derive(Debug)]
pub struct RecipeStore<S> {
    store: S,
}

impl<S: KeyValueStore> RecipeStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// All saved recipes, most recently created first
    pub fn get_all(&self) -> Vec<Recipe> {
        self.read_slot(RECIPES_KEY).unwrap_or_default()
    }

    /// Replace the recipe with the same id in place, or put it at the front
    pub fn save(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut all = self.get_all();
        match all.iter_mut().find(|r| r.id == recipe.id) {
            Some(existing) => {
                debug!("Replacing recipe {}", recipe.id);
                *existing = recipe.clone();
            }
            None => {
                debug!("Adding recipe {}", recipe.id);
                all.insert(0, recipe.clone());
            }
        }
        self.write_all(&all)
    }

    /// Drop the recipe with `id`, keeping the others in order
    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut all = self.get_all();
        all.retain(|r| r.id != id);
        self.write_all(&all)
    }

    /// Overwrite the draft slot with `draft`
    pub fn save_draft(&self, draft: &Draft) -> Result<(), StoreError> {
        let text = serde_json::to_string(draft)?;
        self.store.set(DRAFT_KEY, &text)
    }

    /// The stored draft, if there is one and it decodes
    pub fn read_draft(&self) -> Option<Draft> {
        self.read_slot(DRAFT_KEY)
    }

    pub fn clear_draft(&self) -> Result<(), StoreError> {
        self.store.remove(DRAFT_KEY)
    }

    fn write_all(&self, all: &[Recipe]) -> Result<(), StoreError> {
        let text = serde_json::to_string(all)?;
        self.store.set(RECIPES_KEY, &text)
    }

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed data in '{}': {}", key, e);
                None
            }
        }
    }
}
