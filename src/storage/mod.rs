mod file;
mod memory;
mod recipes;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use recipes::{RecipeStore, DRAFT_KEY, RECIPES_KEY};

use crate::error::StoreError;

/// String-keyed text slots, the shape of browser local storage.
///
/// Implementations use interior mutability so a store can be shared
/// between the editor and the draft listener.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. A missing slot is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a slot.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a slot. Deleting a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
