use chrono::{SecondsFormat, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::editor::form::{blank_draft, FormModel};
use crate::editor::pending::{LookupOutcome, Pending, PendingListing, PendingLookup, PendingSeed};
use crate::editor::signals::Feedback;
use crate::error::{EditorError, NutritionError};
use crate::model::{Draft, MacroTotals, Nutrition, Recipe, RecipeIngredient};
use crate::nutrition::{AddResponse, Lookup, NutritionSource};
use crate::storage::{KeyValueStore, RecipeStore};

/// Drives the recipe form: list edits, nutrition lookups, save/edit/delete,
/// and draft persistence on every change.
///
/// Network actions come in two halves. `begin_*` sets `loading` and returns
/// an owned [`Pending`] request; the form stays editable while it runs, and
/// several may be in flight at once. `finish_*` applies the result. Nothing
/// cancels or coalesces requests, and `loading` is only a hint: any finish
/// clears it.
pub struct RecipeEditor<S> {
    store: Arc<RecipeStore<S>>,
    nutrition: Arc<dyn NutritionSource>,
    form: FormModel,
    feedback: Feedback,
    list: Vec<Recipe>,
    remote: Vec<Nutrition>,
}

impl<S: KeyValueStore + 'static> RecipeEditor<S> {
    /// Load saved recipes, restore the draft if there is one, and start
    /// persisting the draft on every later change.
    pub fn new(store: S, nutrition: Arc<dyn NutritionSource>, info_ttl: Duration) -> Self {
        let store = Arc::new(RecipeStore::new(store));
        let list = store.get_all();

        let mut form = FormModel::new();
        if let Some(draft) = store.read_draft() {
            debug!("Restoring draft '{}'", draft.title);
            form.patch_silently(|value| restore(value, draft));
        }

        let draft_store = Arc::clone(&store);
        form.subscribe(move |value| {
            if let Err(e) = draft_store.save_draft(value) {
                warn!("Failed to persist draft: {}", e);
            }
        });

        Self {
            store,
            nutrition,
            form,
            feedback: Feedback::new(info_ttl),
            list,
            remote: Vec::new(),
        }
    }

    pub fn store(&self) -> &RecipeStore<S> {
        &self.store
    }

    /// Current form contents
    pub fn form(&self) -> &Draft {
        self.form.value()
    }

    /// Saved recipes as last loaded from storage
    pub fn recipes(&self) -> &[Recipe] {
        &self.list
    }

    /// Ingredients from the last remote listing
    pub fn remote(&self) -> &[Nutrition] {
        &self.remote
    }

    pub fn loading(&self) -> bool {
        self.feedback.loading()
    }

    pub fn info(&self) -> Option<&str> {
        self.feedback.info()
    }

    pub fn error(&self) -> Option<&str> {
        self.feedback.error()
    }

    /// Macro sums over the ingredients that currently have nutrition
    pub fn total_macros(&self) -> MacroTotals {
        MacroTotals::from_ingredients(&self.form.value().ingredients)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.form.update(|d| d.title = title);
    }

    pub fn set_ingredient_name(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), EditorError> {
        if index >= self.form.value().ingredients.len() {
            return Err(EditorError::NoSuchIngredient(index));
        }
        let name = name.into();
        self.form.update(|d| d.ingredients[index].name = name);
        Ok(())
    }

    pub fn set_step(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditorError> {
        if index >= self.form.value().steps.len() {
            return Err(EditorError::NoSuchStep(index));
        }
        let text = text.into();
        self.form.update(|d| d.steps[index] = text);
        Ok(())
    }

    pub fn add_ingredient(&mut self) {
        self.form.update(|d| d.ingredients.push(RecipeIngredient::default()));
    }

    /// Remove the ingredient row at `index`, if it exists
    pub fn remove_ingredient(&mut self, index: usize) -> Option<RecipeIngredient> {
        if index >= self.form.value().ingredients.len() {
            return None;
        }
        Some(self.form.update(|d| d.ingredients.remove(index)))
    }

    pub fn add_step(&mut self) {
        self.form.update(|d| d.steps.push(String::new()));
    }

    /// Remove the step at `index`, if it exists
    pub fn remove_step(&mut self, index: usize) -> Option<String> {
        if index >= self.form.value().steps.len() {
            return None;
        }
        Some(self.form.update(|d| d.steps.remove(index)))
    }

    /// Start a nutrition lookup for the ingredient at `index`.
    ///
    /// A blank name is answered with an info message and no request, and
    /// `None` is returned.
    pub fn begin_lookup(&mut self, index: usize) -> Result<Option<PendingLookup>, EditorError> {
        let name = self
            .form
            .value()
            .ingredients
            .get(index)
            .map(|i| i.name.trim().to_string())
            .ok_or(EditorError::NoSuchIngredient(index))?;

        if name.is_empty() {
            self.feedback.toast("Please enter a name first");
            return Ok(None);
        }

        self.feedback.set_loading(true);
        self.feedback.clear_error();

        let source = Arc::clone(&self.nutrition);
        let query = name.clone();
        let request = Pending::new(async move { source.search_ingredient(&query).await });
        Ok(Some(PendingLookup::new(index, name, request)))
    }

    /// Apply a finished lookup to the row it was started for.
    ///
    /// A 404 clears any nutrition the row had. If the row is gone by now the
    /// result is dropped.
    pub fn finish_lookup(&mut self, outcome: LookupOutcome) {
        let LookupOutcome {
            index,
            name,
            result,
        } = outcome;
        self.feedback.set_loading(false);

        match result {
            Ok(Lookup::Found(nutrition)) => {
                self.feedback.toast(format!("Fetched nutrition for \"{}\"", nutrition.name));
                self.attach_nutrition(index, Some(nutrition));
            }
            Ok(Lookup::NotFound) => {
                self.feedback.toast(format!("No nutrition found for \"{}\" (404)", name));
                self.attach_nutrition(index, None);
            }
            Err(e) => {
                warn!("Lookup for '{}' failed: {}", name, e);
                self.feedback.set_error(e.to_string());
            }
        }
    }

    /// Look up the ingredient at `index` and wait for the answer
    pub async fn lookup(&mut self, index: usize) -> Result<(), EditorError> {
        if let Some(pending) = self.begin_lookup(index)? {
            let outcome = pending.run().await;
            self.finish_lookup(outcome);
        }
        Ok(())
    }

    fn attach_nutrition(&mut self, index: usize, nutrition: Option<Nutrition>) {
        self.form.update(|d| {
            if let Some(row) = d.ingredients.get_mut(index) {
                row.nutrition = nutrition;
            }
        });
    }

    /// Validate and save the form as a recipe.
    ///
    /// Returns the saved recipe, or `None` when validation or storage
    /// blocked the save. A new id is generated when the form has none and
    /// written back to the form without triggering draft persistence.
    pub fn save_recipe(&mut self) -> Option<Recipe> {
        let issues = self.form.validate();
        if !issues.is_empty() {
            debug!("Save blocked: {:?}", issues);
            self.feedback.toast("Please fill required fields");
            return None;
        }

        let value = self.form.value();
        let id = if value.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            value.id.clone()
        };
        let recipe = Recipe {
            id: id.clone(),
            title: value.title.clone(),
            ingredients: value.ingredients.clone(),
            steps: value.steps.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        if let Err(e) = self.store.save(&recipe) {
            self.feedback.set_error(e.to_string());
            return None;
        }
        info!("Saved recipe {} ({})", recipe.title, recipe.id);

        self.list = self.store.get_all();
        self.form.patch_silently(|d| d.id = id);
        self.feedback.toast("Recipe saved");
        Some(recipe)
    }

    /// Load `recipe` into the form for editing
    pub fn edit_recipe(&mut self, recipe: &Recipe) {
        self.form.patch_silently(|d| {
            d.id = recipe.id.clone();
            d.title = recipe.title.clone();
        });
        self.form.update(|d| {
            d.ingredients = recipe.ingredients.clone();
            d.steps = recipe.steps.clone();
        });
        self.feedback.toast(format!("Editing \"{}\"", recipe.title));
    }

    /// Delete `recipe` from storage. If it is the one being edited, the form
    /// goes back to a single blank ingredient and step.
    pub fn delete_recipe(&mut self, recipe: &Recipe) {
        if let Err(e) = self.store.remove(&recipe.id) {
            self.feedback.set_error(e.to_string());
            return;
        }
        info!("Deleted recipe {}", recipe.id);

        self.list = self.store.get_all();
        self.feedback.toast("Recipe deleted");
        if self.form.value().id == recipe.id {
            self.form.update(|d| *d = blank_draft());
        }
    }

    /// Forget the persisted draft. The form itself is left alone and the
    /// next change writes a fresh draft.
    pub fn clear_draft(&mut self) {
        if let Err(e) = self.store.clear_draft() {
            self.feedback.set_error(e.to_string());
            return;
        }
        self.feedback.toast("Draft cleared (persistence off until you type again)");
    }

    /// Start creating the two demo ingredients on the remote service
    pub fn begin_seed_two(&mut self) -> PendingSeed {
        self.feedback.set_loading(true);
        self.feedback.clear_error();

        let source = Arc::clone(&self.nutrition);
        Pending::new(async move { source.seed_two_ingredients().await })
    }

    pub fn finish_seed_two(&mut self, result: Result<Vec<AddResponse>, NutritionError>) {
        self.feedback.set_loading(false);
        match result {
            Ok(_) => self.feedback.toast("Seeded 2 ingredients via POST"),
            Err(e) => {
                warn!("Seeding failed: {}", e);
                self.feedback.set_error(e.to_string());
            }
        }
    }

    pub async fn seed_two(&mut self) {
        let result = self.begin_seed_two().run().await;
        self.finish_seed_two(result);
    }

    /// Start fetching every ingredient the remote service knows about
    pub fn begin_list_remote(&mut self) -> PendingListing {
        self.feedback.set_loading(true);

        let source = Arc::clone(&self.nutrition);
        Pending::new(async move { source.list_ingredients().await })
    }

    pub fn finish_list_remote(&mut self, result: Result<Vec<Nutrition>, NutritionError>) {
        self.feedback.set_loading(false);
        match result {
            Ok(items) => {
                self.feedback.toast(format!("Remote ingredients: {}", items.len()));
                self.remote = items;
            }
            Err(e) => {
                warn!("Listing remote ingredients failed: {}", e);
                self.feedback.set_error(e.to_string());
            }
        }
    }

    pub async fn list_remote(&mut self) {
        let result = self.begin_list_remote().run().await;
        self.finish_list_remote(result);
    }
}

/// Copy a stored draft over the default form. Empty lists keep their single
/// blank row so the form always has something to type into.
///
/// Unlike a plain overwrite, a draft with zero ingredient rows therefore
/// restores as one blank row rather than none.
fn restore(value: &mut Draft, draft: Draft) {
    value.id = draft.id;
    value.title = draft.title;
    if !draft.ingredients.is_empty() {
        value.ingredients = draft.ingredients;
    }
    if !draft.steps.is_empty() {
        value.steps = draft.steps;
    }
}
