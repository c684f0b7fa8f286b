use crate::error::ValidationError;
use crate::model::{Draft, RecipeIngredient};

/// Minimum length for the title and for each ingredient name
pub const MIN_NAME_LEN: usize = 2;

type ChangeListener = Box<dyn Fn(&Draft) + Send + Sync>;

/// The editable recipe plus the listeners that want to hear about changes.
///
/// Mutations go through [`FormModel::update`], which notifies listeners once
/// per call no matter how many fields changed, or through
/// [`FormModel::patch_silently`], which does not notify at all.
pub struct FormModel {
    value: Draft,
    listeners: Vec<ChangeListener>,
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FormModel {
    /// A form with one empty ingredient row and one empty step
    pub fn new() -> Self {
        Self {
            value: blank_draft(),
            listeners: Vec::new(),
        }
    }

    pub fn value(&self) -> &Draft {
        &self.value
    }

    /// Register a callback that runs after every notifying change
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&Draft) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn update<R>(&mut self, change: impl FnOnce(&mut Draft) -> R) -> R {
        let result = change(&mut self.value);
        for listener in &self.listeners {
            listener(&self.value);
        }
        result
    }

    pub fn patch_silently<R>(&mut self, change: impl FnOnce(&mut Draft) -> R) -> R {
        change(&mut self.value)
    }

    /// Every reason the current value cannot be saved, empty when valid
    pub fn validate(&self) -> Vec<ValidationError> {
        validate(&self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// One empty ingredient row and one empty step
pub fn blank_draft() -> Draft {
    Draft {
        id: String::new(),
        title: String::new(),
        ingredients: vec![RecipeIngredient::default()],
        steps: vec![String::new()],
    }
}

/// Title and every ingredient name are required and at least
/// [`MIN_NAME_LEN`] characters. Steps are free text.
pub fn validate(draft: &Draft) -> Vec<ValidationError> {
    let mut issues = Vec::new();

    match draft.title.chars().count() {
        0 => issues.push(ValidationError::MissingTitle),
        n if n < MIN_NAME_LEN => issues.push(ValidationError::TitleTooShort { min: MIN_NAME_LEN }),
        _ => {}
    }

    for (row, ingredient) in draft.ingredients.iter().enumerate() {
        match ingredient.name.chars().count() {
            0 => issues.push(ValidationError::MissingIngredientName { row }),
            n if n < MIN_NAME_LEN => issues.push(ValidationError::IngredientNameTooShort {
                row,
                min: MIN_NAME_LEN,
            }),
            _ => {}
        }
    }

    issues
}
