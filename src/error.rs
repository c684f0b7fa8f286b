use thiserror::Error;

/// Errors raised by the remote nutrition service client
#[derive(Error, Debug)]
pub enum NutritionError {
    /// The request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{operation} failed: {status} {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    /// The response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured credentials could not be turned into a header
    #[error("Header parse error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Errors raised while writing to the local key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reasons a recipe form cannot be saved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Title must be at least {min} characters")]
    TitleTooShort { min: usize },

    #[error("Ingredient {row} needs a name")]
    MissingIngredientName { row: usize },

    #[error("Ingredient {row} name must be at least {min} characters")]
    IngredientNameTooShort { row: usize, min: usize },
}

/// Errors raised by editor actions addressed to a row that does not exist
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("No ingredient at row {0}")]
    NoSuchIngredient(usize),

    #[error("No step at row {0}")]
    NoSuchStep(usize),
}

/// Top-level error for the command-line front end
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Nutrition(#[from] NutritionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Usage error: {0}")]
    Usage(String),

    /// An editor action reported a failure through its error signal
    #[error("{0}")]
    Action(String),
}
