mod controller;
pub mod form;
mod pending;
mod signals;

pub use controller::RecipeEditor;
pub use form::{validate, FormModel, MIN_NAME_LEN};
pub use pending::{LookupOutcome, Pending, PendingListing, PendingLookup, PendingSeed};
pub use signals::{Feedback, DEFAULT_INFO_TTL};
