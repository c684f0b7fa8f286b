use std::future::Future;
use std::pin::Pin;

use crate::error::NutritionError;
use crate::model::Nutrition;
use crate::nutrition::{AddResponse, Lookup};

type Request<T> = Pin<Box<dyn Future<Output = Result<T, NutritionError>> + Send>>;

/// A nutrition request started by the editor but not yet applied to it.
///
/// It owns everything it needs, so the editor stays usable while it runs.
/// Await [`Pending::run`] and hand the result back to the matching
/// `finish_*` method on the editor.
pub struct Pending<T> {
    request: Request<T>,
}

impl<T> Pending<T> {
    pub(crate) fn new<F>(request: F) -> Self
    where
        F: Future<Output = Result<T, NutritionError>> + Send + 'static,
    {
        Self {
            request: Box::pin(request),
        }
    }

    pub async fn run(self) -> Result<T, NutritionError> {
        self.request.await
    }
}

pub type PendingSeed = Pending<Vec<AddResponse>>;
pub type PendingListing = Pending<Vec<Nutrition>>;

/// An in-flight lookup for one ingredient row
pub struct PendingLookup {
    index: usize,
    name: String,
    request: Pending<Lookup>,
}

impl PendingLookup {
    pub(crate) fn new(index: usize, name: String, request: Pending<Lookup>) -> Self {
        Self {
            index,
            name,
            request,
        }
    }

    /// Row the lookup was started for
    pub fn index(&self) -> usize {
        self.index
    }

    /// Trimmed ingredient name sent to the service
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn run(self) -> LookupOutcome {
        let result = self.request.run().await;
        LookupOutcome {
            index: self.index,
            name: self.name,
            result,
        }
    }
}

/// A finished lookup waiting to be applied to the form
#[derive(Debug)]
pub struct LookupOutcome {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) result: Result<Lookup, NutritionError>,
}

impl LookupOutcome {
    pub fn index(&self) -> usize {
        self.index
    }
}
