mod client;

pub use client::NutritionClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::NutritionError;
use crate::model::{NewIngredient, Nutrition};

/// Outcome of a point lookup. A missing ingredient is a normal answer,
/// not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Nutrition),
    NotFound,
}

impl Lookup {
    pub fn into_option(self) -> Option<Nutrition> {
        match self {
            Lookup::Found(n) => Some(n),
            Lookup::NotFound => None,
        }
    }
}

/// Body returned after creating an ingredient. The service may answer with
/// JSON or with plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum AddResponse {
    Json(Value),
    Text(String),
}

impl AddResponse {
    pub(crate) fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => AddResponse::Json(value),
            Err(_) => AddResponse::Text(body),
        }
    }
}

/// The two fixed ingredients used to seed a fresh service
pub fn demo_ingredients() -> [NewIngredient; 2] {
    [
        NewIngredient::new("Plantain", 31.0, 0.4, 1.3),
        NewIngredient::new("Kefir", 4.5, 3.5, 3.3),
    ]
}

/// Anything that can answer nutrition queries for the editor
#[async_trait]
pub trait NutritionSource: Send + Sync {
    /// Every ingredient the service knows about
    async fn list_ingredients(&self) -> Result<Vec<Nutrition>, NutritionError>;

    /// Look up one ingredient by exact name
    async fn search_ingredient(&self, name: &str) -> Result<Lookup, NutritionError>;

    /// Create an ingredient
    async fn add_ingredient(&self, payload: &NewIngredient) -> Result<AddResponse, NutritionError>;

    /// Create both demo ingredients concurrently. Fails if either request fails.
    async fn seed_two_ingredients(&self) -> Result<Vec<AddResponse>, NutritionError> {
        let [first, second] = demo_ingredients();
        let (a, b) = tokio::try_join!(
            self.add_ingredient(&first),
            self.add_ingredient(&second)
        )?;
        Ok(vec![a, b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_response_prefers_json() {
        let response = AddResponse::from_body(r#"{"ok":true}"#.to_string());
        assert_eq!(response, AddResponse::Json(serde_json::json!({"ok": true})));
    }

    #[test]
    fn test_add_response_falls_back_to_text() {
        let response = AddResponse::from_body("Ingredient added".to_string());
        assert_eq!(response, AddResponse::Text("Ingredient added".to_string()));
    }

    #[test]
    fn test_demo_ingredients() {
        let [a, b] = demo_ingredients();
        assert_eq!(a.name, "Plantain");
        assert_eq!(b.name, "Kefir");
        assert_eq!(b.carbs, 4.5);
    }

    #[test]
    fn test_lookup_into_option() {
        assert_eq!(Lookup::NotFound.into_option(), None);
        let n = Nutrition::default();
        assert_eq!(Lookup::Found(n.clone()).into_option(), Some(n));
    }
}
