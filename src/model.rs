use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Macro-nutrient values for one ingredient, as returned by the nutrition service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fat: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub protein: f64,
}

/// One ingredient row of a recipe
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecipeIngredient {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nutrition: None,
        }
    }

    pub fn with_nutrition(name: impl Into<String>, nutrition: Nutrition) -> Self {
        Self {
            name: name.into(),
            nutrition: Some(nutrition),
        }
    }
}

/// A saved recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// ISO-8601 timestamp of the last save
    pub created_at: String,
}

/// Snapshot of the in-progress recipe form.
///
/// Same shape as [`Recipe`] without the identity guarantees: the id may be
/// empty and nothing is validated. Every field defaults so that partial or
/// older snapshots still decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<String>,
}

impl From<&Recipe> for Draft {
    fn from(recipe: &Recipe) -> Self {
        Draft {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
        }
    }
}

/// Payload for creating an ingredient on the nutrition service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIngredient {
    pub name: String,
    pub carbs: f64,
    pub fat: f64,
    pub protein: f64,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, carbs: f64, fat: f64, protein: f64) -> Self {
        Self {
            name: name.into(),
            carbs,
            fat,
            protein,
        }
    }

    /// Form-encoded fields in the order the service expects them
    pub(crate) fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            ("name", self.name.clone()),
            ("carbs", self.carbs.to_string()),
            ("fat", self.fat.to_string()),
            ("protein", self.protein.to_string()),
        ]
    }
}

/// Summed macros across a set of ingredients
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacroTotals {
    pub carbs: f64,
    pub fat: f64,
    pub protein: f64,
}

impl MacroTotals {
    /// Sum the macros of every ingredient that has nutrition attached.
    /// Ingredients without nutrition contribute nothing.
    pub fn from_ingredients<'a, I>(ingredients: I) -> Self
    where
        I: IntoIterator<Item = &'a RecipeIngredient>,
    {
        ingredients
            .into_iter()
            .filter_map(|i| i.nutrition.as_ref())
            .fold(Self::default(), |mut acc, n| {
                acc.carbs += finite_or_zero(n.carbs);
                acc.fat += finite_or_zero(n.fat);
                acc.protein += finite_or_zero(n.protein);
                acc
            })
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Other(Value),
}

/// The service is not strict about numeric fields: accept numbers and
/// numeric strings, treat anything else as zero.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => n,
        RawAmount::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        RawAmount::Other(_) => 0.0,
    };
    Ok(finite_or_zero(amount))
}

/// A cleared form field is stored as `null`; read it back as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
