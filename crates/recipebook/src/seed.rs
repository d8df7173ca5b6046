//! Default data: the category list and the seed set.
//!
//! The seed set is loaded once, when the collection is found empty. Seed
//! records carry their ids but no timestamps; the store stamps them.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recipe::{clean_entries, Ingredient, Recipe, Step};

/// Built-in category labels, in display order.
pub const DEFAULT_CATEGORIES: &[&str] =
    &["Breakfast", "Lunch", "Dinner", "Dessert", "Snack", "Drink"];

/// The built-in seed set.
const BUILTIN_SEED_JSON: &str = include_str!("../data/seed_recipes.json");

/// A recipe from the seed set, shaped like [`Recipe`] minus timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecipe {
    /// Fixed identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category label.
    #[serde(rename = "type")]
    pub recipe_type: String,
    /// Picture reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ingredients in display order.
    pub ingredients: Vec<Ingredient>,
    /// Steps in display order.
    pub steps: Vec<Step>,
}

impl SeedRecipe {
    /// Stamp the record with `now` as both creation and update time.
    #[must_use]
    pub fn into_recipe(self, now: i64) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name,
            recipe_type: self.recipe_type,
            image_url: self.image_url,
            ingredients: clean_entries(self.ingredients),
            steps: clean_entries(self.steps),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parse a seed set from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of seed recipes, or if
/// two records share an id or one has an empty id.
pub fn parse_seed(json: &str) -> Result<Vec<SeedRecipe>> {
    let seed: Vec<SeedRecipe> =
        serde_json::from_str(json).map_err(|e| Error::seed(e.to_string()))?;

    let mut ids = HashSet::new();
    for recipe in &seed {
        if recipe.id.trim().is_empty() {
            return Err(Error::seed(format!("recipe '{}' has an empty id", recipe.name)));
        }
        if !ids.insert(recipe.id.as_str()) {
            return Err(Error::seed(format!("duplicate recipe id: {}", recipe.id)));
        }
    }

    Ok(seed)
}

/// The seed set shipped with the crate.
///
/// # Errors
///
/// Returns an error only if the embedded data is malformed.
pub fn builtin_seed() -> Result<Vec<SeedRecipe>> {
    parse_seed(BUILTIN_SEED_JSON)
}

/// Load a seed set from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<SeedRecipe>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::seed(format!("{}: {e}", path.display())))?;
    parse_seed(&json)
}
