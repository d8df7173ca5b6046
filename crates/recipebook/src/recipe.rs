//! Core recipe types for recipebook.
//!
//! A [`Recipe`] is the only persisted entity. Its JSON shape (camelCase keys,
//! `type` for the category, millisecond timestamps) is what lands in the
//! key-value slot, so field renames here are a storage format change.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Generate a new opaque identifier.
///
/// Random 128-bit value rendered as lowercase hex. Used for recipes and for
/// ingredient/step rows.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// An entry in one of a recipe's ordered lists.
///
/// The id only keys the row while editing; it is never referenced from
/// outside the owning recipe.
pub trait ListEntry: Clone {
    /// Build an entry from its parts.
    fn from_parts(id: String, text: String) -> Self;

    /// The row id.
    fn id(&self) -> &str;

    /// The free text of the row.
    fn text(&self) -> &str;

    /// Replace the text, keeping the id.
    fn set_text(&mut self, text: String);

    /// A new row with a fresh id and no text.
    #[must_use]
    fn blank() -> Self {
        Self::from_parts(new_id(), String::new())
    }
}

/// One ingredient line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Row id, unique within the recipe.
    #[serde(default)]
    pub id: String,
    /// Free text, e.g. "2 cups flour".
    pub text: String,
}

/// One preparation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Row id, unique within the recipe.
    #[serde(default)]
    pub id: String,
    /// Free text of the instruction.
    pub text: String,
}

impl Ingredient {
    /// Create an ingredient with a fresh id.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_parts(new_id(), text.into())
    }
}

impl Step {
    /// Create a step with a fresh id.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_parts(new_id(), text.into())
    }
}

impl ListEntry for Ingredient {
    fn from_parts(id: String, text: String) -> Self {
        Self { id, text }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

impl ListEntry for Step {
    fn from_parts(id: String, text: String) -> Self {
        Self { id, text }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

/// Trim every entry, drop the blank ones, keep order.
///
/// Entries that arrive without an id (older data) get a fresh one so every
/// persisted row is keyed.
#[must_use]
pub fn clean_entries<E: ListEntry>(entries: Vec<E>) -> Vec<E> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let text = entry.text().trim();
            if text.is_empty() {
                return None;
            }
            let id = if entry.id().is_empty() {
                new_id()
            } else {
                entry.id().to_string()
            };
            Some(E::from_parts(id, text.to_string()))
        })
        .collect()
}

/// A persisted recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier, assigned by the store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category label. Any string is accepted.
    #[serde(rename = "type")]
    pub recipe_type: String,
    /// Local file reference or remote URL of the picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ingredients in display order.
    pub ingredients: Vec<Ingredient>,
    /// Steps in display order.
    pub steps: Vec<Step>,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
    /// Last modification time, epoch milliseconds.
    pub updated_at: i64,
}

impl Recipe {
    /// Materialize a new record from submitted fields.
    #[must_use]
    pub fn from_new(new: NewRecipe, id: String, now: i64) -> Self {
        Self {
            id,
            name: new.name,
            recipe_type: new.recipe_type,
            image_url: new.image_url,
            ingredients: clean_entries(new.ingredients),
            steps: clean_entries(new.steps),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch over this record.
    ///
    /// Only fields present in the patch change. `id` and `created_at` are
    /// never touched; `updated_at` moves to `now` but never backwards.
    pub fn apply(&mut self, patch: RecipePatch, now: i64) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(recipe_type) = patch.recipe_type {
            self.recipe_type = recipe_type;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = clean_entries(ingredients);
        }
        if let Some(steps) = patch.steps {
            self.steps = clean_entries(steps);
        }
        self.updated_at = now.max(self.updated_at);
    }

    /// Whether a picture is attached.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Fields for a recipe that does not exist yet.
///
/// Everything except the store-assigned `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    /// Display name.
    pub name: String,
    /// Category label.
    #[serde(rename = "type")]
    pub recipe_type: String,
    /// Picture reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ingredients in display order.
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Steps in display order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A partial update. `None` leaves the field as it is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipePatch {
    /// New display name.
    pub name: Option<String>,
    /// New category label.
    pub recipe_type: Option<String>,
    /// `Some(None)` removes the picture.
    pub image_url: Option<Option<String>>,
    /// Replacement ingredient list.
    pub ingredients: Option<Vec<Ingredient>>,
    /// Replacement step list.
    pub steps: Option<Vec<Step>>,
}

impl From<NewRecipe> for RecipePatch {
    /// A full replacement of every editable field.
    fn from(new: NewRecipe) -> Self {
        Self {
            name: Some(new.name),
            recipe_type: Some(new.recipe_type),
            image_url: Some(new.image_url),
            ingredients: Some(new.ingredients),
            steps: Some(new.steps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Recipe {
        Recipe::from_new(
            NewRecipe {
                name: "Pancakes".to_string(),
                recipe_type: "Breakfast".to_string(),
                image_url: None,
                ingredients: vec![Ingredient::new("Flour"), Ingredient::new("Milk")],
                steps: vec![Step::new("Mix"), Step::new("Fry")],
            },
            "r1".to_string(),
            1_000,
        )
    }

    #[test]
    fn test_new_id_is_unique_and_opaque() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_from_new_stamps_both_timestamps() {
        let recipe = sample();
        assert_eq!(recipe.id, "r1");
        assert_eq!(recipe.created_at, 1_000);
        assert_eq!(recipe.updated_at, 1_000);
    }

    #[test]
    fn test_clean_entries_trims_and_drops_blanks() {
        let cleaned = clean_entries(vec![
            Ingredient::from_parts("a".to_string(), "  Salt ".to_string()),
            Ingredient::from_parts("b".to_string(), "   ".to_string()),
            Ingredient::from_parts("c".to_string(), "Pepper".to_string()),
        ]);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].id, "a");
        assert_eq!(cleaned[0].text, "Salt");
        assert_eq!(cleaned[1].text, "Pepper");
    }

    #[test]
    fn test_clean_entries_fills_missing_ids() {
        let cleaned = clean_entries(vec![Step::from_parts(String::new(), "Boil".to_string())]);
        assert!(!cleaned[0].id.is_empty());
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut recipe = sample();
        recipe.apply(
            RecipePatch {
                name: Some("Crepes".to_string()),
                ..RecipePatch::default()
            },
            2_000,
        );
        assert_eq!(recipe.name, "Crepes");
        assert_eq!(recipe.recipe_type, "Breakfast");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.created_at, 1_000);
        assert_eq!(recipe.updated_at, 2_000);
    }

    #[test]
    fn test_apply_never_moves_updated_at_backwards() {
        let mut recipe = sample();
        recipe.apply(RecipePatch::default(), 500);
        assert_eq!(recipe.updated_at, 1_000);
    }

    #[test]
    fn test_apply_can_clear_image() {
        let mut recipe = sample();
        recipe.image_url = Some("file:///a.jpg".to_string());
        assert!(recipe.has_image());

        recipe.apply(
            RecipePatch {
                image_url: Some(None),
                ..RecipePatch::default()
            },
            2_000,
        );
        assert!(!recipe.has_image());
    }

    #[test]
    fn test_recipe_json_shape() {
        let mut recipe = sample();
        recipe.image_url = Some("https://example.com/p.jpg".to_string());
        let json = serde_json::to_value(&recipe).unwrap();

        assert_eq!(json["type"], "Breakfast");
        assert_eq!(json["imageUrl"], "https://example.com/p.jpg");
        assert_eq!(json["createdAt"], 1_000);
        assert_eq!(json["updatedAt"], 1_000);
        assert_eq!(json["ingredients"][0]["text"], "Flour");
    }

    #[test]
    fn test_recipe_without_image_omits_key() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("imageUrl"));
    }

    #[test]
    fn test_reads_entries_without_ids() {
        let json = r#"{
            "id": "x", "name": "Toast", "type": "Breakfast",
            "ingredients": [{"text": "Bread"}], "steps": [{"text": "Toast it"}],
            "createdAt": 1, "updatedAt": 2
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.ingredients[0].text, "Bread");
        assert!(recipe.ingredients[0].id.is_empty());
        assert!(recipe.image_url.is_none());
    }
}
