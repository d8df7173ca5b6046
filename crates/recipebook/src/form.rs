//! Recipe form reconciliation.
//!
//! A [`RecipeForm`] holds the raw text a user is editing, a baseline
//! snapshot taken when the form opened, and the rules that turn raw input
//! into a submission.
//!
//! Both the baseline and the live state go through the same normalization
//! before they are compared:
//!
//! - `name` and `image_url` are trimmed, `recipe_type` is kept as-is
//! - ingredient and step texts are trimmed, blank ones dropped, order kept
//! - row ids are left out, so only visible text counts
//!
//! Order is part of the snapshot: moving an entry to another position makes
//! the form dirty even though the set of texts is unchanged.

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::recipe::{
    clean_entries, new_id, Ingredient, ListEntry, NewRecipe, Recipe, RecipePatch, Step,
};
use crate::store::RecipeStore;

/// Normalized, comparable view of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    /// Trimmed name.
    pub name: String,
    /// Category label, untouched.
    pub recipe_type: String,
    /// Trimmed image reference; empty means none.
    pub image_url: String,
    /// Non-blank trimmed ingredient texts, in order.
    pub ingredients: Vec<String>,
    /// Non-blank trimmed step texts, in order.
    pub steps: Vec<String>,
}

impl FormSnapshot {
    /// The baseline of a brand-new recipe.
    #[must_use]
    pub fn blank(default_type: impl Into<String>) -> Self {
        Self {
            recipe_type: default_type.into(),
            ..Self::default()
        }
    }

    /// The baseline of an existing recipe.
    #[must_use]
    pub fn of_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.trim().to_string(),
            recipe_type: recipe.recipe_type.clone(),
            image_url: recipe
                .image_url
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            ingredients: texts(&recipe.ingredients),
            steps: texts(&recipe.steps),
        }
    }

    /// The snapshot a submitted payload corresponds to.
    #[must_use]
    pub fn of_payload(payload: &NewRecipe) -> Self {
        Self {
            name: payload.name.clone(),
            recipe_type: payload.recipe_type.clone(),
            image_url: payload.image_url.clone().unwrap_or_default(),
            ingredients: texts(&payload.ingredients),
            steps: texts(&payload.steps),
        }
    }
}

fn texts<E: ListEntry>(entries: &[E]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.text().trim())
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Name field.
    pub name: String,
    /// Selected category.
    pub recipe_type: String,
    /// Image reference; empty means none.
    pub image_url: String,
    /// Ingredient rows, possibly blank.
    pub ingredients: Vec<Ingredient>,
    /// Step rows, possibly blank.
    pub steps: Vec<Step>,
}

impl FormState {
    /// Empty input with one blank row in each list.
    #[must_use]
    pub fn blank(default_type: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            recipe_type: default_type.into(),
            image_url: String::new(),
            ingredients: vec![Ingredient::blank()],
            steps: vec![Step::blank()],
        }
    }

    /// Input prefilled from a stored recipe.
    ///
    /// Empty lists get one blank row so there is always somewhere to type.
    #[must_use]
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            recipe_type: recipe.recipe_type.clone(),
            image_url: recipe.image_url.clone().unwrap_or_default(),
            ingredients: rows_or_blank(&recipe.ingredients),
            steps: rows_or_blank(&recipe.steps),
        }
    }

    /// Normalize for comparison.
    #[must_use]
    pub fn normalize(&self) -> FormSnapshot {
        FormSnapshot {
            name: self.name.trim().to_string(),
            recipe_type: self.recipe_type.clone(),
            image_url: self.image_url.trim().to_string(),
            ingredients: texts(&self.ingredients),
            steps: texts(&self.steps),
        }
    }

    /// Check required fields and build the payload for the store.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: name, then ingredients, then steps.
    pub fn validate(&self) -> std::result::Result<NewRecipe, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }

        let ingredients = clean_entries(self.ingredients.clone());
        if ingredients.is_empty() {
            return Err(ValidationError::IngredientRequired);
        }

        let steps = clean_entries(self.steps.clone());
        if steps.is_empty() {
            return Err(ValidationError::StepRequired);
        }

        let image_url = self.image_url.trim();
        Ok(NewRecipe {
            name: name.to_string(),
            recipe_type: self.recipe_type.clone(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
            ingredients,
            steps,
        })
    }
}

fn rows_or_blank<E: ListEntry>(entries: &[E]) -> Vec<E> {
    if entries.is_empty() {
        vec![E::blank()]
    } else {
        entries.to_vec()
    }
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new recipe was stored.
    Created(Recipe),
    /// An existing recipe was patched. `found` is false if it had been
    /// deleted in the meantime, in which case nothing was written.
    Updated {
        /// The edited recipe id.
        id: String,
        /// Whether the id still existed.
        found: bool,
    },
}

/// A create or edit form with dirty tracking.
#[derive(Debug, Clone)]
pub struct RecipeForm {
    editing_id: Option<String>,
    state: FormState,
    baseline: FormSnapshot,
}

impl RecipeForm {
    /// A form for a new recipe.
    #[must_use]
    pub fn new(default_type: impl Into<String>) -> Self {
        let default_type = default_type.into();
        Self {
            editing_id: None,
            state: FormState::blank(default_type.clone()),
            baseline: FormSnapshot::blank(default_type),
        }
    }

    /// A form editing an existing recipe.
    #[must_use]
    pub fn edit(recipe: &Recipe) -> Self {
        Self {
            editing_id: Some(recipe.id.clone()),
            state: FormState::from_recipe(recipe),
            baseline: FormSnapshot::of_recipe(recipe),
        }
    }

    /// Open a form the way the editor screen does.
    ///
    /// `None` id opens a blank form. An id that no longer exists yields
    /// `None`.
    pub async fn open(
        store: &RecipeStore,
        id: Option<&str>,
        default_type: impl Into<String>,
    ) -> Option<Self> {
        match id {
            None => Some(Self::new(default_type)),
            Some(id) => store.get_by_id(id).await.map(|r| Self::edit(&r)),
        }
    }

    /// The id being edited, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    /// Current raw input.
    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Snapshot the form is compared against.
    #[must_use]
    pub fn baseline(&self) -> &FormSnapshot {
        &self.baseline
    }

    /// Normalized live state.
    #[must_use]
    pub fn normalized(&self) -> FormSnapshot {
        self.state.normalize()
    }

    /// Whether the user changed anything meaningful since the form opened
    /// or was last submitted.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.normalized() != self.baseline
    }

    /// Set the name field.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.name = name.into();
    }

    /// Select a category.
    pub fn set_type(&mut self, recipe_type: impl Into<String>) {
        self.state.recipe_type = recipe_type.into();
    }

    /// Attach an image reference.
    pub fn set_image(&mut self, uri: impl Into<String>) {
        self.state.image_url = uri.into();
    }

    /// Detach the image.
    pub fn clear_image(&mut self) {
        self.state.image_url.clear();
    }

    /// Append a blank ingredient row and return its id.
    pub fn add_ingredient(&mut self) -> String {
        push_blank(&mut self.state.ingredients)
    }

    /// Change the text of an ingredient row. Returns `false` for an unknown id.
    pub fn set_ingredient(&mut self, row_id: &str, text: impl Into<String>) -> bool {
        set_row(&mut self.state.ingredients, row_id, text.into())
    }

    /// Remove an ingredient row. Returns `false` for an unknown id.
    pub fn remove_ingredient(&mut self, row_id: &str) -> bool {
        remove_row(&mut self.state.ingredients, row_id)
    }

    /// Move an ingredient row to another index. Returns `false` if out of range.
    pub fn move_ingredient(&mut self, from: usize, to: usize) -> bool {
        move_row(&mut self.state.ingredients, from, to)
    }

    /// Append a blank step row and return its id.
    pub fn add_step(&mut self) -> String {
        push_blank(&mut self.state.steps)
    }

    /// Change the text of a step row. Returns `false` for an unknown id.
    pub fn set_step(&mut self, row_id: &str, text: impl Into<String>) -> bool {
        set_row(&mut self.state.steps, row_id, text.into())
    }

    /// Remove a step row. Returns `false` for an unknown id.
    pub fn remove_step(&mut self, row_id: &str) -> bool {
        remove_row(&mut self.state.steps, row_id)
    }

    /// Move a step row to another index. Returns `false` if out of range.
    pub fn move_step(&mut self, from: usize, to: usize) -> bool {
        move_row(&mut self.state.steps, from, to)
    }

    /// Replace all ingredient rows with fresh rows holding `texts`.
    pub fn set_ingredients<S: Into<String>>(&mut self, texts: impl IntoIterator<Item = S>) {
        self.state.ingredients = fresh_rows(texts);
    }

    /// Replace all step rows with fresh rows holding `texts`.
    pub fn set_steps<S: Into<String>>(&mut self, texts: impl IntoIterator<Item = S>) {
        self.state.steps = fresh_rows(texts);
    }

    /// Validate and build the payload without storing it.
    ///
    /// # Errors
    ///
    /// Returns the first failed required-field check.
    pub fn validate(&self) -> std::result::Result<NewRecipe, ValidationError> {
        self.state.validate()
    }

    /// Validate, then create or update through the store.
    ///
    /// On success the baseline becomes the submitted payload, so the form is
    /// clean and the caller may leave without a discard prompt. After a
    /// create the form edits the new record, so submitting again updates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) without
    /// touching the store if a required field is missing, or a storage error
    /// if the write fails.
    pub async fn submit(&mut self, store: &RecipeStore) -> Result<SubmitOutcome> {
        let payload = self.validate()?;
        let snapshot = FormSnapshot::of_payload(&payload);

        let outcome = match self.editing_id.clone() {
            Some(id) => {
                let found = store.update(&id, RecipePatch::from(payload)).await?;
                SubmitOutcome::Updated { id, found }
            }
            None => {
                let created = store.create(payload).await?;
                self.editing_id = Some(created.id.clone());
                SubmitOutcome::Created(created)
            }
        };

        match &outcome {
            SubmitOutcome::Updated { found: false, id } => {
                debug!("Recipe {} vanished before save, form stays dirty", id);
            }
            _ => self.baseline = snapshot,
        }
        Ok(outcome)
    }
}

fn fresh_rows<E: ListEntry, S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Vec<E> {
    let rows: Vec<E> = texts
        .into_iter()
        .map(|t| E::from_parts(new_id(), t.into()))
        .collect();
    if rows.is_empty() {
        vec![E::blank()]
    } else {
        rows
    }
}

fn push_blank<E: ListEntry>(rows: &mut Vec<E>) -> String {
    let row = E::blank();
    let id = row.id().to_string();
    rows.push(row);
    id
}

fn set_row<E: ListEntry>(rows: &mut [E], row_id: &str, text: String) -> bool {
    match rows.iter_mut().find(|r| r.id() == row_id) {
        Some(row) => {
            row.set_text(text);
            true
        }
        None => false,
    }
}

fn remove_row<E: ListEntry>(rows: &mut Vec<E>, row_id: &str) -> bool {
    let before = rows.len();
    rows.retain(|r| r.id() != row_id);
    rows.len() != before
}

fn move_row<E>(rows: &mut Vec<E>, from: usize, to: usize) -> bool {
    if from >= rows.len() || to >= rows.len() {
        return false;
    }
    let row = rows.remove(from);
    rows.insert(to, row);
    true
}
