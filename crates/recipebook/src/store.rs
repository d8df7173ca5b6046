//! The recipe store.
//!
//! Sole owner of the persisted collection. The whole collection is one JSON
//! array in one key-value slot, newest first. Every mutation reads the array,
//! changes it in memory and writes it back in a single backend call.
//!
//! Mutations hold `write_lock` for the full read-modify-write, so two
//! overlapping calls on the same store cannot lose each other's changes.
//! A mutation whose backend read fails returns the error and writes nothing.
//! Reads never take the lock. Two separate `RecipeStore` values pointed at
//! the same slot are not coordinated.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_STORAGE_KEY};
use crate::error::{Error, Result};
use crate::recipe::{new_id, now_millis, NewRecipe, Recipe, RecipePatch};
use crate::seed::{builtin_seed, load_seed_file, SeedRecipe};
use crate::storage::KeyValueStore;

/// Source of "now" in epoch milliseconds.
pub type Clock = fn() -> i64;

/// Persistent recipe collection.
#[derive(Debug)]
pub struct RecipeStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    seed: Vec<SeedRecipe>,
    clock: Clock,
    write_lock: Mutex<()>,
}

impl RecipeStore {
    /// Create a store over `backend` using the default slot key and no seed set.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            key: DEFAULT_STORAGE_KEY.to_string(),
            seed: Vec::new(),
            clock: now_millis,
            write_lock: Mutex::new(()),
        }
    }

    /// Build a store from configuration: slot key and seed set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured seed file (or the built-in seed
    /// set) cannot be loaded.
    pub fn from_config(config: &Config, backend: Arc<dyn KeyValueStore>) -> Result<Self> {
        let seed = match &config.recipes.seed_file {
            Some(path) => load_seed_file(path)?,
            None => builtin_seed()?,
        };
        Ok(Self::new(backend)
            .with_key(config.storage.key.clone())
            .with_seed(seed))
    }

    /// Use a different slot key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the records used by [`seed_if_empty`](Self::seed_if_empty).
    #[must_use]
    pub fn with_seed(mut self, seed: Vec<SeedRecipe>) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The slot key holding the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the backend in use.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// All recipes, newest first.
    ///
    /// Never fails: an unreadable or malformed slot is logged and reads as
    /// an empty collection.
    pub async fn list_all(&self) -> Vec<Recipe> {
        self.load_or_empty().await
    }

    /// Recipes whose category equals `recipe_type` exactly, in storage order.
    pub async fn list_by_type(&self, recipe_type: &str) -> Vec<Recipe> {
        self.load_or_empty()
            .await
            .into_iter()
            .filter(|r| r.recipe_type == recipe_type)
            .collect()
    }

    /// Look up a recipe by id.
    pub async fn get_by_id(&self, id: &str) -> Option<Recipe> {
        self.load_or_empty().await.into_iter().find(|r| r.id == id)
    }

    /// Number of recipes.
    pub async fn count(&self) -> usize {
        self.load_or_empty().await.len()
    }

    /// Add a recipe at the front of the collection.
    ///
    /// Assigns a fresh id and stamps both timestamps with the same instant.
    /// Blank ingredients and steps are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written; nothing
    /// is persisted in that case.
    pub async fn create(&self, new: NewRecipe) -> Result<Recipe> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;

        let mut id = new_id();
        while list.iter().any(|r| r.id == id) {
            id = new_id();
        }

        let recipe = Recipe::from_new(new, id, (self.clock)());
        list.insert(0, recipe.clone());
        self.save(&list).await?;

        info!("Created recipe {} ({})", recipe.id, recipe.name);
        Ok(recipe)
    }

    /// Merge `patch` into the recipe with the given id.
    ///
    /// Keeps `id` and `created_at`, refreshes `updated_at`. Returns `false`
    /// without writing anything when no recipe has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn update(&self, id: &str, patch: RecipePatch) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;

        let Some(recipe) = list.iter_mut().find(|r| r.id == id) else {
            debug!("Update skipped, no recipe with id {}", id);
            return Ok(false);
        };
        recipe.apply(patch, (self.clock)());
        self.save(&list).await?;

        info!("Updated recipe {}", id);
        Ok(true)
    }

    /// Remove the recipe with the given id.
    ///
    /// Returns `false` without writing anything when no recipe has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut list = self.load().await?;

        let before = list.len();
        list.retain(|r| r.id != id);
        if list.len() == before {
            debug!("Delete skipped, no recipe with id {}", id);
            return Ok(false);
        }
        self.save(&list).await?;

        info!("Deleted recipe {}", id);
        Ok(true)
    }

    /// Populate an empty collection with the seed set.
    ///
    /// Every seed record gets the current time as both timestamps. Does
    /// nothing and returns `false` if the collection already has recipes or
    /// the seed set is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn seed_if_empty(&self) -> Result<bool> {
        if self.seed.is_empty() {
            debug!("No seed recipes configured");
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;
        if !self.load().await?.is_empty() {
            return Ok(false);
        }

        let now = (self.clock)();
        let seeded: Vec<Recipe> = self
            .seed
            .iter()
            .cloned()
            .map(|s| s.into_recipe(now))
            .collect();
        self.save(&seeded).await?;

        info!("Seeded {} recipes", seeded.len());
        Ok(true)
    }

    /// Summary of the collection.
    pub async fn stats(&self) -> StoreStats {
        StoreStats::from_recipes(&self.load_or_empty().await)
    }

    /// Fetch a recipe or fail with [`Error::RecipeNotFound`].
    ///
    /// # Errors
    ///
    /// Returns an error if no recipe has the given id.
    pub async fn require(&self, id: &str) -> Result<Recipe> {
        self.get_by_id(id)
            .await
            .ok_or_else(|| Error::recipe_not_found(id))
    }

    /// Current collection. Backend errors propagate; a malformed or empty
    /// slot reads as no recipes.
    async fn load(&self) -> Result<Vec<Recipe>> {
        let bytes = match self.backend.read(&self.key).await? {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(Vec::new()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(list) => Ok(list),
            Err(e) => {
                warn!("Stored recipes are malformed, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn load_or_empty(&self) -> Vec<Recipe> {
        self.load().await.unwrap_or_else(|e| {
            warn!("Reading recipes failed, treating as empty: {}", e);
            Vec::new()
        })
    }

    async fn save(&self, list: &[Recipe]) -> Result<()> {
        let bytes = serde_json::to_vec(list)?;
        self.backend.write(&self.key, &bytes).await?;
        debug!("Saved {} recipes to {}", list.len(), self.key);
        Ok(())
    }
}

/// Summary counts for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of recipes.
    pub total_recipes: usize,
    /// Recipes per category, in order of first appearance.
    pub by_type: Vec<(String, usize)>,
    /// Earliest `created_at` in the collection.
    pub oldest_created_at: Option<i64>,
    /// Latest `updated_at` in the collection.
    pub newest_updated_at: Option<i64>,
}

impl StoreStats {
    fn from_recipes(recipes: &[Recipe]) -> Self {
        let mut by_type: Vec<(String, usize)> = Vec::new();
        for recipe in recipes {
            match by_type.iter_mut().find(|(t, _)| *t == recipe.recipe_type) {
                Some((_, n)) => *n += 1,
                None => by_type.push((recipe.recipe_type.clone(), 1)),
            }
        }

        Self {
            total_recipes: recipes.len(),
            by_type,
            oldest_created_at: recipes.iter().map(|r| r.created_at).min(),
            newest_updated_at: recipes.iter().map(|r| r.updated_at).max(),
        }
    }
}
