//! `recipebook` - A local recipe collection
//!
//! This library provides the recipe store, the form reconciler that decides
//! when an edit has unsaved changes, and the storage backends the collection
//! is persisted in.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod guard;
pub mod logging;
pub mod media;
pub mod recipe;
pub mod seed;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use form::{FormSnapshot, RecipeForm, SubmitOutcome};
pub use guard::{LeaveDecision, LeaveGuard};
pub use logging::init_logging;
pub use recipe::{Ingredient, NewRecipe, Recipe, RecipePatch, Step};
pub use storage::{open_backend, KeyValueStore};
pub use store::{RecipeStore, StoreStats};
