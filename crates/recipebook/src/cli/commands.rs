//! CLI command definitions.
//!
//! Argument structs for every subcommand, plus the glue that feeds `add` and
//! `edit` arguments into a [`RecipeForm`] so the command line goes through
//! the same validation as any other editor.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::form::RecipeForm;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show recipes of this category
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub recipe_type: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Recipe id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Recipe name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Category (defaults to the first configured one)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub recipe_type: Option<String>,

    /// Image file path or URL
    #[arg(long, value_name = "URI")]
    pub image: Option<String>,

    /// Ingredient line (repeat for more)
    #[arg(short, long = "ingredient", value_name = "TEXT")]
    pub ingredients: Vec<String>,

    /// Step text (repeat for more)
    #[arg(short, long = "step", value_name = "TEXT")]
    pub steps: Vec<String>,
}

impl AddCommand {
    /// Build a new-recipe form from the arguments.
    #[must_use]
    pub fn to_form(&self, default_type: &str) -> RecipeForm {
        let mut form = RecipeForm::new(default_type);
        if let Some(name) = &self.name {
            form.set_name(name.clone());
        }
        if let Some(recipe_type) = &self.recipe_type {
            form.set_type(recipe_type.clone());
        }
        if let Some(image) = &self.image {
            form.set_image(image.clone());
        }
        form.set_ingredients(self.ingredients.iter().cloned());
        form.set_steps(self.steps.iter().cloned());
        form
    }
}

/// Edit command arguments.
///
/// Only the given fields change. Repeated list flags replace the whole list.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Recipe id
    pub id: String,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New category
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub recipe_type: Option<String>,

    /// New image file path or URL
    #[arg(long, value_name = "URI", conflicts_with = "clear_image")]
    pub image: Option<String>,

    /// Remove the image
    #[arg(long)]
    pub clear_image: bool,

    /// Replacement ingredient list (repeat for more)
    #[arg(short, long = "ingredient", value_name = "TEXT")]
    pub ingredients: Vec<String>,

    /// Replacement step list (repeat for more)
    #[arg(short, long = "step", value_name = "TEXT")]
    pub steps: Vec<String>,
}

impl EditCommand {
    /// Apply the given fields to an edit form.
    pub fn apply(&self, form: &mut RecipeForm) {
        if let Some(name) = &self.name {
            form.set_name(name.clone());
        }
        if let Some(recipe_type) = &self.recipe_type {
            form.set_type(recipe_type.clone());
        }
        if let Some(image) = &self.image {
            form.set_image(image.clone());
        } else if self.clear_image {
            form.clear_image();
        }
        if !self.ingredients.is_empty() {
            form.set_ingredients(self.ingredients.iter().cloned());
        }
        if !self.steps.is_empty() {
            form.set_steps(self.steps.iter().cloned());
        }
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Recipe id
    pub id: String,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
