//! `recipebook` - CLI for the recipe collection
//!
//! This binary opens the configured store and runs one command against it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;

use recipebook::cli::{render, Cli, Command, ConfigCommand, EditCommand, ListCommand};
use recipebook::form::{RecipeForm, SubmitOutcome};
use recipebook::{init_logging, open_backend, Config, Error, RecipeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Types => {
            handle_types(&config);
            Ok(())
        }
        command => {
            let seed_on_start = config.recipes.seed_on_start && !matches!(command, Command::Seed);
            let store = open_store(&config, seed_on_start).await?;
            run(&config, &store, command).await
        }
    }
}

async fn open_store(config: &Config, seed_on_start: bool) -> anyhow::Result<RecipeStore> {
    let backend = open_backend(config).context("failed to open storage")?;
    let store = RecipeStore::from_config(config, backend)?;
    if seed_on_start && store.seed_if_empty().await? {
        debug!("Seeded empty collection on start");
    }
    Ok(store)
}

async fn run(config: &Config, store: &RecipeStore, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List(cmd) => handle_list(store, &cmd).await,
        Command::Show(cmd) => {
            let recipe = store.require(&cmd.id).await?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&recipe)?);
            } else {
                print!("{}", render::recipe_detail(&recipe));
            }
            Ok(())
        }
        Command::Add(cmd) => {
            let mut form = cmd.to_form(config.default_category());
            if let SubmitOutcome::Created(recipe) = submit_form(&mut form, store).await? {
                println!("Added {}: {}", recipe.id, recipe.name);
            }
            Ok(())
        }
        Command::Edit(cmd) => handle_edit(config, store, &cmd).await,
        Command::Delete(cmd) => {
            if store.delete(&cmd.id).await? {
                println!("Deleted {}", cmd.id);
            } else {
                println!("No recipe with id {}; nothing deleted.", cmd.id);
            }
            Ok(())
        }
        Command::Seed => {
            if store.seed_if_empty().await? {
                println!("Seeded {} recipes.", store.count().await);
            } else {
                println!("Collection is not empty; nothing to seed.");
            }
            Ok(())
        }
        Command::Status(cmd) => handle_status(config, store, cmd.json).await,
        Command::Types | Command::Config(_) => Ok(()),
    }
}

async fn handle_list(store: &RecipeStore, cmd: &ListCommand) -> anyhow::Result<()> {
    let recipes = match &cmd.recipe_type {
        Some(recipe_type) => store.list_by_type(recipe_type).await,
        None => store.list_all().await,
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else if recipes.is_empty() {
        println!("No recipes.");
    } else {
        for recipe in &recipes {
            println!("{}", render::recipe_line(recipe));
        }
    }
    Ok(())
}

async fn handle_edit(
    config: &Config,
    store: &RecipeStore,
    cmd: &EditCommand,
) -> anyhow::Result<()> {
    let default_type = config.default_category();
    let Some(mut form) = RecipeForm::open(store, Some(cmd.id.as_str()), default_type).await else {
        return Err(Error::recipe_not_found(&cmd.id).into());
    };

    cmd.apply(&mut form);
    if !form.is_dirty() {
        println!("No changes.");
        return Ok(());
    }

    match submit_form(&mut form, store).await? {
        SubmitOutcome::Updated { found: true, id } => println!("Updated {id}"),
        SubmitOutcome::Updated { found: false, id } => bail!("recipe {id} disappeared before save"),
        SubmitOutcome::Created(recipe) => println!("Added {}: {}", recipe.id, recipe.name),
    }
    Ok(())
}

async fn submit_form(form: &mut RecipeForm, store: &RecipeStore) -> anyhow::Result<SubmitOutcome> {
    match form.submit(store).await {
        Err(e) if e.is_validation_error() => bail!("cannot save recipe: {e}"),
        result => Ok(result?),
    }
}

fn handle_types(config: &Config) {
    for category in &config.recipes.categories {
        println!("{category}");
    }
}

async fn handle_status(config: &Config, store: &RecipeStore, json: bool) -> anyhow::Result<()> {
    let stats = store.stats().await;
    let path = config.storage_path();

    if json {
        let status = serde_json::json!({
            "backend": store.backend_name(),
            "storage_path": path,
            "key": store.key(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("recipebook status");
        println!("-----------------");
        println!("Backend:       {}", store.backend_name());
        match &path {
            Some(path) => println!("Storage:       {}", path.display()),
            None => println!("Storage:       (in memory)"),
        }
        println!("Key:           {}", store.key());
        println!("Recipes:       {}", stats.total_recipes);
        if let Some(updated) = stats.newest_updated_at {
            println!("Last change:   {}", render::format_timestamp(updated));
        }
        for line in render::stats_lines(&stats) {
            println!("{line}");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {}", config.storage.backend);
                match config.storage_path() {
                    Some(path) => println!("  Path:               {}", path.display()),
                    None => println!("  Path:               (none)"),
                }
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Recipes]");
                println!("  Categories:         {}", config.recipes.categories.join(", "));
                println!("  Seed on start:      {}", config.recipes.seed_on_start);
                match &config.recipes.seed_file {
                    Some(path) => println!("  Seed file:          {}", path.display()),
                    None => println!("  Seed file:          (built-in)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
