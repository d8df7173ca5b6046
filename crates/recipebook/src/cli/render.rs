//! Plain-text rendering for CLI output.

use std::fmt::Write as _;

use chrono::{Local, TimeZone};

use crate::recipe::Recipe;
use crate::store::StoreStats;

/// Format epoch milliseconds as local time.
#[must_use]
pub fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| millis.to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// One line per recipe for `list`.
#[must_use]
pub fn recipe_line(recipe: &Recipe) -> String {
    let image = if recipe.has_image() { " [img]" } else { "" };
    format!(
        "{}  {:<10} {}{}",
        recipe.id, recipe.recipe_type, recipe.name, image
    )
}

/// Full description for `show`.
#[must_use]
pub fn recipe_detail(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.name);
    let _ = writeln!(out, "{}", "=".repeat(recipe.name.chars().count().max(1)));
    let _ = writeln!(out, "Id:       {}", recipe.id);
    let _ = writeln!(out, "Type:     {}", recipe.recipe_type);
    if let Some(image) = recipe.image_url.as_deref().filter(|u| !u.is_empty()) {
        let _ = writeln!(out, "Image:    {image}");
    }
    let _ = writeln!(out, "Created:  {}", format_timestamp(recipe.created_at));
    let _ = writeln!(out, "Updated:  {}", format_timestamp(recipe.updated_at));

    let _ = writeln!(out);
    let _ = writeln!(out, "Ingredients");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  - {}", ingredient.text);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Steps");
    for (n, step) in recipe.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", n + 1, step.text);
    }
    out
}

/// Per-category breakdown for `status`.
#[must_use]
pub fn stats_lines(stats: &StoreStats) -> Vec<String> {
    stats
        .by_type
        .iter()
        .map(|(recipe_type, count)| format!("  {recipe_type:<12} {count}"))
        .collect()
}
