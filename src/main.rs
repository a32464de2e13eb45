use anyhow::{anyhow, Context, Result};
use chrono::Datelike;
use rand::rngs::StdRng;
use rand::SeedableRng;
use recipe_box::amount_format::render_ingredient_line;
use recipe_box::api_connection::Provider;
use recipe_box::cli::{parse_args, Command};
use recipe_box::config::AppConfig;
use recipe_box::recipe::{format_duration, RecipeCollection};
use recipe_box::recipe_filter::RecipeFilter;
use recipe_box::recipe_import::{import_recipe_text, import_recipe_url, suggest_wine_pairing};
use recipe_box::scaling::ServingContext;
use recipe_box::seasonal::{month_name, suggest_for_month, SeasonalMatcher};
use std::path::Path;
use tokio::fs;
use tracing::info;

fn load_collection(path: &Path) -> Result<RecipeCollection> {
    RecipeCollection::load(path)
        .with_context(|| format!("Failed to load recipes from '{}'", path.display()))
}

fn print_scaled(collection: &RecipeCollection, id: &str, servings: Option<u32>) -> Result<()> {
    let recipe = collection
        .recipe(id)
        .ok_or_else(|| anyhow!("No recipe with id '{}'", id))?;
    let ctx = ServingContext::new(recipe.servings).with_target(servings.unwrap_or(recipe.servings));

    println!("{} ({} servings)", recipe.title, ctx.target());
    if ctx.is_scaled() {
        println!("Scaled from {} servings", ctx.original());
    }
    let total = format_duration(recipe.total_time_minutes);
    if !total.is_empty() {
        println!("Total time: {}", total);
    }

    println!("\nIngredients:");
    for ingredient in collection.ingredients_for(&recipe.id) {
        println!("  - {}", render_ingredient_line(&ingredient.scaling_info(), &ctx));
    }

    let directions = collection.directions_for(&recipe.id);
    if !directions.is_empty() {
        println!("\nDirections:");
        for direction in directions {
            println!("  {}. {}", direction.step_number, direction.text);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();
    recipe_box::logging::init(cli_args.verbose);
    let config = AppConfig::from_env()?;

    match cli_args.command {
        Command::Scale { recipes, id, servings } => {
            let collection = load_collection(&recipes)?;
            print_scaled(&collection, &id, servings)?;
        }
        Command::Seasonal { recipes, month, limit, seed } => {
            let collection = load_collection(&recipes)?;
            let matcher = SeasonalMatcher::new(config.load_calendar()?);
            let month = month.unwrap_or_else(|| chrono::Local::now().month());
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let limit = limit.unwrap_or(config.suggestion_limit);
            let suggestions = suggest_for_month(&collection, &matcher, month, limit, &mut rng);

            let name = month_name(month).unwrap_or("Unknown month");
            if suggestions.is_empty() {
                println!("No seasonal suggestions for {}.", name);
            } else {
                println!("In Season Now ({})", name);
                for suggestion in suggestions {
                    let time = format_duration(suggestion.recipe.total_time_minutes);
                    if time.is_empty() {
                        println!("  - {} [{}]", suggestion.recipe.title, suggestion.seasonal_ingredient);
                    } else {
                        println!(
                            "  - {} [{}] {}",
                            suggestion.recipe.title, suggestion.seasonal_ingredient, time
                        );
                    }
                }
            }
        }
        Command::Search { recipes, filter } => {
            let collection = load_collection(&recipes)?;
            let filter = RecipeFilter::from(filter);
            let found = filter.apply(&collection.recipes);
            for recipe in &found {
                println!("{}\t{}", recipe.id, recipe.title);
            }
            if filter.has_active_filters() {
                println!("{} recipe(s) (filtered from {})", found.len(), collection.recipes.len());
            } else {
                println!("{} recipe(s)", found.len());
            }
        }
        Command::Import { file, url } => {
            let provider = Provider::openrouter(&config.api_key_env_var);
            let imported = match (file, url) {
                (Some(path), _) => {
                    let text = fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read recipe file '{}'", path.display()))?;
                    info!("Importing recipe from {}", path.display());
                    import_recipe_text(&provider, &text, &config).await?
                }
                (None, Some(url)) => {
                    info!("Importing recipe from {}", url);
                    import_recipe_url(&provider, &url, &config).await?
                }
                (None, None) => return Err(anyhow!("Either --file or --url is required")),
            };
            println!("{}", serde_json::to_string_pretty(&imported)?);
        }
        Command::Pair { recipes, id, save } => {
            let mut collection = load_collection(&recipes)?;
            let provider = Provider::openrouter(&config.api_key_env_var);
            let mut recipe = collection
                .recipe(&id)
                .cloned()
                .ok_or_else(|| anyhow!("No recipe with id '{}'", id))?;
            let pairing = {
                let ingredients = collection.ingredients_for(&id);
                suggest_wine_pairing(&provider, &mut recipe, &ingredients, &config)
                    .await
                    .context("Failed to generate pairing")?
            };
            println!("{}\n\n{}", recipe.title, pairing);

            if save {
                if let Some(stored) = collection.recipes.iter_mut().find(|r| r.id == id) {
                    *stored = recipe;
                }
                fs::write(&recipes, serde_json::to_string_pretty(&collection)?)
                    .await
                    .with_context(|| format!("Failed to save pairing to '{}'", recipes.display()))?;
                info!("Saved pairing to {}", recipes.display());
            }
        }
    }

    Ok(())
}
