pub mod amount_format;
pub mod api_connection;
pub mod cli;
pub mod config;
pub mod logging;
pub mod recipe;
pub mod recipe_filter;
pub mod recipe_import;
pub mod scaling;
pub mod seasonal;

pub use amount_format::{format_amount, render_ingredient_line, IngredientLine};
pub use recipe::{Ingredient, IngredientScalingInfo, Recipe, RecipeCollection};
pub use scaling::{scale_amount, ServingContext};
pub use seasonal::{SeasonalCalendar, SeasonalMatcher};
