use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::matcher::SeasonalMatcher;
use crate::recipe::{Recipe, RecipeCollection};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalSuggestion<'a> {
    pub recipe: &'a Recipe,
    pub seasonal_ingredient: String,
}

/// Every recipe with at least one in-season ingredient, in collection order.
///
/// Ingredients are checked in display order and each recipe is reported once,
/// under its first matching ingredient.
pub fn collect_seasonal_matches<'a>(
    collection: &'a RecipeCollection,
    matcher: &SeasonalMatcher,
    seasonal_produce: &[String],
) -> Vec<SeasonalSuggestion<'a>> {
    if seasonal_produce.is_empty() {
        return Vec::new();
    }

    let by_recipe = collection.ingredients_by_recipe();
    let mut matches = Vec::new();
    for recipe in &collection.recipes {
        let Some(ingredients) = by_recipe.get(recipe.id.as_str()) else {
            continue;
        };
        let hit = ingredients
            .iter()
            .find_map(|ing| matcher.match_ingredient(ing.match_text(), seasonal_produce));
        if let Some(produce) = hit {
            debug!(recipe = %recipe.title, produce, "Seasonal match");
            matches.push(SeasonalSuggestion {
                recipe,
                seasonal_ingredient: produce.to_string(),
            });
        }
    }
    matches
}

/// Shuffles the matches and keeps at most `limit` of them.
pub fn sample_suggestions<'a, R: Rng + ?Sized>(
    mut matches: Vec<SeasonalSuggestion<'a>>,
    limit: usize,
    rng: &mut R,
) -> Vec<SeasonalSuggestion<'a>> {
    matches.shuffle(rng);
    matches.truncate(limit);
    matches
}

/// Matches for `month`, shuffled and limited for display.
pub fn suggest_for_month<'a, R: Rng + ?Sized>(
    collection: &'a RecipeCollection,
    matcher: &SeasonalMatcher,
    month: u32,
    limit: usize,
    rng: &mut R,
) -> Vec<SeasonalSuggestion<'a>> {
    let produce = matcher.produce_for_month(month);
    let matches = collect_seasonal_matches(collection, matcher, produce);
    debug!(month, candidates = matches.len(), limit, "Sampling seasonal suggestions");
    sample_suggestions(matches, limit, rng)
}
