use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api_connection::endpoints::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Provider};
use crate::api_connection::ApiConnectionError;
use crate::config::AppConfig;
use crate::recipe::{null_as_default, scalable_or_true, Direction, Ingredient, Recipe, RecipeTags};

/// Longest page text forwarded to the model.
pub const MAX_CONTENT_CHARS: usize = 100_000;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Api(#[from] ApiConnectionError),
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to fetch URL (status {0})")]
    FetchStatus(reqwest::StatusCode),
    #[error("Model returned an empty reply")]
    EmptyResponse,
    #[error("No JSON found in response")]
    NoJson,
    #[error("Failed to parse recipe data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ingredients named in the pairing prompt.
const PAIRING_KEY_INGREDIENTS: usize = 6;

fn default_servings() -> u32 {
    4
}

fn servings_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_servings))
}

fn default_scalable() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportedIngredient {
    pub text: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default = "default_scalable", deserialize_with = "scalable_or_true")]
    pub scalable: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportedRecipe {
    pub title: String,
    #[serde(default = "default_servings", deserialize_with = "servings_or_default")]
    pub servings: u32,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub total_time_minutes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<ImportedIngredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub directions: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: RecipeTags,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub wine_pairing: Option<String>,
}

impl ImportedRecipe {
    /// Splits the import into the records the recipe tables store, keyed by
    /// `recipe_id`.
    pub fn into_records(self, recipe_id: &str) -> (Recipe, Vec<Ingredient>, Vec<Direction>) {
        let ingredients = self
            .ingredients
            .into_iter()
            .enumerate()
            .map(|(idx, ing)| Ingredient {
                id: format!("{}-ing-{}", recipe_id, idx + 1),
                recipe_id: recipe_id.to_string(),
                sort_order: idx as i32 + 1,
                text: ing.text,
                amount: ing.amount,
                unit: ing.unit,
                item: ing.item,
                metric_amount: None,
                metric_unit: None,
                scalable: ing.scalable,
            })
            .collect();

        let directions = self
            .directions
            .into_iter()
            .enumerate()
            .map(|(idx, text)| Direction {
                id: format!("{}-step-{}", recipe_id, idx + 1),
                recipe_id: recipe_id.to_string(),
                step_number: idx as u32 + 1,
                text,
                user_note: None,
            })
            .collect();

        let recipe = Recipe {
            id: recipe_id.to_string(),
            title: self.title,
            servings: self.servings.max(1),
            photo_urls: Vec::new(),
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            total_time_minutes: self.total_time_minutes,
            source: self.source,
            notes: self.notes,
            wine_pairing: self.wine_pairing,
            book_id: None,
            tags: self.tags,
        };

        (recipe, ingredients, directions)
    }
}

fn extraction_prompt(content: &str) -> String {
    format!(
        "/no_thinking
Extract the recipe from this content and return structured JSON with these exact fields:
{{
  \"title\": \"string\",
  \"servings\": number,
  \"prep_time_minutes\": number or null,
  \"cook_time_minutes\": number or null,
  \"total_time_minutes\": number or null,
  \"ingredients\": [
    {{
      \"text\": \"full ingredient text\",
      \"amount\": number or null,
      \"unit\": \"string or null\",
      \"item\": \"ingredient name\",
      \"scalable\": boolean
    }}
  ],
  \"directions\": [\"step 1 text\", \"step 2 text\"],
  \"notes\": \"string or null\",
  \"tags\": {{
    \"protein\": [\"array of proteins like Beef, Pork, Chicken, Seafood, Lamb, Vegetarian, Vegan\"],
    \"cuisine\": [\"array like Mexican, Italian, Chinese, American, French, Thai, Japanese, Indian, Korean\"],
    \"method\": [\"array like Braised, Grilled, Stir-Fried, Roasted, Baked, Slow-Cooked, Fried, Raw\"],
    \"meal_type\": [\"array like Dinner, Lunch, Breakfast, Appetizer, Side, Dessert, Snack\"],
    \"effort\": \"Quick (<30 min)\" or \"Moderate\" or \"Project (2+ hours)\" or null
  }},
  \"source\": \"website or cookbook name\",
  \"wine_pairing\": \"1-2 wine suggestions + 1 non-alcoholic, 2-3 sentences\"
}}

For ingredients:
- Parse amounts as numbers (e.g., \"1/2\" = 0.5, \"1 1/2\" = 1.5)
- Set scalable to false for items like bay leaves, cinnamon sticks, or items that don't logically scale
- Keep the full text in the \"text\" field as fallback

For directions:
- Consolidate fragmented steps into logical paragraphs
- Each array element should be one complete step

Return ONLY valid JSON, no other text or markdown.

Content:
{}",
        content
    )
}

/// Keeps at most [`MAX_CONTENT_CHARS`] characters.
pub fn truncate_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

/// Pulls the JSON object out of a model reply: markdown fences are dropped and
/// the span from the first `{` to the last `}` is returned.
pub fn extract_json_object(reply: &str) -> Result<&str, ImportError> {
    let mut content = reply.trim();
    if content.starts_with("```json") {
        content = content.trim_start_matches("```json");
    } else if content.starts_with("```") {
        content = content.trim_start_matches("```");
    }
    content = content.trim_end_matches("```").trim();

    if content.is_empty() {
        return Err(ImportError::EmptyResponse);
    }
    let start = content.find('{').ok_or(ImportError::NoJson)?;
    let end = content.rfind('}').ok_or(ImportError::NoJson)?;
    if end < start {
        return Err(ImportError::NoJson);
    }
    Ok(&content[start..=end])
}

fn first_reply(response: &ChatCompletionResponse) -> Result<&str, ImportError> {
    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = ?usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "Chat completion usage"
        );
    }
    response
        .choices
        .first()
        .map(|choice| choice.message.content.trim())
        .filter(|content| !content.is_empty())
        .ok_or(ImportError::EmptyResponse)
}

pub fn parse_import_reply(reply: &str) -> Result<ImportedRecipe, ImportError> {
    let json = extract_json_object(reply)?;
    serde_json::from_str(json).map_err(|e| {
        warn!("Failed to deserialize recipe reply: {}", e);
        ImportError::Parse(e)
    })
}

pub async fn import_recipe_text(
    provider: &Provider,
    recipe_text: &str,
    config: &AppConfig,
) -> Result<ImportedRecipe, ImportError> {
    let request = ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![ChatMessage::user(extraction_prompt(truncate_content(recipe_text)))],
        temperature: Some(0.05),
        max_tokens: Some(4000),
    };

    let response = provider.call_chat_completion(request).await?;
    let content = first_reply(&response)?;
    debug!("Raw import reply:\n{}", content);

    let recipe = parse_import_reply(content)?;
    info!(
        title = %recipe.title,
        ingredients = recipe.ingredients.len(),
        directions = recipe.directions.len(),
        "Imported recipe"
    );
    Ok(recipe)
}

/// Downloads a page and imports the recipe it contains.
pub async fn import_recipe_url(
    provider: &Provider,
    url: &str,
    config: &AppConfig,
) -> Result<ImportedRecipe, ImportError> {
    let response = reqwest::Client::new()
        .get(url)
        .header("User-Agent", "Mozilla/5.0 (compatible; RecipeBox/1.0)")
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(ImportError::FetchStatus(response.status()));
    }
    let page = response.text().await?;
    debug!(bytes = page.len(), "Fetched recipe page {}", url);
    import_recipe_text(provider, &page, config).await
}

fn pairing_prompt(recipe: &Recipe, ingredients: &[&Ingredient]) -> String {
    let mut prompt = format!("Suggest wine and beverage pairings for this dish:\n\nTitle: {}\n", recipe.title);
    if !recipe.tags.protein.is_empty() {
        prompt.push_str(&format!("Proteins: {}\n", recipe.tags.protein.join(", ")));
    }
    if !recipe.tags.cuisine.is_empty() {
        prompt.push_str(&format!("Cuisine: {}\n", recipe.tags.cuisine.join(", ")));
    }
    let key_ingredients: Vec<&str> = ingredients
        .iter()
        .take(PAIRING_KEY_INGREDIENTS)
        .map(|ing| ing.item.as_deref().filter(|item| !item.is_empty()).unwrap_or(ing.text.as_str()))
        .collect();
    if !key_ingredients.is_empty() {
        prompt.push_str(&format!("Key ingredients: {}\n", key_ingredients.join(", ")));
    }
    prompt.push_str(
        "\nProvide:
1. 1-2 specific wine recommendations (include grape varietal and region if relevant)
2. 1 non-alcoholic alternative

Keep your response to 2-3 sentences total. Be specific and helpful.",
    );
    prompt
}

/// Asks the model for a drink pairing and stores it on `recipe`.
///
/// Only the first few ingredients are sent, named by `item` when present.
pub async fn suggest_wine_pairing(
    provider: &Provider,
    recipe: &mut Recipe,
    ingredients: &[&Ingredient],
    config: &AppConfig,
) -> Result<String, ImportError> {
    let request = ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![ChatMessage::user(pairing_prompt(recipe, ingredients))],
        temperature: None,
        max_tokens: Some(200),
    };

    let response = provider.call_chat_completion(request).await?;
    let pairing = first_reply(&response)?.to_string();
    info!(recipe = %recipe.id, "Generated wine pairing");
    recipe.wine_pairing = Some(pairing.clone());
    Ok(pairing)
}
