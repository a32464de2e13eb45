use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RecipeDataError {
    #[error("Recipe data file not found at: {0:?}")]
    NotFound(std::path::PathBuf),
    #[error("Failed to read recipe data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse recipe data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn scalable_or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RecipeTags {
    #[serde(default, deserialize_with = "null_as_default")]
    pub protein: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisine: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meal_type: Vec<String>,
    #[serde(default)]
    pub effort: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub servings: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub total_time_minutes: Option<u32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub wine_pairing: Option<String>,
    #[serde(default)]
    pub book_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: RecipeTags,
}

fn default_scalable() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub id: String,
    pub recipe_id: String,
    #[serde(default)]
    pub sort_order: i32,
    pub text: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub metric_amount: Option<f64>,
    #[serde(default)]
    pub metric_unit: Option<String>,
    #[serde(default = "default_scalable", deserialize_with = "scalable_or_true")]
    pub scalable: bool,
}

impl Ingredient {
    pub fn scaling_info(&self) -> IngredientScalingInfo {
        IngredientScalingInfo {
            amount: self.amount,
            unit: self.unit.clone(),
            item: self.item.clone(),
            raw_text: self.text.clone(),
            scalable: self.scalable,
        }
    }

    /// Text used for seasonal matching: the full line, or the item name when
    /// the line is empty.
    pub fn match_text(&self) -> &str {
        if !self.text.is_empty() {
            &self.text
        } else {
            self.item.as_deref().unwrap_or("")
        }
    }
}

/// The slice of an ingredient that scaling and display need.
///
/// When `amount` is `None` the `scalable` flag is irrelevant and the
/// ingredient is displayed from `raw_text`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngredientScalingInfo {
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub item: Option<String>,
    pub raw_text: String,
    pub scalable: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Direction {
    pub id: String,
    pub recipe_id: String,
    pub step_number: u32,
    pub text: String,
    #[serde(default)]
    pub user_note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeBook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// A JSON export of the recipe tables.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RecipeCollection {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub directions: Vec<Direction>,
    #[serde(default)]
    pub books: Vec<RecipeBook>,
}

impl RecipeCollection {
    pub fn load(path: &Path) -> Result<Self, RecipeDataError> {
        if !path.exists() {
            return Err(RecipeDataError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let collection = Self::from_json(&content)?;
        info!(
            recipes = collection.recipes.len(),
            ingredients = collection.ingredients.len(),
            "Loaded recipe data from {:?}",
            path
        );
        Ok(collection)
    }

    pub fn from_json(content: &str) -> Result<Self, RecipeDataError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Ingredients of one recipe in display order.
    pub fn ingredients_for(&self, recipe_id: &str) -> Vec<&Ingredient> {
        let mut ingredients: Vec<&Ingredient> = self
            .ingredients
            .iter()
            .filter(|i| i.recipe_id == recipe_id)
            .collect();
        ingredients.sort_by_key(|i| i.sort_order);
        ingredients
    }

    pub fn directions_for(&self, recipe_id: &str) -> Vec<&Direction> {
        let mut directions: Vec<&Direction> = self
            .directions
            .iter()
            .filter(|d| d.recipe_id == recipe_id)
            .collect();
        directions.sort_by_key(|d| d.step_number);
        directions
    }

    /// All ingredients grouped by recipe id, each group in display order.
    pub fn ingredients_by_recipe(&self) -> HashMap<&str, Vec<&Ingredient>> {
        let mut grouped: HashMap<&str, Vec<&Ingredient>> = HashMap::new();
        for ingredient in &self.ingredients {
            grouped.entry(ingredient.recipe_id.as_str()).or_default().push(ingredient);
        }
        for group in grouped.values_mut() {
            group.sort_by_key(|i| i.sort_order);
        }
        debug!(recipes_with_ingredients = grouped.len(), "Grouped ingredients by recipe");
        grouped
    }
}

/// "45 min", "1h", "1h 30m"; empty for missing or zero.
pub fn format_duration(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => String::new(),
        Some(m) if m < 60 => format!("{} min", m),
        Some(m) => {
            let hours = m / 60;
            let mins = m % 60;
            if mins > 0 {
                format!("{}h {}m", hours, mins)
            } else {
                format!("{}h", hours)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "recipes": [
            {"id": "r1", "title": "Summer Salad", "servings": 4,
             "tags": {"protein": ["Vegetarian"], "effort": "Quick (<30 min)"}}
        ],
        "ingredients": [
            {"id": "i2", "recipe_id": "r1", "sort_order": 2, "text": "1 bay leaf",
             "amount": 1, "item": "bay leaf", "scalable": false},
            {"id": "i1", "recipe_id": "r1", "sort_order": 1, "text": "2 cups tomatoes",
             "amount": 2, "unit": "cups", "item": "tomatoes"},
            {"id": "i3", "recipe_id": "r1", "sort_order": 3, "text": "", "item": "corn"}
        ],
        "directions": [
            {"id": "d2", "recipe_id": "r1", "step_number": 2, "text": "Serve."},
            {"id": "d1", "recipe_id": "r1", "step_number": 1, "text": "Chop."}
        ]
    }"#;

    #[test]
    fn test_from_json_defaults() {
        let collection = RecipeCollection::from_json(SAMPLE).unwrap();
        let recipe = collection.recipe("r1").unwrap();
        assert_eq!(recipe.servings, 4);
        assert!(recipe.tags.cuisine.is_empty());
        assert_eq!(recipe.tags.effort.as_deref(), Some("Quick (<30 min)"));
        assert!(recipe.notes.is_none());

        let tomatoes = collection.ingredients.iter().find(|i| i.id == "i1").unwrap();
        assert!(tomatoes.scalable, "scalable defaults to true");
        assert!(collection.books.is_empty());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let content = r#"{
            "recipes": [
                {"id": "r1", "title": "Stew", "servings": 4, "photo_urls": null,
                 "tags": {"protein": ["Beef"], "cuisine": null, "method": null, "effort": null}},
                {"id": "r2", "title": "Toast", "servings": 1, "tags": null}
            ],
            "ingredients": [
                {"id": "i1", "recipe_id": "r1", "text": "1 onion", "amount": 1, "scalable": null}
            ]
        }"#;
        let collection = RecipeCollection::from_json(content).unwrap();
        let stew = collection.recipe("r1").unwrap();
        assert_eq!(stew.tags.protein, vec!["Beef"]);
        assert!(stew.tags.cuisine.is_empty());
        assert!(stew.tags.method.is_empty());
        assert!(stew.photo_urls.is_empty());
        assert_eq!(collection.recipe("r2").unwrap().tags, RecipeTags::default());
        assert!(collection.ingredients[0].scalable);
    }

    #[test]
    fn test_ingredients_and_directions_are_ordered() {
        let collection = RecipeCollection::from_json(SAMPLE).unwrap();
        let ids: Vec<&str> = collection.ingredients_for("r1").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2", "i3"]);
        let steps: Vec<u32> = collection.directions_for("r1").iter().map(|d| d.step_number).collect();
        assert_eq!(steps, vec![1, 2]);
        assert!(collection.ingredients_for("missing").is_empty());

        let grouped = collection.ingredients_by_recipe();
        assert_eq!(grouped["r1"][0].id, "i1");
    }

    #[test]
    fn test_scaling_info_and_match_text() {
        let collection = RecipeCollection::from_json(SAMPLE).unwrap();
        let bay = collection.ingredients.iter().find(|i| i.id == "i2").unwrap();
        let info = bay.scaling_info();
        assert_eq!(info.amount, Some(1.0));
        assert!(!info.scalable);
        assert_eq!(info.raw_text, "1 bay leaf");

        let corn = collection.ingredients.iter().find(|i| i.id == "i3").unwrap();
        assert_eq!(corn.match_text(), "corn");
        assert_eq!(bay.match_text(), "1 bay leaf");
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", SAMPLE)?;
        file.flush()?;
        let collection = RecipeCollection::load(file.path())?;
        assert_eq!(collection.recipes.len(), 1);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let result = RecipeCollection::load(Path::new("no_such_recipes.json"));
        assert!(matches!(result, Err(RecipeDataError::NotFound(_))));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "");
        assert_eq!(format_duration(Some(0)), "");
        assert_eq!(format_duration(Some(45)), "45 min");
        assert_eq!(format_duration(Some(60)), "1h");
        assert_eq!(format_duration(Some(90)), "1h 30m");
    }
}
