use crate::recipe::Recipe;

/// Search text plus per-category tag selections.
///
/// A recipe passes when the query (if any) appears in its title, notes or
/// source, and when every category with a selection shares at least one tag
/// with the recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub query: Option<String>,
    pub protein: Vec<String>,
    pub cuisine: Vec<String>,
    pub method: Vec<String>,
    pub meal_type: Vec<String>,
    pub effort: Vec<String>,
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

fn any_selected(selected: &[String], recipe_tags: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|tag| recipe_tags.contains(tag))
}

impl RecipeFilter {
    fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    pub fn has_active_filters(&self) -> bool {
        self.query().is_some()
            || [&self.protein, &self.cuisine, &self.method, &self.meal_type, &self.effort]
                .iter()
                .any(|selected| !selected.is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(query) = self.query() {
            let query = query.to_lowercase();
            let hit = contains_ci(Some(recipe.title.as_str()), &query)
                || contains_ci(recipe.notes.as_deref(), &query)
                || contains_ci(recipe.source.as_deref(), &query);
            if !hit {
                return false;
            }
        }

        let tags = &recipe.tags;
        let effort: Vec<String> = tags.effort.iter().cloned().collect();
        any_selected(&self.protein, &tags.protein)
            && any_selected(&self.cuisine, &tags.cuisine)
            && any_selected(&self.method, &tags.method)
            && any_selected(&self.meal_type, &tags.meal_type)
            && any_selected(&self.effort, &effort)
    }

    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}
