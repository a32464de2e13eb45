use super::calendar::SeasonalCalendar;

/// Fragments that mark a processed or shelf-stable form of a produce item.
pub const DEFAULT_PANTRY_INDICATORS: &[&str] = &[
    "paste", "canned", "dried", "powder", "powdered", "frozen",
    "sauce", "juice", "puree", "extract", "oil", "vinegar",
];

/// Decides whether free ingredient text names something in season.
///
/// Matching is plain lowercase substring search, with no tokenizing or
/// stemming, so "tomatoes" matches "2 cups fresh tomatoes" and also any
/// unrelated word that happens to contain it.
#[derive(Debug, Clone)]
pub struct SeasonalMatcher {
    calendar: SeasonalCalendar,
    pantry_indicators: Vec<String>,
}

impl SeasonalMatcher {
    pub fn new(calendar: SeasonalCalendar) -> Self {
        Self::with_pantry_indicators(calendar, DEFAULT_PANTRY_INDICATORS)
    }

    pub fn with_pantry_indicators<S: AsRef<str>>(calendar: SeasonalCalendar, indicators: &[S]) -> Self {
        Self {
            calendar,
            pantry_indicators: indicators.iter().map(|i| i.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn calendar(&self) -> &SeasonalCalendar {
        &self.calendar
    }

    pub fn produce_for_month(&self, month: u32) -> &[String] {
        self.calendar.produce_for_month(month)
    }

    fn has_pantry_indicator(&self, lower: &str) -> bool {
        self.pantry_indicators.iter().any(|i| lower.contains(i.as_str()))
    }

    pub fn is_pantry_item(&self, text: &str) -> bool {
        self.has_pantry_indicator(&text.to_lowercase())
    }

    /// Returns the first entry of `seasonal_list` found in `text`, or `None`.
    ///
    /// Text containing any pantry indicator never matches, so "tomato paste"
    /// is rejected before the produce list is consulted.
    pub fn match_ingredient<'a, S: AsRef<str>>(&self, text: &str, seasonal_list: &'a [S]) -> Option<&'a str> {
        let lower = text.to_lowercase();
        if self.has_pantry_indicator(&lower) {
            return None;
        }
        seasonal_list
            .iter()
            .map(|produce| produce.as_ref())
            .find(|produce| lower.contains(&produce.to_lowercase()))
    }

    /// Matches against the produce of `month`.
    pub fn match_in_month(&self, text: &str, month: u32) -> Option<&str> {
        self.match_ingredient(text, self.produce_for_month(month))
    }
}

impl Default for SeasonalMatcher {
    fn default() -> Self {
        Self::new(SeasonalCalendar::colorado())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_fresh_produce() {
        let matcher = SeasonalMatcher::default();
        let july = matcher.produce_for_month(7);
        assert_eq!(matcher.match_ingredient("2 cups fresh tomatoes", july), Some("tomatoes"));
        assert_eq!(matcher.match_ingredient("3 Ears CORN, shucked", july), Some("corn"));
    }

    #[test]
    fn test_pantry_indicator_blocks_match() {
        let matcher = SeasonalMatcher::default();
        let july = matcher.produce_for_month(7);
        assert_eq!(matcher.match_ingredient("1 tbsp tomato paste", july), None);
        assert_eq!(matcher.match_ingredient("1 can canned tomatoes", july), None);
        assert_eq!(matcher.match_ingredient("1 cup frozen corn", july), None);
        assert!(matcher.is_pantry_item("Olive OIL"));
        assert!(!matcher.is_pantry_item("2 cups fresh tomatoes"));
        assert_eq!(matcher.match_ingredient("Tomato PASTE", &["tomato"]), None);
    }

    #[test]
    fn test_no_seasonal_substring() {
        let matcher = SeasonalMatcher::default();
        assert_eq!(matcher.match_ingredient("1 cup flour", matcher.produce_for_month(7)), None);
        assert_eq!(matcher.match_ingredient("2 cups fresh tomatoes", matcher.produce_for_month(1)), None);
    }

    #[test]
    fn test_first_match_in_list_order_wins() {
        let matcher = SeasonalMatcher::default();
        // "sweet corn" precedes "corn" in July.
        assert_eq!(matcher.match_in_month("4 ears sweet corn", 7), Some("sweet corn"));
        let list = ["corn", "sweet corn"];
        assert_eq!(matcher.match_ingredient("4 ears sweet corn", &list), Some("corn"));
    }

    #[test]
    fn test_coarse_substring_matching_is_kept() {
        let matcher = SeasonalMatcher::default();
        // "peas" inside an unrelated word still matches.
        assert_eq!(matcher.match_ingredient("1 tsp chickpeas", &["peas"]), Some("peas"));
    }

    #[test]
    fn test_custom_calendar_and_indicators() {
        let calendar = SeasonalCalendar::from_entries((1..=12).map(|m| (m, vec!["Morels"]))).unwrap();
        let matcher = SeasonalMatcher::with_pantry_indicators(calendar, &["Smoked"]);
        assert_eq!(matcher.match_in_month("a handful of morels", 3), Some("morels"));
        assert_eq!(matcher.match_in_month("smoked morels", 3), None);
        // "dried" is not an indicator for this matcher.
        assert_eq!(matcher.match_in_month("dried morels", 3), Some("morels"));
        assert_eq!(matcher.match_in_month("morels", 0), None);
    }
}
