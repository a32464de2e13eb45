pub mod calendar;
pub mod matcher;
pub mod suggestions;

pub use calendar::{month_name, CalendarError, SeasonalCalendar};
pub use matcher::{SeasonalMatcher, DEFAULT_PANTRY_INDICATORS};
pub use suggestions::{
    collect_seasonal_matches, sample_suggestions, suggest_for_month, SeasonalSuggestion,
    DEFAULT_SUGGESTION_LIMIT,
};
