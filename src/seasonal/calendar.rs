use csv::ReaderBuilder;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const MONTH_COL: &str = "month";
const PRODUCE_COL: &str = "produce";

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Calendar file not found at: {0:?}")]
    NotFound(std::path::PathBuf),
    #[error("Calendar CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Column '{0}' not found")]
    MissingColumn(&'static str),
    #[error("Invalid month '{0}' (expected 1-12)")]
    InvalidMonth(String),
    #[error("Month {0} is defined more than once")]
    DuplicateMonth(u32),
    #[error("Month {0} is missing from the calendar")]
    MissingMonth(u32),
}

/// "January" for 1 through "December" for 12.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

/// Produce in season for each month of the year.
///
/// Always holds exactly twelve months; names are stored lowercase and keep
/// their configured order, which decides which name wins when an ingredient
/// mentions several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonalCalendar {
    months: [Vec<String>; 12],
}

impl SeasonalCalendar {
    /// Builds a calendar from `(month, produce)` entries. Every month from 1
    /// to 12 must appear exactly once.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = (u32, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut months: [Option<Vec<String>>; 12] = Default::default();
        for (month, produce) in entries {
            if !(1..=12).contains(&month) {
                return Err(CalendarError::InvalidMonth(month.to_string()));
            }
            let slot = &mut months[(month - 1) as usize];
            if slot.is_some() {
                return Err(CalendarError::DuplicateMonth(month));
            }
            *slot = Some(
                produce
                    .into_iter()
                    .map(|p| p.as_ref().trim().to_lowercase())
                    .filter(|p| !p.is_empty())
                    .collect(),
            );
        }

        let mut filled: [Vec<String>; 12] = Default::default();
        for (idx, slot) in months.into_iter().enumerate() {
            filled[idx] = slot.ok_or(CalendarError::MissingMonth(idx as u32 + 1))?;
        }
        Ok(Self { months: filled })
    }

    /// Loads a calendar from a CSV file with `month` and `produce` columns,
    /// produce names separated by `;`.
    pub fn from_csv(path: &Path) -> Result<Self, CalendarError> {
        if !path.exists() {
            return Err(CalendarError::NotFound(path.to_path_buf()));
        }
        let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
        let headers = rdr.headers()?.clone();
        let month_idx = headers
            .iter()
            .position(|h| h.trim() == MONTH_COL)
            .ok_or(CalendarError::MissingColumn(MONTH_COL))?;
        let produce_idx = headers
            .iter()
            .position(|h| h.trim() == PRODUCE_COL)
            .ok_or(CalendarError::MissingColumn(PRODUCE_COL))?;

        let mut entries = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let raw_month = record.get(month_idx).unwrap_or("").trim();
            let month = raw_month
                .parse::<u32>()
                .map_err(|_| CalendarError::InvalidMonth(raw_month.to_string()))?;
            let produce: Vec<String> = record
                .get(produce_idx)
                .unwrap_or("")
                .split(';')
                .map(str::to_string)
                .collect();
            entries.push((month, produce));
        }

        let calendar = Self::from_entries(entries)?;
        info!("Loaded seasonal calendar from {:?}", path);
        Ok(calendar)
    }

    /// The built-in Colorado growing-season table.
    pub fn colorado() -> Self {
        let table: [(u32, &[&str]); 12] = [
            (1, &["carrots", "beets", "turnips", "parsnips", "winter squash", "butternut squash", "acorn squash", "potatoes", "onions", "cabbage", "kale"]),
            (2, &["carrots", "beets", "turnips", "parsnips", "winter squash", "butternut squash", "potatoes", "onions", "cabbage", "kale"]),
            (3, &["spinach", "lettuce", "carrots", "beets", "turnips", "parsnips", "kale"]),
            (4, &["asparagus", "radishes", "spinach", "lettuce", "green onions", "scallions", "rhubarb", "arugula"]),
            (5, &["asparagus", "peas", "snap peas", "strawberries", "lettuce", "radishes", "spinach", "herbs", "basil", "cilantro", "mint", "chives"]),
            (6, &["strawberries", "cherries", "peas", "green beans", "zucchini", "summer squash", "cucumbers", "lettuce", "herbs", "basil", "cilantro"]),
            (7, &["sweet corn", "corn", "tomatoes", "peaches", "melons", "cantaloupe", "watermelon", "peppers", "bell peppers", "green beans", "zucchini", "cucumbers", "berries", "raspberries", "blackberries", "cherries"]),
            (8, &["tomatoes", "peaches", "sweet corn", "corn", "melons", "cantaloupe", "watermelon", "peppers", "bell peppers", "eggplant", "green beans", "plums", "grapes", "zucchini"]),
            (9, &["apples", "pears", "tomatoes", "peppers", "bell peppers", "winter squash", "butternut squash", "sweet corn", "corn", "grapes", "carrots", "beets"]),
            (10, &["apples", "pears", "winter squash", "butternut squash", "acorn squash", "pumpkin", "carrots", "beets", "turnips", "brussels sprouts", "kale", "cabbage"]),
            (11, &["winter squash", "butternut squash", "acorn squash", "carrots", "beets", "turnips", "parsnips", "potatoes", "kale", "brussels sprouts", "cabbage", "apples"]),
            (12, &["carrots", "beets", "turnips", "parsnips", "winter squash", "butternut squash", "potatoes", "onions", "cabbage", "kale"]),
        ];
        let months = table.map(|(_, produce)| produce.iter().map(|p| p.to_string()).collect::<Vec<String>>());
        Self { months }
    }

    /// Produce in season for `month` (1-12). Any other month yields an empty
    /// slice rather than an error.
    pub fn produce_for_month(&self, month: u32) -> &[String] {
        month
            .checked_sub(1)
            .and_then(|idx| self.months.get(idx as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for SeasonalCalendar {
    fn default() -> Self {
        Self::colorado()
    }
}
