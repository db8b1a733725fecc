use std::io::Read;

use cotax_core::calculations::RateTables;
use cotax_core::{RateSchedule, ScheduleError, TaxBracket, TaxpayerCategory};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading rate schedules.
#[derive(Debug, Error)]
pub enum RateLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown taxpayer category '{0}' (expected general, small_business or non_profit)")]
    UnknownCategory(String),

    #[error("Invalid {category} schedule: {source}")]
    InvalidSchedule {
        category: TaxpayerCategory,
        #[source]
        source: ScheduleError,
    },

    #[error("No rate brackets found")]
    Empty,
}

impl From<csv::Error> for RateLoaderError {
    fn from(err: csv::Error) -> Self {
        RateLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a rate schedule CSV file.
///
/// - `category`: `general`, `small_business` or `non_profit`
/// - `lower_bound`: first won of the bracket
/// - `upper_bound`: last won of the bracket (empty for the unbounded top bracket)
/// - `rate`: marginal rate as a fraction (e.g. `0.10` for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateScheduleRecord {
    pub category: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for rate schedules kept in CSV files.
///
/// Loaded schedules go through the same validation as the built-in ones, so
/// a gap or overlap in the file is rejected rather than silently taxed.
pub struct RateScheduleLoader;

impl RateScheduleLoader {
    /// Parse rate records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateScheduleRecord>, RateLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by category and validates each group.
    ///
    /// Schedules come back in the order their category first appears; rows
    /// within a category keep file order.
    pub fn schedules(records: &[RateScheduleRecord]) -> Result<Vec<RateSchedule>, RateLoaderError> {
        if records.is_empty() {
            return Err(RateLoaderError::Empty);
        }

        let mut groups: Vec<(TaxpayerCategory, Vec<TaxBracket>)> = Vec::new();
        for record in records {
            let category = TaxpayerCategory::parse(record.category.trim())
                .ok_or_else(|| RateLoaderError::UnknownCategory(record.category.clone()))?;
            let bracket = TaxBracket::new(record.lower_bound, record.upper_bound, record.rate);

            match groups.iter_mut().find(|(c, _)| *c == category) {
                Some((_, brackets)) => brackets.push(bracket),
                None => groups.push((category, vec![bracket])),
            }
        }

        groups
            .into_iter()
            .map(|(category, brackets)| {
                debug!(%category, brackets = brackets.len(), "rate schedule loaded");
                RateSchedule::new(category, brackets)
                    .map_err(|source| RateLoaderError::InvalidSchedule { category, source })
            })
            .collect()
    }

    /// Returns `base` with every schedule found in `reader` swapped in.
    ///
    /// Categories missing from the file keep their schedule from `base`.
    pub fn load_tables<R: Read>(
        base: RateTables,
        reader: R,
    ) -> Result<RateTables, RateLoaderError> {
        let records = Self::parse(reader)?;
        let tables = Self::schedules(&records)?
            .into_iter()
            .fold(base, RateTables::with_schedule);
        Ok(tables)
    }
}
