use chrono::{Datelike as _, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    /// First day of the bucket `date` falls into. Weeks start on Monday.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => date.week(Weekday::Mon).first_day(),
            Period::Month => date - Days::new(date.day0() as u64),
            Period::Year => date - Days::new(date.ordinal0() as u64),
        }
    }

    pub fn bucket_key(&self, start: NaiveDate) -> String {
        match self {
            Period::Day | Period::Week => start.format("%Y-%m-%d").to_string(),
            Period::Month => start.format("%Y-%m").to_string(),
            Period::Year => start.format("%Y").to_string(),
        }
    }
}
