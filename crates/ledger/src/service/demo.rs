use chrono::{Datelike as _, Days, NaiveDate};
use eyre::{eyre, Result};
use rand::{rngs::StdRng, seq::SliceRandom as _, Rng as _, SeedableRng as _};
use serde::Serialize;

type ActivityRange = (&'static str, f64, f64);

/// Activities with the usual value range of one reading.
const ACTIVITIES: &[(&str, &[ActivityRange])] = &[
    (
        "Energy",
        &[("Grid Electricity", 200.0, 5000.0), ("Natural Gas", 50.0, 1000.0)],
    ),
    (
        "Transport",
        &[
            ("Petrol (Passenger Car)", 20.0, 150.0),
            ("Diesel (Truck/Van)", 50.0, 300.0),
        ],
    ),
    (
        "Waste",
        &[("General Landfill", 0.1, 2.0), ("Paper Recycling", 0.05, 0.5)],
    ),
    ("Water", &[("Municipal Water", 10.0, 100.0)]),
    (
        "Travel",
        &[
            ("Short-haul Flight", 300.0, 1500.0),
            ("Long-haul Flight", 3000.0, 12000.0),
        ],
    ),
];

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DemoRow {
    pub activity_date: NaiveDate,
    pub category: &'static str,
    pub activity: &'static str,
    pub value: f64,
}

/// Readings over the `days` before `today`: every 1 to 3 days, 2 to 4
/// categories get one reading each. Energy runs higher in summer and winter.
/// The same seed gives the same rows. Fails when the first day is out of the calendar range.
pub fn demo_rows(today: NaiveDate, days: u64, seed: u64) -> Result<Vec<DemoRow>> {
    let mut date = today
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| eyre!("{} days before {} is out of range", days, today))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();

    while date <= today {
        let count = rng.gen_range(2..=4);
        for &(category, activities) in ACTIVITIES.choose_multiple(&mut rng, count) {
            let (activity, min, max) = activities[rng.gen_range(0..activities.len())];
            let mut value = rng.gen_range(min..max);
            if category == "Energy" && matches!(date.month(), 12 | 1 | 2 | 6 | 7 | 8) {
                value *= 1.3;
            }
            value *= rng.gen_range(0.9..1.1);
            rows.push(DemoRow {
                activity_date: date,
                category,
                activity,
                value: (value * 100.0).round() / 100.0,
            });
        }
        date = date + Days::new(rng.gen_range(1..=3));
    }
    Ok(rows)
}

pub fn demo_csv(rows: &[DemoRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
