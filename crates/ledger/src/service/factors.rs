use std::ops::Deref;

use log::{info, warn};
use model::{
    errors::LedgerError,
    factor::{Co2e, EmissionFactor},
    session::Session,
};
use storage::factor::FactorStore;

/// Built-in factor table: (category, activity, kg CO2e per unit, unit, source).
const STANDARD_FACTORS: &[(&str, &str, f64, &str, &str)] = &[
    ("Electricity", "Grid", 0.757, "kWh", "CEA India v20"),
    ("Energy", "Grid Electricity", 0.757, "kWh", "CEA India v20"),
    ("Energy", "Natural Gas", 2.02, "m3", "DEFRA 2024"),
    ("Transport", "Petrol", 2.31, "Litre", "EPA Hub 2025"),
    ("Transport", "Diesel", 2.68, "Litre", "EPA Hub 2025"),
    ("Transport", "Petrol (Passenger Car)", 2.31, "Litre", "EPA Hub 2025"),
    ("Transport", "Diesel (Truck/Van)", 2.68, "Litre", "EPA Hub 2025"),
    ("Waste", "General Landfill", 467.0, "Tonne", "DEFRA 2024"),
    ("Waste", "Paper Recycling", 21.3, "Tonne", "DEFRA 2024"),
    ("Water", "Municipal Water", 0.344, "m3", "DEFRA 2024"),
    ("Travel", "Short-haul Flight", 0.151, "km", "DEFRA 2024"),
    ("Travel", "Long-haul Flight", 0.148, "km", "DEFRA 2024"),
];

pub fn standard_factors() -> Vec<EmissionFactor> {
    STANDARD_FACTORS
        .iter()
        .map(|(category, activity, factor, unit, source)| {
            EmissionFactor::new(category, activity, *factor, unit, source)
        })
        .collect()
}

#[derive(Clone)]
pub struct Factors {
    store: FactorStore,
}

impl Factors {
    pub fn new(store: FactorStore) -> Self {
        Factors { store }
    }

    /// Exact, case-sensitive match on the pair.
    pub async fn lookup(
        &self,
        session: &mut Session,
        category: &str,
        activity: &str,
    ) -> Result<EmissionFactor, LedgerError> {
        self.store
            .find(session, category, activity)
            .await?
            .ok_or_else(|| {
                warn!("No factor for {} - {}", category, activity);
                LedgerError::FactorNotFound {
                    category: category.to_string(),
                    activity: activity.to_string(),
                }
            })
    }

    pub async fn calculate_co2e(
        &self,
        session: &mut Session,
        category: &str,
        activity: &str,
        value: f64,
    ) -> Result<Co2e, LedgerError> {
        let factor = self.lookup(session, category, activity).await?;
        Ok(factor.apply(value))
    }

    /// Upserts the built-in table keyed by (category, activity).
    pub async fn seed(&self, session: &mut Session) -> Result<usize, LedgerError> {
        let factors = standard_factors();
        for factor in &factors {
            self.store.upsert(session, factor).await?;
        }
        info!("Seeded {} emission factors", factors.len());
        Ok(factors.len())
    }
}

impl Deref for Factors {
    type Target = FactorStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
