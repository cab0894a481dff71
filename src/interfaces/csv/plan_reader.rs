use crate::domain::plan::SubscriptionPlan;
use crate::error::{CheckoutError, Result};
use crate::infrastructure::in_memory::InMemoryPlanCatalog;
use std::io::Read;

/// Reads subscription plans from a CSV source.
///
/// Expected header: `slug,price_monthly,price_annual,price_first_time_monthly,price_first_time_annual`.
/// The first-time columns may be empty or left out entirely.
pub struct PlanReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PlanReader<R> {
    /// Creates a new `PlanReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes plans.
    pub fn plans(self) -> impl Iterator<Item = Result<SubscriptionPlan>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }

    /// Loads every plan into a fresh catalog, stopping at the first bad row.
    pub async fn into_catalog(self) -> Result<InMemoryPlanCatalog> {
        let catalog = InMemoryPlanCatalog::new();
        for plan in self.plans() {
            catalog.store(plan?).await;
        }
        Ok(catalog)
    }
}
