use anyhow::Result;
use chrono::NaiveDate;

use crate::logic::classify::Classification;
use crate::model::{CustomerId, DailyCounts, HourBucket};
use crate::store::traits::Store;

/// Statistics of one customer together with the day's total over all customers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReport {
    pub customer_id: CustomerId,
    pub customer: DailyCounts,
    pub all_customers: i64,
}

pub struct Counters;

impl Counters {
    /// Count a classified request in its hour bucket
    pub async fn record<S: Store + ?Sized>(
        store: &S,
        classification: &Classification,
        bucket: HourBucket,
    ) -> Result<()> {
        store
            .record_request(classification.customer_id, bucket, classification.verdict.is_valid())
            .await
    }

    pub async fn daily_report<S: Store + ?Sized>(
        store: &S,
        customer_id: CustomerId,
        day: NaiveDate,
    ) -> Result<DailyReport> {
        let customer = store.customer_daily_counts(customer_id, day).await?;
        let all_customers = store.daily_total(day).await?;

        Ok(DailyReport {
            customer_id,
            customer,
            all_customers,
        })
    }
}
