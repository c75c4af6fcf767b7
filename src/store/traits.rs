use crate::model::{Customer, CustomerId, DailyCounts, HourBucket};
use anyhow::Result;
use chrono::NaiveDate;

#[async_trait::async_trait]
pub trait CustomerStore: Send + Sync {
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>>;
    async fn upsert_customer(&self, customer: Customer) -> Result<()>;
}

/// Exact-match blocklists for remote IPs and User-Agent strings
#[async_trait::async_trait]
pub trait BlocklistStore: Send + Sync {
    async fn is_ip_blocked(&self, ip: &str) -> Result<bool>;
    async fn is_user_agent_blocked(&self, user_agent: &str) -> Result<bool>;
    async fn block_ip(&self, ip: &str) -> Result<()>;
    async fn block_user_agent(&self, user_agent: &str) -> Result<()>;
}

/// Hourly request counters keyed by `(customer, hour bucket)`
#[async_trait::async_trait]
pub trait StatsStore: Send + Sync {
    /// Increment the valid or invalid counter of a bucket, creating it if absent
    async fn record_request(&self, customer_id: CustomerId, bucket: HourBucket, valid: bool) -> Result<()>;
    /// Sum the buckets of one customer over a day
    async fn customer_daily_counts(&self, customer_id: CustomerId, day: NaiveDate) -> Result<DailyCounts>;
    /// Sum valid and invalid counts of every customer over a day
    async fn daily_total(&self, day: NaiveDate) -> Result<i64>;
}

pub trait Store: CustomerStore + BlocklistStore + StatsStore + Send + Sync {}
impl<T: CustomerStore + BlocklistStore + StatsStore + Send + Sync> Store for T {}
