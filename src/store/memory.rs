use anyhow::Result;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{day_range, Customer, CustomerId, DailyCounts, HourBucket};
use crate::store::traits::{BlocklistStore, CustomerStore, StatsStore};

/// Store kept entirely in process memory.
///
/// Used by the tests and by `store.backend = "memory"` for running without
/// PostgreSQL. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    blocked_ips: RwLock<HashSet<String>>,
    blocked_user_agents: RwLock<HashSet<String>>,
    /// Counters ordered by bucket so a day is a contiguous range
    hourly: RwLock<BTreeMap<(HourBucket, CustomerId), DailyCounts>>,
}

impl MemoryStore {
    /// Create an empty store holding only the sink customer
    pub fn new() -> Self {
        let store = Self::default();
        store
            .customers
            .write()
            .insert(crate::model::SINK_CUSTOMER_ID, Customer::sink());
        store
    }

    fn day_buckets(
        &self,
        day: NaiveDate,
    ) -> Vec<((HourBucket, CustomerId), DailyCounts)> {
        let (start, end) = day_range(day);
        let lower = (HourBucket::containing(start), CustomerId::MIN);
        let upper = (HourBucket::containing(end), CustomerId::MIN);
        self.hourly
            .read()
            .range(lower..upper)
            .map(|(key, counts)| (*key, *counts))
            .collect()
    }
}

#[async_trait::async_trait]
impl CustomerStore for MemoryStore {
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.customers.read().get(&id).cloned())
    }

    async fn upsert_customer(&self, customer: Customer) -> Result<()> {
        self.customers.write().insert(customer.id, customer);
        Ok(())
    }
}

#[async_trait::async_trait]
impl BlocklistStore for MemoryStore {
    async fn is_ip_blocked(&self, ip: &str) -> Result<bool> {
        Ok(self.blocked_ips.read().contains(ip))
    }

    async fn is_user_agent_blocked(&self, user_agent: &str) -> Result<bool> {
        Ok(self.blocked_user_agents.read().contains(user_agent))
    }

    async fn block_ip(&self, ip: &str) -> Result<()> {
        self.blocked_ips.write().insert(ip.to_string());
        Ok(())
    }

    async fn block_user_agent(&self, user_agent: &str) -> Result<()> {
        self.blocked_user_agents.write().insert(user_agent.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl StatsStore for MemoryStore {
    async fn record_request(&self, customer_id: CustomerId, bucket: HourBucket, valid: bool) -> Result<()> {
        let mut hourly = self.hourly.write();
        let counts = hourly.entry((bucket, customer_id)).or_default();
        if valid {
            counts.valid += 1;
        } else {
            counts.invalid += 1;
        }
        Ok(())
    }

    async fn customer_daily_counts(&self, customer_id: CustomerId, day: NaiveDate) -> Result<DailyCounts> {
        let counts = self
            .day_buckets(day)
            .into_iter()
            .filter(|((_, customer), _)| *customer == customer_id)
            .fold(DailyCounts::default(), |acc, (_, counts)| DailyCounts {
                valid: acc.valid + counts.valid,
                invalid: acc.invalid + counts.invalid,
            });
        Ok(counts)
    }

    async fn daily_total(&self, day: NaiveDate) -> Result<i64> {
        Ok(self
            .day_buckets(day)
            .iter()
            .map(|(_, counts)| counts.total())
            .sum())
    }
}
