use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::model::{day_range, Customer, CustomerId, DailyCounts, HourBucket};
use crate::store::traits::{BlocklistStore, CustomerStore, StatsStore};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl CustomerStore for PostgresStore {
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query("SELECT id, name, active FROM customer WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch customer")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Customer {
            id: row.get("id"),
            name: row.get("name"),
            active: row.get("active"),
        }))
    }

    async fn upsert_customer(&self, customer: Customer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO customer (id, name, active)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                active = EXCLUDED.active
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(customer.active)
        .execute(&self.pool)
        .await
        .context("Failed to upsert customer")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl BlocklistStore for PostgresStore {
    async fn is_ip_blocked(&self, ip: &str) -> Result<bool> {
        let blocked: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM ip_blacklist WHERE ip = $1)")
                .bind(ip)
                .fetch_one(&self.pool)
                .await
                .context("Failed to check IP blocklist")?;

        Ok(blocked)
    }

    async fn is_user_agent_blocked(&self, user_agent: &str) -> Result<bool> {
        let blocked: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM ua_blacklist WHERE ua = $1)")
                .bind(user_agent)
                .fetch_one(&self.pool)
                .await
                .context("Failed to check User-Agent blocklist")?;

        Ok(blocked)
    }

    async fn block_ip(&self, ip: &str) -> Result<()> {
        sqlx::query("INSERT INTO ip_blacklist (ip) VALUES ($1) ON CONFLICT (ip) DO NOTHING")
            .bind(ip)
            .execute(&self.pool)
            .await
            .context("Failed to block IP")?;

        Ok(())
    }

    async fn block_user_agent(&self, user_agent: &str) -> Result<()> {
        sqlx::query("INSERT INTO ua_blacklist (ua) VALUES ($1) ON CONFLICT (ua) DO NOTHING")
            .bind(user_agent)
            .execute(&self.pool)
            .await
            .context("Failed to block User-Agent")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl StatsStore for PostgresStore {
    async fn record_request(&self, customer_id: CustomerId, bucket: HourBucket, valid: bool) -> Result<()> {
        let (valid_increment, invalid_increment): (i64, i64) = if valid { (1, 0) } else { (0, 1) };

        sqlx::query(
            r#"
            INSERT INTO hourly_stats (customer_id, hour, request_count, invalid_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (customer_id, hour) DO UPDATE SET
                request_count = hourly_stats.request_count + EXCLUDED.request_count,
                invalid_count = hourly_stats.invalid_count + EXCLUDED.invalid_count
            "#,
        )
        .bind(customer_id)
        .bind(bucket.start())
        .bind(valid_increment)
        .bind(invalid_increment)
        .execute(&self.pool)
        .await
        .context("Failed to update hourly stats")?;

        Ok(())
    }

    async fn customer_daily_counts(&self, customer_id: CustomerId, day: NaiveDate) -> Result<DailyCounts> {
        let (start, end) = day_range(day);
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(request_count), 0)::BIGINT AS valid,
                COALESCE(SUM(invalid_count), 0)::BIGINT AS invalid
            FROM hourly_stats
            WHERE customer_id = $1 AND hour >= $2 AND hour < $3
            "#,
        )
        .bind(customer_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .context("Failed to fetch customer daily stats")?;

        Ok(DailyCounts {
            valid: row.get("valid"),
            invalid: row.get("invalid"),
        })
    }

    async fn daily_total(&self, day: NaiveDate) -> Result<i64> {
        let (start, end) = day_range(day);
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(request_count + invalid_count), 0)::BIGINT
            FROM hourly_stats
            WHERE hour >= $1 AND hour < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .context("Failed to fetch daily stats")?;

        Ok(total)
    }
}
