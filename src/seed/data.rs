use crate::model::Customer;
use crate::store::traits::Store;
use anyhow::Result;

/// User-Agent of a crawler that is blocked in the demonstration data
pub const SEED_BLOCKED_USER_AGENT: &str = "A6-Indexer";
/// Remote IP that is blocked in the demonstration data
pub const SEED_BLOCKED_IP: &str = "0";

/// Load demonstration customers and blocklist entries.
///
/// Safe to run repeatedly: every write is an upsert.
pub async fn load_seed_data<S: Store + ?Sized>(store: &S) -> Result<()> {
    let customers = [
        Customer::sink(),
        Customer::new(2, "Big News Media Corp"),
        Customer::inactive(3, "Online Mega Store"),
        Customer::new(4, "Nachoroo Delivery"),
    ];

    for customer in customers {
        log::info!("Seeding customer {} ({})", customer.id, customer.name);
        store.upsert_customer(customer).await?;
    }

    store.block_ip(SEED_BLOCKED_IP).await?;
    store.block_user_agent(SEED_BLOCKED_USER_AGENT).await?;

    Ok(())
}
