mod inmemory;
mod postgres;

use autogift_domain::{Order, ID};
pub use inmemory::InMemoryOrderRepo;
pub use postgres::PostgresOrderRepo;

#[async_trait::async_trait]
pub trait IOrderRepo: Send + Sync {
    async fn insert(&self, order: &Order) -> anyhow::Result<()>;
    async fn save(&self, order: &Order) -> anyhow::Result<()>;
    async fn find(&self, order_id: &ID) -> anyhow::Result<Option<Order>>;
    /// Cancels the order if it has not been handed to the fulfillment
    /// provider yet. Returns whether the order was cancelled.
    async fn cancel_pending(&self, order_id: &ID, now: i64) -> anyhow::Result<bool>;
}
