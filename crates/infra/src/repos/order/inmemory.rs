use super::IOrderRepo;
use crate::repos::shared::inmemory_repo::*;
use autogift_domain::{Order, ID};

pub struct InMemoryOrderRepo {
    orders: std::sync::Mutex<Vec<Order>>,
}

impl InMemoryOrderRepo {
    pub fn new() -> Self {
        Self {
            orders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IOrderRepo for InMemoryOrderRepo {
    async fn insert(&self, order: &Order) -> anyhow::Result<()> {
        insert(order, &self.orders);
        Ok(())
    }

    async fn save(&self, order: &Order) -> anyhow::Result<()> {
        save(order, &self.orders);
        Ok(())
    }

    async fn find(&self, order_id: &ID) -> anyhow::Result<Option<Order>> {
        Ok(find(order_id, &self.orders))
    }

    async fn cancel_pending(&self, order_id: &ID, now: i64) -> anyhow::Result<bool> {
        let cancelled = update_many(
            &self.orders,
            |o| o.id == *order_id && o.is_cancellable(),
            |o| {
                o.cancel(now);
            },
        );
        Ok(!cancelled.is_empty())
    }
}
