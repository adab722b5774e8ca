use super::functions::FunctionsClient;
use autogift_domain::ID;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Resubmits an order for processing and fulfillment
#[async_trait::async_trait]
pub trait IOrderProcessor: Send + Sync {
    async fn process_order(&self, order_id: &ID) -> anyhow::Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessOrderBody {
    order_id: String,
}

pub struct FunctionsOrderProcessor {
    functions: Arc<FunctionsClient>,
}

impl FunctionsOrderProcessor {
    pub fn new(functions: Arc<FunctionsClient>) -> Self {
        Self { functions }
    }
}

#[async_trait::async_trait]
impl IOrderProcessor for FunctionsOrderProcessor {
    async fn process_order(&self, order_id: &ID) -> anyhow::Result<()> {
        let body = ProcessOrderBody {
            order_id: order_id.to_string(),
        };
        self.functions.invoke("process-order-v2", &body).await
    }
}

/// Records the orders it was asked to process
pub struct InMemoryOrderProcessor {
    processed: Mutex<Vec<ID>>,
}

impl InMemoryOrderProcessor {
    pub fn new() -> Self {
        Self {
            processed: Mutex::new(Vec::new()),
        }
    }

    pub fn processed(&self) -> Vec<ID> {
        self.processed.lock().unwrap().clone()
    }
}

impl Default for InMemoryOrderProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IOrderProcessor for InMemoryOrderProcessor {
    async fn process_order(&self, order_id: &ID) -> anyhow::Result<()> {
        self.processed.lock().unwrap().push(order_id.clone());
        Ok(())
    }
}
