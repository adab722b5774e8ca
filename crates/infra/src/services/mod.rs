mod email;
mod functions;
mod order_processor;

use crate::Config;
pub use email::{FunctionsEmailSender, IEmailSender, InMemoryEmailSender, SentEmail};
use functions::FunctionsClient;
pub use order_processor::{FunctionsOrderProcessor, IOrderProcessor, InMemoryOrderProcessor};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct Services {
    pub order_processor: Arc<dyn IOrderProcessor>,
    pub email_sender: Arc<dyn IEmailSender>,
}

impl Services {
    pub fn create(config: &Config) -> Self {
        match &config.functions_base_url {
            Some(base_url) => {
                let functions = Arc::new(FunctionsClient::new(
                    base_url.clone(),
                    config.functions_service_key.clone(),
                ));
                Self {
                    order_processor: Arc::new(FunctionsOrderProcessor::new(functions.clone())),
                    email_sender: Arc::new(FunctionsEmailSender::new(functions)),
                }
            }
            None => {
                warn!("Did not find FUNCTIONS_BASE_URL environment variable. Orders and emails will only be recorded in memory.");
                Self::create_inmemory()
            }
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            order_processor: Arc::new(InMemoryOrderProcessor::new()),
            email_sender: Arc::new(InMemoryEmailSender::new()),
        }
    }
}
