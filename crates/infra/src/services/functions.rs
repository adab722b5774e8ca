use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Client for the hosted remote functions (order processing, transactional emails)
pub struct FunctionsClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl FunctionsClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            service_key,
        }
    }

    pub async fn invoke(&self, function: &str, body: &impl Serialize) -> anyhow::Result<()> {
        match self
            .client
            .post(&format!("{}/{}", self.base_url, function))
            .header("authorization", format!("Bearer {}", self.service_key))
            .json(body)
            .send()
            .await
        {
            Ok(res) => res.error_for_status().map(|_| ()).map_err(|e| {
                error!(
                    "[Unexpected Response] Function {} returned error. Error message: {:?}",
                    function, e
                );
                anyhow::Error::new(e)
            }),
            Err(e) => {
                error!(
                    "[Network Error] Function {} could not be invoked. Error message: {:?}",
                    function, e
                );
                Err(anyhow::Error::new(e))
            }
        }
    }
}
