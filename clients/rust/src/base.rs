use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    UnexpectedStatusCode(StatusCode),
}

#[derive(Debug)]
pub struct APIError {
    pub variant: APIErrorVariant,
    pub message: String,
}

pub type APIResponse<T> = Result<T, APIError>;

#[derive(Clone)]
pub(crate) struct BaseClient {
    client: Client,
    address: String,
    /// Sent as `x-api-key` on admin routes
    api_key: Option<String>,
    /// User token sent as a bearer token
    token: Option<String>,
}

impl BaseClient {
    pub fn new(address: String) -> Self {
        let address = format!("{}/api/v1", address.trim_end_matches('/'));
        Self {
            client: Client::new(),
            address,
            api_key: None,
            token: None,
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn authorize(&self, mut req: RequestBuilder) -> RequestBuilder {
        if let Some(api_key) = &self.api_key {
            req = req.header("x-api-key", api_key);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.address, path.trim_start_matches('/'))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        expected_status_code: StatusCode,
        res: Result<Response, reqwest::Error>,
    ) -> APIResponse<T> {
        let res = res.map_err(|e| APIError {
            variant: APIErrorVariant::Network,
            message: e.to_string(),
        })?;

        let status = res.status();
        if status != expected_status_code {
            let message = res.text().await.unwrap_or_default();
            return Err(APIError {
                variant: APIErrorVariant::UnexpectedStatusCode(status),
                message,
            });
        }

        res.json::<T>().await.map_err(|e| APIError {
            variant: APIErrorVariant::MalformedResponse,
            message: e.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let req = self.authorize(self.client.get(self.url(&path)));
        self.handle_response(expected_status_code, req.send().await)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        body: B,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let req = self.authorize(self.client.post(self.url(&path)).json(&body));
        self.handle_response(expected_status_code, req.send().await)
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        body: B,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let req = self.authorize(self.client.put(self.url(&path)).json(&body));
        self.handle_response(expected_status_code, req.send().await)
            .await
    }
}
