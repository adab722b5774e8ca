use serde::{Deserialize, Serialize};

pub mod send_verification_code {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub email: String,
        pub expires_at: i64,
    }
}

pub mod verify_email_code {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
        pub code: String,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub verified: bool,
        /// `invalid`, `used` or `expired` when not verified
        pub reason: Option<String>,
    }

    impl APIResponse {
        pub fn verified() -> Self {
            Self {
                verified: true,
                reason: None,
            }
        }

        pub fn rejected(reason: &str) -> Self {
            Self {
                verified: false,
                reason: Some(reason.to_string()),
            }
        }
    }
}
