mod auto_gift_rule;
mod base;
mod gift_execution;
mod order;
mod status;
mod verification;

use auto_gift_rule::AutoGiftRuleClient;
pub use auto_gift_rule::{CreateAutoGiftRuleInput, UpdateAutoGiftRuleInput};
pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
pub use reqwest::StatusCode;
use gift_execution::GiftExecutionClient;
use order::OrderClient;
use status::StatusClient;
use std::sync::Arc;
use verification::VerificationClient;

pub use autogift_api_structs::dtos::*;
pub use autogift_domain::{
    DateType, GiftSelectionCriteria, NotificationPreferences, RuleSource, ID,
};

// Domain
pub use autogift_api_structs::dtos::AutoGiftRuleDTO as AutoGiftRule;
pub use autogift_api_structs::dtos::CancellationEligibilityDTO as CancellationEligibility;
pub use autogift_api_structs::dtos::GiftExecutionDTO as GiftExecution;
pub use autogift_api_structs::dtos::OrderDTO as Order;

/// Autogift Server SDK
///
/// The SDK contains methods for interacting with the Autogift server
/// API.
#[derive(Clone)]
pub struct AutogiftSDK {
    pub auto_gift_rule: AutoGiftRuleClient,
    pub gift_execution: GiftExecutionClient,
    pub order: OrderClient,
    pub status: StatusClient,
    pub verification: VerificationClient,
}

impl AutogiftSDK {
    /// Client for admin tooling authenticated with the admin api key
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key.into());
        Self::from_base(base)
    }

    /// Client acting on behalf of the user the `token` was issued to
    pub fn with_user_token<T: Into<String>>(address: String, token: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_token(token.into());
        Self::from_base(base)
    }

    fn from_base(base: BaseClient) -> Self {
        let base = Arc::new(base);
        Self {
            auto_gift_rule: AutoGiftRuleClient::new(base.clone()),
            gift_execution: GiftExecutionClient::new(base.clone()),
            order: OrderClient::new(base.clone()),
            status: StatusClient::new(base.clone()),
            verification: VerificationClient::new(base),
        }
    }
}
