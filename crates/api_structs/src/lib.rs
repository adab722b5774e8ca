mod auto_gift_rule;
mod gift_execution;
mod order;
mod status;
mod verification;

pub mod dtos {
    pub use crate::auto_gift_rule::dtos::*;
    pub use crate::gift_execution::dtos::*;
    pub use crate::order::dtos::*;
}

pub use crate::auto_gift_rule::api::*;
pub use crate::gift_execution::api::*;
pub use crate::order::api::*;
pub use crate::status::api::*;
pub use crate::verification::api::*;
