mod cancel_gift_execution;

use actix_web::web;
use cancel_gift_execution::cancel_gift_execution_controller;
pub(crate) use cancel_gift_execution::{cancel_linked_orders, OrderCancellations};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/gift-executions/{execution_id}/cancel",
        web::post().to(cancel_gift_execution_controller),
    );
}
