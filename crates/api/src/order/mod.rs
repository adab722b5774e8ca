mod get_order_recovery;
mod retry_order;

use actix_web::web;
use get_order_recovery::get_order_recovery_controller;
use retry_order::retry_order_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/admin/orders/{order_id}/recovery",
        web::get().to(get_order_recovery_controller),
    );
    cfg.route(
        "/admin/orders/{order_id}/retry",
        web::post().to(retry_order_controller),
    );
}
