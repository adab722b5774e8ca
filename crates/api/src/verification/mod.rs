mod send_verification_code;
mod subscribers;
mod verify_email_code;

use actix_web::web;
use send_verification_code::send_verification_code_controller;
use verify_email_code::verify_email_code_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/verification/send",
        web::post().to(send_verification_code_controller),
    );
    cfg.route(
        "/verification/verify",
        web::post().to(verify_email_code_controller),
    );
}
