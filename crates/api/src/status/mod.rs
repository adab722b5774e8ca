use actix_web::{web, HttpResponse};
use autogift_api_structs::get_service_health::*;
use autogift_infra::AutogiftContext;

async fn status(ctx: web::Data<AutogiftContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        production: ctx.config.is_production,
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
