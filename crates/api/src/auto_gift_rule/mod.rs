mod cancel_auto_gift_rule;
mod create_auto_gift_rule;
mod get_auto_gift_rule;
mod get_auto_gift_rules;
mod get_rule_cancellation_eligibility;
mod get_rule_executions;
mod update_auto_gift_rule;

use actix_web::web;
use autogift_domain::{AutoGiftRule, ID};
use autogift_infra::AutogiftContext;
use cancel_auto_gift_rule::cancel_auto_gift_rule_controller;
use create_auto_gift_rule::create_auto_gift_rule_controller;
use get_auto_gift_rule::get_auto_gift_rule_controller;
use get_auto_gift_rules::get_auto_gift_rules_controller;
use get_rule_cancellation_eligibility::get_rule_cancellation_eligibility_controller;
use get_rule_executions::get_rule_executions_controller;
use update_auto_gift_rule::update_auto_gift_rule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/auto-gift-rules",
        web::post().to(create_auto_gift_rule_controller),
    );
    cfg.route(
        "/auto-gift-rules",
        web::get().to(get_auto_gift_rules_controller),
    );
    cfg.route(
        "/auto-gift-rules/{rule_id}",
        web::get().to(get_auto_gift_rule_controller),
    );
    cfg.route(
        "/auto-gift-rules/{rule_id}",
        web::put().to(update_auto_gift_rule_controller),
    );
    cfg.route(
        "/auto-gift-rules/{rule_id}/cancellation",
        web::get().to(get_rule_cancellation_eligibility_controller),
    );
    cfg.route(
        "/auto-gift-rules/{rule_id}/cancel",
        web::post().to(cancel_auto_gift_rule_controller),
    );
    cfg.route(
        "/auto-gift-rules/{rule_id}/executions",
        web::get().to(get_rule_executions_controller),
    );
}

/// Rules of other users are reported as missing
pub(crate) async fn find_user_rule(
    rule_id: &ID,
    user_id: &ID,
    ctx: &AutogiftContext,
) -> anyhow::Result<Option<AutoGiftRule>> {
    let rule = ctx.repos.auto_gift_rules.find(rule_id).await?;
    Ok(rule.filter(|rule| rule.belongs_to(user_id)))
}
