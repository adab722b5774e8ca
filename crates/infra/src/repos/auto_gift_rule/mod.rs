mod inmemory;
mod postgres;

use autogift_domain::{AutoGiftRule, ID};
pub use inmemory::InMemoryAutoGiftRuleRepo;
pub use postgres::PostgresAutoGiftRuleRepo;

#[async_trait::async_trait]
pub trait IAutoGiftRuleRepo: Send + Sync {
    async fn insert(&self, rule: &AutoGiftRule) -> anyhow::Result<()>;
    async fn save(&self, rule: &AutoGiftRule) -> anyhow::Result<()>;
    async fn find(&self, rule_id: &ID) -> anyhow::Result<Option<AutoGiftRule>>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<AutoGiftRule>>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;
    use autogift_domain::{AutoGiftRule, DateType, Entity, GiftRecipient, RuleSource, User, ID};

    #[tokio::test]
    async fn create_and_find() {
        let ctx = setup_context().await;
        let user = User::new(ID::default(), "owner@example.com".into());
        ctx.repos.users.insert(&user).await.expect("To insert user");

        let mut rule = AutoGiftRule::new(
            user.id.clone(),
            GiftRecipient::PendingInvitation("friend@example.com".into()),
            DateType::Birthday,
            1000,
        );
        rule.source = RuleSource::Nicole;
        rule.set_budget_limit(Some(7500)).unwrap();

        // Insert
        assert!(ctx.repos.auto_gift_rules.insert(&rule).await.is_ok());

        // Find
        let res = ctx
            .repos
            .auto_gift_rules
            .find(&rule.id)
            .await
            .expect("To query rule")
            .expect("To find rule");
        assert!(Entity::eq(&res, &rule));
        assert_eq!(res.recipient, rule.recipient);
        assert_eq!(res.budget_limit, Some(7500));
        assert_eq!(res.source, RuleSource::Nicole);

        let res = ctx
            .repos
            .auto_gift_rules
            .find_by_user(&user.id)
            .await
            .expect("To query rules");
        assert_eq!(res.len(), 1);

        // Unknown
        assert!(ctx
            .repos
            .auto_gift_rules
            .find(&ID::default())
            .await
            .expect("To query rule")
            .is_none());
    }

    #[tokio::test]
    async fn update() {
        let ctx = setup_context().await;
        let user = User::new(ID::default(), "owner2@example.com".into());
        ctx.repos.users.insert(&user).await.expect("To insert user");
        let mut rule = AutoGiftRule::new(
            user.id.clone(),
            GiftRecipient::PendingInvitation("friend@example.com".into()),
            DateType::Anniversary,
            1000,
        );
        ctx.repos.auto_gift_rules.insert(&rule).await.unwrap();

        rule.deactivate(2000);
        rule.payment_method_id = Some("pm_123".into());

        // Save
        assert!(ctx.repos.auto_gift_rules.save(&rule).await.is_ok());

        // Find
        let res = ctx
            .repos
            .auto_gift_rules
            .find(&rule.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!res.is_active);
        assert_eq!(res.updated, 2000);
        assert_eq!(res.payment_method_id, Some("pm_123".into()));
    }
}
