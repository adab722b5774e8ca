use super::IAutoGiftRuleRepo;
use autogift_domain::{
    AutoGiftRule, GiftRecipient, GiftSelectionCriteria, NotificationPreferences, ID,
};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresAutoGiftRuleRepo {
    pool: PgPool,
}

impl PostgresAutoGiftRuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AutoGiftRuleRaw {
    id: Uuid,
    user_id: Uuid,
    recipient_id: Option<Uuid>,
    pending_recipient_email: Option<String>,
    date_type: String,
    event_id: Option<Uuid>,
    budget_limit: Option<i64>,
    gift_selection_criteria: Json<GiftSelectionCriteria>,
    notification_preferences: Json<NotificationPreferences>,
    payment_method_id: Option<String>,
    is_active: bool,
    source: String,
    created: i64,
    updated: i64,
}

impl TryFrom<AutoGiftRuleRaw> for AutoGiftRule {
    type Error = anyhow::Error;

    fn try_from(e: AutoGiftRuleRaw) -> anyhow::Result<Self> {
        let recipient = GiftRecipient::from_parts(
            e.recipient_id.map(ID::from),
            e.pending_recipient_email,
        )?;
        Ok(Self {
            id: e.id.into(),
            user_id: e.user_id.into(),
            recipient,
            date_type: e.date_type.parse().map_err(anyhow::Error::msg)?,
            event_id: e.event_id.map(ID::from),
            budget_limit: e.budget_limit,
            gift_selection_criteria: e.gift_selection_criteria.0,
            notification_preferences: e.notification_preferences.0,
            payment_method_id: e.payment_method_id,
            is_active: e.is_active,
            source: e.source.parse().map_err(anyhow::Error::msg)?,
            created: e.created,
            updated: e.updated,
        })
    }
}

#[async_trait::async_trait]
impl IAutoGiftRuleRepo for PostgresAutoGiftRuleRepo {
    async fn insert(&self, rule: &AutoGiftRule) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO auto_gifting_rules(
                id, user_id, recipient_id, pending_recipient_email, date_type, event_id,
                budget_limit, gift_selection_criteria, notification_preferences,
                payment_method_id, is_active, source, created, updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(rule.user_id.inner_ref())
        .bind(rule.recipient.recipient_id().map(|id| *id.inner_ref()))
        .bind(rule.recipient.pending_recipient_email())
        .bind(rule.date_type.as_str())
        .bind(rule.event_id.as_ref().map(|id| *id.inner_ref()))
        .bind(rule.budget_limit)
        .bind(Json(&rule.gift_selection_criteria))
        .bind(Json(&rule.notification_preferences))
        .bind(&rule.payment_method_id)
        .bind(rule.is_active)
        .bind(rule.source.as_str())
        .bind(rule.created)
        .bind(rule.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert auto gift rule: {:?}. DB returned error: {:?}",
                rule, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, rule: &AutoGiftRule) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE auto_gifting_rules
            SET recipient_id = $2,
            pending_recipient_email = $3,
            date_type = $4,
            event_id = $5,
            budget_limit = $6,
            gift_selection_criteria = $7,
            notification_preferences = $8,
            payment_method_id = $9,
            is_active = $10,
            updated = $11
            WHERE id = $1
            "#,
        )
        .bind(rule.id.inner_ref())
        .bind(rule.recipient.recipient_id().map(|id| *id.inner_ref()))
        .bind(rule.recipient.pending_recipient_email())
        .bind(rule.date_type.as_str())
        .bind(rule.event_id.as_ref().map(|id| *id.inner_ref()))
        .bind(rule.budget_limit)
        .bind(Json(&rule.gift_selection_criteria))
        .bind(Json(&rule.notification_preferences))
        .bind(&rule.payment_method_id)
        .bind(rule.is_active)
        .bind(rule.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save auto gift rule: {:?}. DB returned error: {:?}",
                rule, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, rule_id: &ID) -> anyhow::Result<Option<AutoGiftRule>> {
        let res: Option<AutoGiftRuleRaw> = sqlx::query_as(
            r#"
            SELECT * FROM auto_gifting_rules
            WHERE id = $1
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find auto gift rule with id: {:?} failed. DB returned error: {:?}",
                rule_id, e
            );
            e
        })?;
        res.map(AutoGiftRule::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<AutoGiftRule>> {
        let rules: Vec<AutoGiftRuleRaw> = sqlx::query_as(
            r#"
            SELECT * FROM auto_gifting_rules
            WHERE user_id = $1
            ORDER BY created DESC
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find auto gift rules for user: {:?} failed. DB returned error: {:?}",
                user_id, e
            );
            e
        })?;
        rules.into_iter().map(AutoGiftRule::try_from).collect()
    }
}
