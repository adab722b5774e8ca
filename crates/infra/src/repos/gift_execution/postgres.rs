use super::IGiftExecutionRepo;
use autogift_domain::{AutomatedGiftExecution, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresGiftExecutionRepo {
    pool: PgPool,
}

impl PostgresGiftExecutionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GiftExecutionRaw {
    id: Uuid,
    rule_id: Uuid,
    user_id: Uuid,
    scheduled_date: i64,
    status: String,
    order_id: Option<Uuid>,
    error_message: Option<String>,
    created: i64,
    updated: i64,
}

impl TryFrom<GiftExecutionRaw> for AutomatedGiftExecution {
    type Error = anyhow::Error;

    fn try_from(e: GiftExecutionRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.id.into(),
            rule_id: e.rule_id.into(),
            user_id: e.user_id.into(),
            scheduled_date: e.scheduled_date,
            status: e.status.parse().map_err(anyhow::Error::msg)?,
            order_id: e.order_id.map(ID::from),
            error_message: e.error_message,
            created: e.created,
            updated: e.updated,
        })
    }
}

fn into_executions(raw: Vec<GiftExecutionRaw>) -> anyhow::Result<Vec<AutomatedGiftExecution>> {
    raw.into_iter().map(AutomatedGiftExecution::try_from).collect()
}

#[async_trait::async_trait]
impl IGiftExecutionRepo for PostgresGiftExecutionRepo {
    async fn insert(&self, execution: &AutomatedGiftExecution) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO automated_gift_executions(
                id, rule_id, user_id, scheduled_date, status, order_id, error_message, created, updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(execution.id.inner_ref())
        .bind(execution.rule_id.inner_ref())
        .bind(execution.user_id.inner_ref())
        .bind(execution.scheduled_date)
        .bind(execution.status.as_str())
        .bind(execution.order_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&execution.error_message)
        .bind(execution.created)
        .bind(execution.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert gift execution: {:?}. DB returned error: {:?}",
                execution, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, execution: &AutomatedGiftExecution) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE automated_gift_executions
            SET scheduled_date = $2,
            status = $3,
            order_id = $4,
            error_message = $5,
            updated = $6
            WHERE id = $1
            "#,
        )
        .bind(execution.id.inner_ref())
        .bind(execution.scheduled_date)
        .bind(execution.status.as_str())
        .bind(execution.order_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&execution.error_message)
        .bind(execution.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save gift execution: {:?}. DB returned error: {:?}",
                execution, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, execution_id: &ID) -> anyhow::Result<Option<AutomatedGiftExecution>> {
        let res: Option<GiftExecutionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM automated_gift_executions
            WHERE id = $1
            "#,
        )
        .bind(execution_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find gift execution with id: {:?} failed. DB returned error: {:?}",
                execution_id, e
            );
            e
        })?;
        res.map(AutomatedGiftExecution::try_from).transpose()
    }

    async fn find_by_rule(&self, rule_id: &ID) -> anyhow::Result<Vec<AutomatedGiftExecution>> {
        let executions: Vec<GiftExecutionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM automated_gift_executions
            WHERE rule_id = $1
            ORDER BY scheduled_date ASC
            "#,
        )
        .bind(rule_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find gift executions for rule: {:?} failed. DB returned error: {:?}",
                rule_id, e
            );
            e
        })?;
        into_executions(executions)
    }

    async fn cancel_pending(
        &self,
        execution_id: &ID,
        now: i64,
    ) -> anyhow::Result<Option<AutomatedGiftExecution>> {
        let execution: Option<GiftExecutionRaw> = sqlx::query_as(
            r#"
            UPDATE automated_gift_executions
            SET status = 'cancelled',
            updated = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(execution_id.inner_ref())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Cancel pending gift execution: {:?} failed. DB returned error: {:?}",
                execution_id, e
            );
            e
        })?;
        execution.map(AutomatedGiftExecution::try_from).transpose()
    }

    async fn cancel_pending_by_rule(
        &self,
        rule_id: &ID,
        now: i64,
    ) -> anyhow::Result<Vec<AutomatedGiftExecution>> {
        let executions: Vec<GiftExecutionRaw> = sqlx::query_as(
            r#"
            UPDATE automated_gift_executions
            SET status = 'cancelled',
            updated = $2
            WHERE rule_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(rule_id.inner_ref())
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Cancel pending gift executions for rule: {:?} failed. DB returned error: {:?}",
                rule_id, e
            );
            e
        })?;
        into_executions(executions)
    }
}
