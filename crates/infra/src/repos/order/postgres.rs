use super::IOrderRepo;
use autogift_domain::{NaiveDate, Order, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresOrderRepo {
    pool: PgPool,
}

impl PostgresOrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRaw {
    id: Uuid,
    user_id: Uuid,
    status: String,
    payment_status: String,
    zinc_order_id: Option<String>,
    scheduled_delivery_date: Option<NaiveDate>,
    total_amount: i64,
    created: i64,
    updated: i64,
}

impl TryFrom<OrderRaw> for Order {
    type Error = anyhow::Error;

    fn try_from(e: OrderRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.id.into(),
            user_id: e.user_id.into(),
            status: e.status.parse().map_err(anyhow::Error::msg)?,
            payment_status: e.payment_status.parse().map_err(anyhow::Error::msg)?,
            zinc_order_id: e.zinc_order_id,
            scheduled_delivery_date: e.scheduled_delivery_date,
            total_amount: e.total_amount,
            created: e.created,
            updated: e.updated,
        })
    }
}

#[async_trait::async_trait]
impl IOrderRepo for PostgresOrderRepo {
    async fn insert(&self, order: &Order) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders(
                id, user_id, status, payment_status, zinc_order_id,
                scheduled_delivery_date, total_amount, created, updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.id.inner_ref())
        .bind(order.user_id.inner_ref())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.zinc_order_id)
        .bind(order.scheduled_delivery_date)
        .bind(order.total_amount)
        .bind(order.created)
        .bind(order.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert order: {:?}. DB returned error: {:?}",
                order, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, order: &Order) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET status = $2,
            payment_status = $3,
            zinc_order_id = $4,
            scheduled_delivery_date = $5,
            total_amount = $6,
            updated = $7
            WHERE id = $1
            "#,
        )
        .bind(order.id.inner_ref())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.zinc_order_id)
        .bind(order.scheduled_delivery_date)
        .bind(order.total_amount)
        .bind(order.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save order: {:?}. DB returned error: {:?}",
                order, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, order_id: &ID) -> anyhow::Result<Option<Order>> {
        let res: Option<OrderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find order with id: {:?} failed. DB returned error: {:?}",
                order_id, e
            );
            e
        })?;
        res.map(Order::try_from).transpose()
    }

    async fn cancel_pending(&self, order_id: &ID, now: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'cancelled',
            updated = $2
            WHERE id = $1 AND status IN ('pending', 'scheduled')
            "#,
        )
        .bind(order_id.inner_ref())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Cancel order with id: {:?} failed. DB returned error: {:?}",
                order_id, e
            );
            e
        })?;
        Ok(res.rows_affected() == 1)
    }
}
