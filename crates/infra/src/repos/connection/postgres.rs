use super::IConnectionRepo;
use autogift_domain::{Connection, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresConnectionRepo {
    pool: PgPool,
}

impl PostgresConnectionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ConnectionRaw {
    id: Uuid,
    user_id: Uuid,
    connected_user_id: Uuid,
    status: String,
}

impl TryFrom<ConnectionRaw> for Connection {
    type Error = anyhow::Error;

    fn try_from(e: ConnectionRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.id.into(),
            user_id: e.user_id.into(),
            connected_user_id: e.connected_user_id.into(),
            status: e.status.parse().map_err(anyhow::Error::msg)?,
        })
    }
}

#[async_trait::async_trait]
impl IConnectionRepo for PostgresConnectionRepo {
    async fn insert(&self, connection: &Connection) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_connections(id, user_id, connected_user_id, status)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(connection.id.inner_ref())
        .bind(connection.user_id.inner_ref())
        .bind(connection.connected_user_id.inner_ref())
        .bind(connection.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert connection: {:?}. DB returned error: {:?}",
                connection, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, connection: &Connection) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE user_connections
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(connection.id.inner_ref())
        .bind(connection.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save connection: {:?}. DB returned error: {:?}",
                connection, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_between(
        &self,
        user_id: &ID,
        other_user_id: &ID,
    ) -> anyhow::Result<Vec<Connection>> {
        let connections: Vec<ConnectionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM user_connections
            WHERE (user_id = $1 AND connected_user_id = $2)
            OR (user_id = $2 AND connected_user_id = $1)
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(other_user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find connections between: {:?} and {:?} failed. DB returned error: {:?}",
                user_id, other_user_id, e
            );
            e
        })?;
        connections.into_iter().map(Connection::try_from).collect()
    }
}
