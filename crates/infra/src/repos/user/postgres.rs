use super::IUserRepo;
use autogift_domain::{normalize_email, User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    id: Uuid,
    email: String,
    email_confirmed_at: Option<i64>,
}

impl From<UserRaw> for User {
    fn from(e: UserRaw) -> Self {
        Self {
            id: e.id.into(),
            email: e.email,
            email_confirmed_at: e.email_confirmed_at,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(id, email, email_confirmed_at)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.email)
        .bind(user.email_confirmed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert user: {:?}. DB returned error: {:?}", user, e);
            e
        })?;
        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2,
            email_confirmed_at = $3
            WHERE id = $1
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.email)
        .bind(user.email_confirmed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to save user: {:?}. DB returned error: {:?}", user, e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user: Option<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find user with id: {:?} failed. DB returned error: {:?}",
                user_id, e
            );
            e
        })?;
        Ok(user.map(|u| u.into()))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user: Option<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find user with email: {:?} failed. DB returned error: {:?}",
                email, e
            );
            e
        })?;
        Ok(user.map(|u| u.into()))
    }
}
