use super::IVerificationCodeRepo;
use autogift_domain::{normalize_email, VerificationCode, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresVerificationCodeRepo {
    pool: PgPool,
}

impl PostgresVerificationCodeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct VerificationCodeRaw {
    id: Uuid,
    email: String,
    code: String,
    expires_at: i64,
    used_at: Option<i64>,
    attempts: i32,
    created: i64,
}

impl From<VerificationCodeRaw> for VerificationCode {
    fn from(e: VerificationCodeRaw) -> Self {
        Self {
            id: e.id.into(),
            email: e.email,
            code: e.code,
            expires_at: e.expires_at,
            used_at: e.used_at,
            attempts: e.attempts,
            created: e.created,
        }
    }
}

#[async_trait::async_trait]
impl IVerificationCodeRepo for PostgresVerificationCodeRepo {
    async fn insert(&self, code: &VerificationCode) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO verification_codes(id, email, code, expires_at, used_at, attempts, created)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(code.id.inner_ref())
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.expires_at)
        .bind(code.used_at)
        .bind(code.attempts)
        .bind(code.created)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert verification code for: {}. DB returned error: {:?}",
                code.email, e
            );
            e
        })?;
        Ok(())
    }

    async fn record_failed_attempt(&self, code_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE verification_codes
            SET attempts = attempts + 1
            WHERE id = $1
            "#,
        )
        .bind(code_id.inner_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to record attempt for verification code with id: {}. DB returned error: {:?}",
                code_id, e
            );
            e
        })?;
        Ok(())
    }

    async fn mark_used(&self, code_id: &ID, used_at: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE verification_codes
            SET used_at = $2
            WHERE id = $1 AND used_at IS NULL
            "#,
        )
        .bind(code_id.inner_ref())
        .bind(used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark verification code with id: {} as used. DB returned error: {:?}",
                code_id, e
            );
            e
        })?;
        Ok(res.rows_affected() == 1)
    }

    async fn find_latest_by_email(&self, email: &str) -> anyhow::Result<Option<VerificationCode>> {
        let code: Option<VerificationCodeRaw> = sqlx::query_as(
            r#"
            SELECT * FROM verification_codes
            WHERE email = $1
            ORDER BY created DESC
            LIMIT 1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find latest verification code for: {} failed. DB returned error: {:?}",
                email, e
            );
            e
        })?;
        Ok(code.map(|c| c.into()))
    }
}
