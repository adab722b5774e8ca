use super::IVerificationCodeRepo;
use crate::repos::shared::inmemory_repo::*;
use autogift_domain::{normalize_email, VerificationCode, ID};

pub struct InMemoryVerificationCodeRepo {
    codes: std::sync::Mutex<Vec<VerificationCode>>,
}

impl InMemoryVerificationCodeRepo {
    pub fn new() -> Self {
        Self {
            codes: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IVerificationCodeRepo for InMemoryVerificationCodeRepo {
    async fn insert(&self, code: &VerificationCode) -> anyhow::Result<()> {
        insert(code, &self.codes);
        Ok(())
    }

    async fn record_failed_attempt(&self, code_id: &ID) -> anyhow::Result<()> {
        update_many(&self.codes, |c| c.id == *code_id, |c| c.attempts += 1);
        Ok(())
    }

    async fn mark_used(&self, code_id: &ID, used_at: i64) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.codes,
            |c| c.id == *code_id && c.used_at.is_none(),
            |c| c.used_at = Some(used_at),
        );
        Ok(!updated.is_empty())
    }

    async fn find_latest_by_email(&self, email: &str) -> anyhow::Result<Option<VerificationCode>> {
        let email = normalize_email(email);
        let codes = find_by(&self.codes, |c| c.email == email);
        Ok(codes.into_iter().max_by_key(|c| c.created))
    }
}
