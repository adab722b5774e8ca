use crate::{
    shared::entity::{Entity, ID},
    user::normalize_email,
};
use autogift_utils::create_numeric_code;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationPolicy {
    pub code_ttl_millis: i64,
    /// Minimum time between two codes sent to the same email
    pub resend_cooldown_millis: i64,
    pub code_length: usize,
    /// Accepted for any email without a code being sent. Never set in production.
    pub bypass_code: Option<String>,
}

impl VerificationPolicy {
    pub fn is_bypass(&self, candidate: &str) -> bool {
        match &self.bypass_code {
            Some(code) => !code.is_empty() && code == candidate.trim(),
            None => false,
        }
    }

    /// Millis left before a new code may be sent given the latest code sent
    pub fn resend_wait_millis(&self, latest: Option<&VerificationCode>, now: i64) -> Option<i64> {
        let latest = latest?;
        let available_at = latest.created + self.resend_cooldown_millis;
        if now < available_at {
            Some(available_at - now)
        } else {
            None
        }
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            code_ttl_millis: 1000 * 60 * 15,
            resend_cooldown_millis: 1000 * 60,
            code_length: 6,
            bypass_code: None,
        }
    }
}

/// State of a sent `VerificationCode`. An email without any code is unsent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationCodeState {
    Sent,
    Used,
    Expired,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    #[error("The verification code is invalid")]
    Invalid,
    #[error("The verification code is invalid or has already been used")]
    AlreadyUsed,
    #[error("The verification code has expired")]
    Expired,
}

impl VerificationError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::AlreadyUsed => "used",
            Self::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationCode {
    pub id: ID,
    pub email: String,
    pub code: String,
    pub expires_at: i64,
    pub used_at: Option<i64>,
    /// Failed verification attempts against this code
    pub attempts: i32,
    pub created: i64,
}

impl VerificationCode {
    pub fn generate(email: &str, now: i64, policy: &VerificationPolicy) -> Self {
        Self {
            id: Default::default(),
            email: normalize_email(email),
            code: create_numeric_code(policy.code_length),
            expires_at: now + policy.code_ttl_millis,
            used_at: None,
            attempts: 0,
            created: now,
        }
    }

    pub fn state(&self, now: i64) -> VerificationCodeState {
        if self.used_at.is_some() {
            VerificationCodeState::Used
        } else if now >= self.expires_at {
            VerificationCodeState::Expired
        } else {
            VerificationCodeState::Sent
        }
    }

    /// Checks `candidate` against this code. On success the code is consumed,
    /// every failure counts as an attempt.
    pub fn verify(&mut self, candidate: &str, now: i64) -> Result<(), VerificationError> {
        let res = if self.used_at.is_some() {
            Err(VerificationError::AlreadyUsed)
        } else if self.code != candidate.trim() {
            Err(VerificationError::Invalid)
        } else if self.state(now) == VerificationCodeState::Expired {
            Err(VerificationError::Expired)
        } else {
            self.used_at = Some(now);
            Ok(())
        };

        if res.is_err() {
            self.attempts += 1;
        }
        res
    }
}

impl Entity for VerificationCode {
    fn id(&self) -> &ID {
        &self.id
    }
}
