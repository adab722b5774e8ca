use crate::shared::entity::{Entity, ID};

/// Mirror of the hosted auth record of a person using the app
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub email: String,
    /// Timestamp in millis of when the email address was confirmed
    pub email_confirmed_at: Option<i64>,
}

impl User {
    pub fn new(id: ID, email: String) -> Self {
        Self {
            id,
            email: normalize_email(&email),
            email_confirmed_at: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// Confirming twice keeps the first confirmation time
    pub fn confirm_email(&mut self, now: i64) {
        if self.email_confirmed_at.is_none() {
            self.email_confirmed_at = Some(now);
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    }
}
