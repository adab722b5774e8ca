use crate::{
    shared::entity::{Entity, ID},
    user::{is_valid_email, normalize_email},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// An `AutoGiftRule` is a recurring instruction from a `User` to buy a gift
/// automatically for a recipient on a recurring date (birthday, anniversary, ...).
///
/// Rules are never deleted. Cancelling a rule flips `is_active` so that
/// the history of `AutomatedGiftExecution`s stays intact.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoGiftRule {
    pub id: ID,
    pub user_id: ID,
    pub recipient: GiftRecipient,
    pub date_type: DateType,
    /// Optional user defined event the rule is tied to
    pub event_id: Option<ID>,
    /// Upper spending limit per gift in cents
    pub budget_limit: Option<i64>,
    pub gift_selection_criteria: GiftSelectionCriteria,
    pub notification_preferences: NotificationPreferences,
    pub payment_method_id: Option<String>,
    pub is_active: bool,
    pub source: RuleSource,
    pub created: i64,
    pub updated: i64,
}

impl AutoGiftRule {
    pub fn new(user_id: ID, recipient: GiftRecipient, date_type: DateType, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            recipient,
            date_type,
            event_id: None,
            budget_limit: None,
            gift_selection_criteria: Default::default(),
            notification_preferences: Default::default(),
            payment_method_id: None,
            is_active: true,
            source: RuleSource::Manual,
            created: now,
            updated: now,
        }
    }

    pub fn set_budget_limit(&mut self, budget_limit: Option<i64>) -> Result<(), RuleValidationError> {
        if let Some(limit) = budget_limit {
            if limit <= 0 {
                return Err(RuleValidationError::InvalidBudget(limit));
            }
        }
        self.budget_limit = budget_limit;
        Ok(())
    }

    pub fn set_notification_preferences(
        &mut self,
        preferences: NotificationPreferences,
    ) -> Result<(), RuleValidationError> {
        if let Some(days) = preferences
            .days_before
            .iter()
            .find(|days| **days > MAX_NOTIFICATION_DAYS_BEFORE)
        {
            return Err(RuleValidationError::InvalidNotificationDays(*days));
        }
        self.notification_preferences = preferences;
        Ok(())
    }

    pub fn belongs_to(&self, user_id: &ID) -> bool {
        self.user_id == *user_id
    }

    pub fn deactivate(&mut self, now: i64) {
        self.is_active = false;
        self.updated = now;
    }
}

impl Entity for AutoGiftRule {
    fn id(&self) -> &ID {
        &self.id
    }
}

const MAX_NOTIFICATION_DAYS_BEFORE: u32 = 60;

#[derive(Error, Debug, PartialEq)]
pub enum RuleValidationError {
    #[error("Budget limit must be a positive amount of cents, got: {0}")]
    InvalidBudget(i64),
    #[error("Exactly one of recipient id or pending recipient email must be provided")]
    InvalidRecipient,
    #[error("The email: {0} is not a valid email address")]
    InvalidEmail(String),
    #[error("A rule cannot have its owner as recipient")]
    SelfRecipient,
    #[error("Notifications can be sent at most 60 days before, got: {0}")]
    InvalidNotificationDays(u32),
}

/// Who receives the gifts of an `AutoGiftRule`. The recipient is either
/// an existing connection or someone invited by email that has not signed up yet.
#[derive(Debug, Clone, PartialEq)]
pub enum GiftRecipient {
    Connection(ID),
    PendingInvitation(String),
}

impl GiftRecipient {
    pub fn from_parts(
        recipient_id: Option<ID>,
        pending_recipient_email: Option<String>,
    ) -> Result<Self, RuleValidationError> {
        match (recipient_id, pending_recipient_email) {
            (Some(id), None) => Ok(Self::Connection(id)),
            (None, Some(email)) => {
                if !is_valid_email(&email) {
                    return Err(RuleValidationError::InvalidEmail(email));
                }
                Ok(Self::PendingInvitation(normalize_email(&email)))
            }
            _ => Err(RuleValidationError::InvalidRecipient),
        }
    }

    pub fn recipient_id(&self) -> Option<&ID> {
        match self {
            Self::Connection(id) => Some(id),
            Self::PendingInvitation(_) => None,
        }
    }

    pub fn pending_recipient_email(&self) -> Option<&str> {
        match self {
            Self::Connection(_) => None,
            Self::PendingInvitation(email) => Some(email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateType {
    Birthday,
    Anniversary,
    Valentines,
    MothersDay,
    FathersDay,
    Christmas,
    Graduation,
    Custom(String),
}

impl DateType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::Valentines => "valentines",
            Self::MothersDay => "mothers_day",
            Self::FathersDay => "fathers_day",
            Self::Christmas => "christmas",
            Self::Graduation => "graduation",
            Self::Custom(label) => label,
        }
    }
}

impl Display for DateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date_type = match s.trim().to_lowercase().as_str() {
            "" => return Err("Date type cannot be empty".into()),
            "birthday" => Self::Birthday,
            "anniversary" => Self::Anniversary,
            "valentines" | "valentines_day" => Self::Valentines,
            "mothers_day" => Self::MothersDay,
            "fathers_day" => Self::FathersDay,
            "christmas" => Self::Christmas,
            "graduation" => Self::Graduation,
            other => Self::Custom(other.to_string()),
        };
        Ok(date_type)
    }
}

impl TryFrom<String> for DateType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateType> for String {
    fn from(date_type: DateType) -> Self {
        date_type.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftSource {
    Wishlist,
    Ai,
    Both,
    Specified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftSelectionCriteria {
    pub source: GiftSource,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub exclude_items: Vec<String>,
    #[serde(default)]
    pub specific_product_id: Option<String>,
}

impl Default for GiftSelectionCriteria {
    fn default() -> Self {
        Self {
            source: GiftSource::Both,
            categories: Vec::new(),
            exclude_items: Vec::new(),
            specific_product_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub enabled: bool,
    /// Days before the execution at which the owner is reminded
    pub days_before: Vec<u32>,
    pub email: bool,
    pub push: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            days_before: vec![7, 3, 1],
            email: true,
            push: false,
        }
    }
}

/// How the `AutoGiftRule` came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    Manual,
    Nicole,
}

impl RuleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Nicole => "nicole",
        }
    }
}

impl FromStr for RuleSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "nicole" => Ok(Self::Nicole),
            _ => Err(format!("Unknown rule source: {}", s)),
        }
    }
}
