use serde::{Deserialize, Serialize};

/// A Policy is set on a `User` and decides which actions it can and cannot take.
///
/// The `Policy` is put in the `gifting_policy` claim of the user token by the
/// hosted auth. Every `UseCase` that changes gifting state lists the
/// `Permission`s it requires, if the `User`s `Policy` does not authorize
/// some of these `Permission`s the request will be rejected.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Policy {
    /// `Permission`s allowed by the `Policy`
    allow: Option<Vec<Permission>>,
    /// `Permission`s rejected by the `Policy`
    reject: Option<Vec<Permission>>,
}

impl Policy {
    /// Policy of tokens without a `gifting_policy` claim
    pub fn allow_all() -> Self {
        Self {
            allow: Some(vec![Permission::All]),
            reject: None,
        }
    }

    /// Checks if this `Policy` has the right to list of `Permission`s
    pub fn authorize(&self, permissions: &[Permission]) -> bool {
        if permissions.is_empty() {
            return true;
        }

        if let Some(rejected) = &self.reject {
            for rejected_permission in rejected {
                if *rejected_permission == Permission::All {
                    return false;
                }
                if permissions.contains(rejected_permission) {
                    return false;
                }
            }
        }

        if let Some(allowed) = &self.allow {
            if allowed.contains(&Permission::All) {
                return true;
            }

            return permissions
                .iter()
                .all(|permission| allowed.contains(permission));
        }

        false
    }
}

/// `Permission` are different kind of actions that can be performed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum Permission {
    #[serde(rename = "*")]
    All,
    CreateAutoGiftRule,
    UpdateAutoGiftRule,
    CancelAutoGiftRule,
    CancelGiftExecution,
}
