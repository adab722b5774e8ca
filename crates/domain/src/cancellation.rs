use crate::{
    auto_gift_rule::AutoGiftRule,
    gift_execution::{AutomatedGiftExecution, ExecutionCancellationError, ExecutionStatus},
};

const MILLIS_PER_HOUR: i64 = 1000 * 60 * 60;

/// Executions closer than this to firing protect their rule from being cancelled
pub const DEFAULT_PROTECTED_WINDOW_MILLIS: i64 = 24 * MILLIS_PER_HOUR;

#[derive(Debug, Clone, PartialEq)]
pub struct CancellationPolicy {
    pub protected_window_millis: i64,
}

impl CancellationPolicy {
    pub fn window_hours(&self) -> i64 {
        self.protected_window_millis / MILLIS_PER_HOUR
    }

    /// Overdue executions are protected as well
    pub fn protects(&self, scheduled_date: i64, now: i64) -> bool {
        scheduled_date - now <= self.protected_window_millis
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            protected_window_millis: DEFAULT_PROTECTED_WINDOW_MILLIS,
        }
    }
}

/// Outcome of checking whether an `AutoGiftRule` may be cancelled
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationEligibility {
    pub can_cancel: bool,
    pub reason: Option<String>,
    /// The pending executions that were taken into account
    pub executions: Vec<AutomatedGiftExecution>,
    /// Timestamp in millis of the earliest pending execution
    pub next_execution: Option<i64>,
}

impl CancellationEligibility {
    fn refused(
        reason: String,
        executions: Vec<AutomatedGiftExecution>,
        next_execution: Option<i64>,
    ) -> Self {
        Self {
            can_cancel: false,
            reason: Some(reason),
            executions,
            next_execution,
        }
    }

    pub fn not_found() -> Self {
        Self::refused("Auto-gift rule not found".into(), Vec::new(), None)
    }

    /// Used when the rule or its executions could not be loaded.
    /// The check fails closed.
    pub fn unverifiable() -> Self {
        Self::refused(
            "Unable to verify cancellation eligibility".into(),
            Vec::new(),
            None,
        )
    }
}

/// Decides whether `rule` may be cancelled at `now`.
///
/// A rule is protected as long as any of its executions is processing or the
/// earliest pending execution fires within `policy.protected_window_millis`.
/// Pending executions that are already overdue count as about to fire.
pub fn check_rule_cancellation(
    rule: Option<&AutoGiftRule>,
    executions: &[AutomatedGiftExecution],
    now: i64,
    policy: &CancellationPolicy,
) -> CancellationEligibility {
    let rule = match rule {
        Some(rule) => rule,
        None => return CancellationEligibility::not_found(),
    };

    let mut pending = executions
        .iter()
        .filter(|e| e.rule_id == rule.id && e.status == ExecutionStatus::Pending)
        .cloned()
        .collect::<Vec<_>>();
    pending.sort_by_key(|e| e.scheduled_date);
    let next_execution = pending.first().map(|e| e.scheduled_date);

    if !rule.is_active {
        return CancellationEligibility::refused(
            "Auto-gift rule is already cancelled".into(),
            pending,
            next_execution,
        );
    }

    let processing = executions
        .iter()
        .any(|e| e.rule_id == rule.id && e.status == ExecutionStatus::Processing);
    if processing {
        return CancellationEligibility::refused(
            "A gift for this rule is currently being processed. Cancel the order instead.".into(),
            pending,
            next_execution,
        );
    }

    if let Some(next) = next_execution {
        if policy.protects(next, now) {
            return CancellationEligibility::refused(
                ExecutionCancellationError::WithinProtectedWindow(policy.window_hours())
                    .to_string(),
                pending,
                next_execution,
            );
        }
    }

    CancellationEligibility {
        can_cancel: true,
        reason: None,
        executions: pending,
        next_execution,
    }
}

/// Decides whether a single `execution` may be cancelled at `now`.
/// The window protecting the rule applies to each of its executions.
pub fn check_execution_cancellation(
    execution: &AutomatedGiftExecution,
    now: i64,
    policy: &CancellationPolicy,
) -> Result<(), ExecutionCancellationError> {
    execution.ensure_cancellable()?;
    if policy.protects(execution.scheduled_date, now) {
        return Err(ExecutionCancellationError::WithinProtectedWindow(
            policy.window_hours(),
        ));
    }
    Ok(())
}
