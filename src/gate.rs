//! Eligibility gate
//!
//! The ordered, short-circuiting sequence of authorization checks that
//! decides whether the user may enter the current round: authentication,
//! then identity verification, then self-exclusion, then prior payment.
//! Each check is its own network round-trip and the four facts may be read
//! at different instants; the fixed order guarantees that the first true
//! blocking condition (in priority order) is the one reported, even when
//! several hold at once.

use crate::errors::LotteryResult;
use crate::gateway::LotteryBackend;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The single user-facing outcome of a participation attempt.
/// Outcomes are mutually exclusive and totally ordered by the check
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Not logged in; login or registration is required first
    RequiresAuth,
    /// Logged in but identity verification is still outstanding
    RequiresVerification,
    /// Self-excluded; participation is blocked until the ban is lifted
    Banned,
    /// Already paid into the current round
    AlreadyParticipating,
    /// All checks passed; payment-method selection may proceed
    Eligible,
}

impl GateOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, GateOutcome::Eligible)
    }
}

impl fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GateOutcome::RequiresAuth => "login required",
            GateOutcome::RequiresVerification => "identity verification required",
            GateOutcome::Banned => "self-excluded",
            GateOutcome::AlreadyParticipating => "already participating",
            GateOutcome::Eligible => "eligible",
        };
        f.write_str(text)
    }
}

/// Runs the check sequence against the backend
pub struct EligibilityGate {
    backend: Arc<dyn LotteryBackend>,
}

impl EligibilityGate {
    pub fn new(backend: Arc<dyn LotteryBackend>) -> Self {
        Self { backend }
    }

    /// Decide the outcome for one participation attempt.
    ///
    /// The checks are awaited strictly in sequence, never in parallel: an
    /// error on an earlier check must prevent the later calls, and a
    /// blocking condition found early must win over any later one. An
    /// error from any check aborts the whole decision ("status unknown")
    /// rather than mapping to an outcome; no default is ever assumed for
    /// an unavailable fact.
    pub async fn evaluate(&self) -> LotteryResult<GateOutcome> {
        if !self.backend.auth_status().await?.logged_in {
            debug!("gate: not authenticated");
            return Ok(GateOutcome::RequiresAuth);
        }

        if !self.backend.verification_status().await?.verified {
            debug!("gate: not verified");
            return Ok(GateOutcome::RequiresVerification);
        }

        if self.backend.ban_status().await?.banned {
            debug!("gate: self-excluded");
            return Ok(GateOutcome::Banned);
        }

        if self.backend.payment_status().await?.paid {
            debug!("gate: already paid this round");
            return Ok(GateOutcome::AlreadyParticipating);
        }

        debug!("gate: eligible");
        Ok(GateOutcome::Eligible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LotteryError;
    use crate::gateway::MockBackend;

    fn gate(backend: &Arc<MockBackend>) -> EligibilityGate {
        EligibilityGate::new(Arc::clone(backend) as Arc<dyn LotteryBackend>)
    }

    fn expected_outcome(logged_in: bool, verified: bool, banned: bool, paid: bool) -> GateOutcome {
        if !logged_in {
            GateOutcome::RequiresAuth
        } else if !verified {
            GateOutcome::RequiresVerification
        } else if banned {
            GateOutcome::Banned
        } else if paid {
            GateOutcome::AlreadyParticipating
        } else {
            GateOutcome::Eligible
        }
    }

    #[tokio::test]
    async fn test_every_flag_combination_yields_the_priority_outcome() {
        for bits in 0..16u8 {
            let (logged_in, verified, banned, paid) = (
                bits & 1 != 0,
                bits & 2 != 0,
                bits & 4 != 0,
                bits & 8 != 0,
            );

            let backend = Arc::new(
                MockBackend::new()
                    .logged_in(logged_in)
                    .verified(verified)
                    .banned(banned)
                    .paid(paid),
            );

            let outcome = gate(&backend).evaluate().await.unwrap();
            assert_eq!(
                outcome,
                expected_outcome(logged_in, verified, banned, paid),
                "flags: logged_in={} verified={} banned={} paid={}",
                logged_in,
                verified,
                banned,
                paid
            );
        }
    }

    #[tokio::test]
    async fn test_anonymous_banned_user_is_told_to_log_in() {
        // Priority order: auth beats ban even when both block
        let backend = Arc::new(MockBackend::new().logged_in(false).banned(true));

        let outcome = gate(&backend).evaluate().await.unwrap();
        assert_eq!(outcome, GateOutcome::RequiresAuth);
        assert_eq!(backend.call_count("ban_status"), 0);
    }

    #[tokio::test]
    async fn test_unverified_user_short_circuits_before_ban_and_payment() {
        let backend = Arc::new(
            MockBackend::new()
                .logged_in(true)
                .verified(false)
                .banned(true)
                .paid(true),
        );

        let outcome = gate(&backend).evaluate().await.unwrap();
        assert_eq!(outcome, GateOutcome::RequiresVerification);
        assert_eq!(backend.calls(), vec!["auth_status", "verification_status"]);
    }

    #[tokio::test]
    async fn test_eligible_runs_all_four_checks_once() {
        let backend = Arc::new(MockBackend::new().logged_in(true).verified(true));

        let outcome = gate(&backend).evaluate().await.unwrap();
        assert_eq!(outcome, GateOutcome::Eligible);
        assert_eq!(
            backend.calls(),
            vec![
                "auth_status",
                "verification_status",
                "ban_status",
                "payment_status"
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_check_aborts_without_further_calls() {
        let backend = Arc::new(
            MockBackend::new()
                .logged_in(true)
                .verified(true)
                .failing_on("ban_status"),
        );

        let err = gate(&backend).evaluate().await.unwrap_err();
        assert!(matches!(err, LotteryError::Network(_)));
        assert_eq!(
            backend.calls(),
            vec!["auth_status", "verification_status", "ban_status"]
        );
        assert_eq!(backend.call_count("payment_status"), 0);
    }

    #[tokio::test]
    async fn test_failed_first_check_issues_exactly_one_call() {
        let backend = Arc::new(MockBackend::new().failing_on("auth_status"));

        let err = gate(&backend).evaluate().await.unwrap_err();
        // "Status unknown", not any eligibility outcome
        assert!(!err.is_rejection());
        assert_eq!(backend.calls(), vec!["auth_status"]);
    }
}
