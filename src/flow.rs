//! Participation, verification and self-exclusion flows
//!
//! The flows consume the eligibility gate's decision and drive the
//! privileged calls. The session store is an explicitly threaded owned
//! object, not ambient state; every privileged call reads the token
//! through it immediately before the request goes out.

use crate::errors::{LotteryError, LotteryResult};
use crate::gate::{EligibilityGate, GateOutcome};
use crate::gateway::models::{PaymentMethod, PaymentReceipt, VerificationSubmission};
use crate::gateway::LotteryBackend;
use crate::session::SessionStore;
use std::sync::Arc;
use tracing::{debug, info};

/// The four independent status facts, reconstructed by querying four
/// services. The reads may land at different instants; the snapshot is a
/// display aid, never the input to an eligibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatusSnapshot {
    pub authenticated: bool,
    pub verified: bool,
    pub banned: bool,
    pub paid_current_round: bool,
}

/// Drives a participation attempt from gate decision to entry payment
pub struct ParticipationFlow {
    backend: Arc<dyn LotteryBackend>,
    session: Arc<dyn SessionStore>,
    gate: EligibilityGate,
}

impl ParticipationFlow {
    pub fn new(backend: Arc<dyn LotteryBackend>, session: Arc<dyn SessionStore>) -> Self {
        let gate = EligibilityGate::new(Arc::clone(&backend));
        Self {
            backend,
            session,
            gate,
        }
    }

    /// Log in and store the minted session token
    pub async fn log_in(&self, username: &str, password: &str) -> LotteryResult<()> {
        let token = self.backend.login(username, password).await?;
        self.session.set(token);
        info!("Logged in as {}", username);
        Ok(())
    }

    /// Create an account. The caller logs in afterwards; registration does
    /// not mint a token.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> LotteryResult<()> {
        self.backend.register(username, email, password).await
    }

    /// Invalidate the session server-side and drop the stored token.
    /// An already-rejected token is dropped as well; the backend no longer
    /// honors it.
    pub async fn log_out(&self) -> LotteryResult<()> {
        let token = self.session.get().ok_or(LotteryError::Unauthorized)?;

        match self.backend.logout(&token).await {
            Ok(()) => {
                self.session.clear();
                Ok(())
            }
            Err(LotteryError::Unauthorized) => {
                self.session.clear();
                Err(LotteryError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    /// Run the eligibility gate for one participation attempt
    pub async fn attempt(&self) -> LotteryResult<GateOutcome> {
        self.gate.evaluate().await
    }

    /// Pay the entry stake with the chosen method.
    ///
    /// The caller is expected to have seen `Eligible` from a fresh
    /// [`attempt`](Self::attempt). On success the participation state has
    /// changed server-side, so the full status set is refetched rather
    /// than mutated locally; the client's view of truth stays
    /// server-sourced.
    pub async fn enter(
        &self,
        method: PaymentMethod,
    ) -> LotteryResult<(PaymentReceipt, UserStatusSnapshot)> {
        let token = self.session.get().ok_or(LotteryError::Unauthorized)?;

        let receipt = self.backend.submit_payment(method, &token).await?;
        info!("Entered the round via {}: {}", method, receipt.message);

        let status = self.refresh().await?;
        Ok((receipt, status))
    }

    /// Invalidate-and-refetch: rebuild the status snapshot from all four
    /// services. The reads are independent of the gate's ordering
    /// guarantee, so they run concurrently.
    pub async fn refresh(&self) -> LotteryResult<UserStatusSnapshot> {
        debug!("Refreshing user status snapshot");
        let (auth, verification, ban, payment) = tokio::try_join!(
            self.backend.auth_status(),
            self.backend.verification_status(),
            self.backend.ban_status(),
            self.backend.payment_status(),
        )?;

        Ok(UserStatusSnapshot {
            authenticated: auth.logged_in,
            verified: verification.verified,
            banned: ban.banned,
            paid_current_round: payment.paid,
        })
    }
}

/// Outcome of a verification submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The user is already verified; re-submission is refused client-side
    AlreadyVerified,
    /// The documents were accepted. Success of the call is itself proof of
    /// the new verified state; no re-query happens.
    Submitted,
}

/// Identity verification sub-flow
pub struct VerificationFlow {
    backend: Arc<dyn LotteryBackend>,
    session: Arc<dyn SessionStore>,
}

impl VerificationFlow {
    pub fn new(backend: Arc<dyn LotteryBackend>, session: Arc<dyn SessionStore>) -> Self {
        Self { backend, session }
    }

    pub async fn is_verified(&self) -> LotteryResult<bool> {
        Ok(self.backend.verification_status().await?.verified)
    }

    /// Encode and upload the two identity images.
    ///
    /// Checks the current verification status first and refuses a
    /// re-submission. Either image may be absent; the backend will reject
    /// an incomplete submission.
    pub async fn submit(
        &self,
        id_front: Option<&[u8]>,
        person: Option<&[u8]>,
    ) -> LotteryResult<VerificationOutcome> {
        if self.is_verified().await? {
            debug!("Already verified, refusing re-submission");
            return Ok(VerificationOutcome::AlreadyVerified);
        }

        let submission = VerificationSubmission::new(id_front, person);
        let token = self.session.get().ok_or(LotteryError::Unauthorized)?;

        self.backend.submit_verification(&submission, &token).await?;
        info!("Identity verification submitted");
        Ok(VerificationOutcome::Submitted)
    }
}

/// Self-exclusion toggle, standalone from the main gate.
///
/// Reads the current ban status on load; a toggle issues exactly one
/// set/clear call and flips the local state only after that call
/// succeeds, never before.
pub struct BanControl {
    backend: Arc<dyn LotteryBackend>,
    session: Arc<dyn SessionStore>,
    banned: bool,
}

impl BanControl {
    pub async fn load(
        backend: Arc<dyn LotteryBackend>,
        session: Arc<dyn SessionStore>,
    ) -> LotteryResult<Self> {
        let banned = backend.ban_status().await?.banned;
        Ok(Self {
            backend,
            session,
            banned,
        })
    }

    pub fn is_banned(&self) -> bool {
        self.banned
    }

    /// Flip the self-exclusion flag and return the new state
    pub async fn toggle(&mut self) -> LotteryResult<bool> {
        let target = !self.banned;
        let token = self.session.get().ok_or(LotteryError::Unauthorized)?;

        self.backend.set_ban(target, &token).await?;
        self.banned = target;
        info!(
            "Self-exclusion {}",
            if target { "enabled" } else { "lifted" }
        );
        Ok(self.banned)
    }
}
