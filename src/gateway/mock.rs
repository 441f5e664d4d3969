//! Scripted in-memory backend for tests
//!
//! Mirrors the real backend's observable behavior against a configurable
//! user state, and records every call (and every bearer token it was
//! handed) so tests can assert short-circuiting and token plumbing.

use super::models::{
    AuthStatus, BanStatus, PaymentMethod, PaymentReceipt, PaymentStatus, RoundInfo,
    VerificationStatus, VerificationSubmission,
};
use super::LotteryBackend;
use crate::errors::{LotteryError, LotteryResult};
use crate::session::SessionToken;
use async_trait::async_trait;
use std::sync::{Mutex, RwLock};

#[derive(Debug, Clone)]
struct MockState {
    logged_in: bool,
    verified: bool,
    banned: bool,
    paid: bool,
}

pub struct MockBackend {
    state: RwLock<MockState>,
    round: RwLock<RoundInfo>,
    calls: Mutex<Vec<&'static str>>,
    tokens_seen: Mutex<Vec<String>>,
    last_submission: Mutex<Option<VerificationSubmission>>,
    fail_on: Option<&'static str>,
    reject_tokens: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState {
                logged_in: false,
                verified: false,
                banned: false,
                paid: false,
            }),
            round: RwLock::new(RoundInfo {
                prize_pool: 2500.0,
                ends_at: 1_735_689_600_000,
            }),
            calls: Mutex::new(Vec::new()),
            tokens_seen: Mutex::new(Vec::new()),
            last_submission: Mutex::new(None),
            fail_on: None,
            reject_tokens: false,
        }
    }

    pub fn logged_in(self, value: bool) -> Self {
        self.state.write().unwrap().logged_in = value;
        self
    }

    pub fn verified(self, value: bool) -> Self {
        self.state.write().unwrap().verified = value;
        self
    }

    pub fn banned(self, value: bool) -> Self {
        self.state.write().unwrap().banned = value;
        self
    }

    pub fn paid(self, value: bool) -> Self {
        self.state.write().unwrap().paid = value;
        self
    }

    /// Make the named operation fail with a transport error
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Reject every bearer token on privileged calls
    pub fn rejecting_tokens(mut self) -> Self {
        self.reject_tokens = true;
        self
    }

    pub fn with_round(self, prize_pool: f64, ends_at: i64) -> Self {
        *self.round.write().unwrap() = RoundInfo {
            prize_pool,
            ends_at,
        };
        self
    }

    /// Every operation invoked so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|&&c| c == operation)
            .count()
    }

    /// Every bearer token presented on a privileged call, verbatim
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }

    pub fn last_submission(&self) -> Option<VerificationSubmission> {
        self.last_submission.lock().unwrap().clone()
    }

    pub fn is_banned(&self) -> bool {
        self.state.read().unwrap().banned
    }

    fn record(&self, operation: &'static str) -> LotteryResult<()> {
        self.calls.lock().unwrap().push(operation);
        if self.fail_on == Some(operation) {
            return Err(LotteryError::Network(format!(
                "injected failure on {}",
                operation
            )));
        }
        Ok(())
    }

    fn accept_token(&self, token: &SessionToken) -> LotteryResult<()> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(token.as_str().to_string());
        if self.reject_tokens {
            return Err(LotteryError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl LotteryBackend for MockBackend {
    async fn auth_status(&self) -> LotteryResult<AuthStatus> {
        self.record("auth_status")?;
        Ok(AuthStatus {
            logged_in: self.state.read().unwrap().logged_in,
        })
    }

    async fn login(&self, username: &str, password: &str) -> LotteryResult<SessionToken> {
        self.record("login")?;
        if password.is_empty() {
            return Err(LotteryError::InvalidCredentials);
        }

        self.state.write().unwrap().logged_in = true;
        Ok(SessionToken::new(format!("session-{}", username)))
    }

    async fn register(&self, _username: &str, email: &str, _password: &str) -> LotteryResult<()> {
        self.record("register")?;
        if !email.contains('@') {
            return Err(LotteryError::Validation("Invalid email address".to_string()));
        }
        Ok(())
    }

    async fn logout(&self, token: &SessionToken) -> LotteryResult<()> {
        self.record("logout")?;
        self.accept_token(token)?;
        self.state.write().unwrap().logged_in = false;
        Ok(())
    }

    async fn verification_status(&self) -> LotteryResult<VerificationStatus> {
        self.record("verification_status")?;
        Ok(VerificationStatus {
            verified: self.state.read().unwrap().verified,
        })
    }

    async fn submit_verification(
        &self,
        submission: &VerificationSubmission,
        token: &SessionToken,
    ) -> LotteryResult<()> {
        self.record("submit_verification")?;
        self.accept_token(token)?;

        *self.last_submission.lock().unwrap() = Some(submission.clone());
        if !submission.is_complete() {
            return Err(LotteryError::Service {
                status: 422,
                message: "Both images are required".to_string(),
            });
        }

        self.state.write().unwrap().verified = true;
        Ok(())
    }

    async fn ban_status(&self) -> LotteryResult<BanStatus> {
        self.record("ban_status")?;
        Ok(BanStatus {
            banned: self.state.read().unwrap().banned,
        })
    }

    async fn set_ban(&self, banned: bool, token: &SessionToken) -> LotteryResult<()> {
        self.record(if banned { "set_ban" } else { "clear_ban" })?;
        self.accept_token(token)?;
        self.state.write().unwrap().banned = banned;
        Ok(())
    }

    async fn payment_status(&self) -> LotteryResult<PaymentStatus> {
        self.record("payment_status")?;
        Ok(PaymentStatus {
            paid: self.state.read().unwrap().paid,
        })
    }

    async fn submit_payment(
        &self,
        method: PaymentMethod,
        token: &SessionToken,
    ) -> LotteryResult<PaymentReceipt> {
        self.record("submit_payment")?;
        self.accept_token(token)?;

        self.state.write().unwrap().paid = true;
        Ok(PaymentReceipt {
            message: format!("Payment via {} accepted", method),
        })
    }

    async fn round_info(&self) -> LotteryResult<RoundInfo> {
        self.record("round_info")?;
        Ok(*self.round.read().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let backend = MockBackend::new().logged_in(true);

        backend.auth_status().await.unwrap();
        backend.round_info().await.unwrap();

        assert_eq!(backend.calls(), vec!["auth_status", "round_info"]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let backend = MockBackend::new().failing_on("ban_status");

        let err = backend.ban_status().await.unwrap_err();
        assert!(matches!(err, LotteryError::Network(_)));
    }

    #[tokio::test]
    async fn test_token_rejection() {
        let backend = MockBackend::new().rejecting_tokens();
        let token = SessionToken::new("stale");

        let err = backend.logout(&token).await.unwrap_err();
        assert!(matches!(err, LotteryError::Unauthorized));
        assert_eq!(backend.tokens_seen(), vec!["stale".to_string()]);
    }
}
