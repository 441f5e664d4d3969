//! Typed client for the lottery backend services
//!
//! One method per external capability across the five backend services
//! (auth, verification, ban, payment, game-info). Every call is a single
//! network round-trip returning a typed result; nothing retries
//! automatically. Calls marked with a token transmit it as a bearer
//! credential; unauthenticated calls never transmit it.

pub mod http;
pub mod mock;
pub mod models;

pub use http::HttpBackend;
pub use mock::MockBackend;

use crate::errors::LotteryResult;
use crate::session::SessionToken;
use async_trait::async_trait;
use models::{
    AuthStatus, BanStatus, PaymentMethod, PaymentReceipt, PaymentStatus, RoundInfo,
    VerificationStatus, VerificationSubmission,
};

/// Remote operations exposed by the lottery backend
#[async_trait]
pub trait LotteryBackend: Send + Sync {
    /// Whether the current browser/client session is logged in
    async fn auth_status(&self) -> LotteryResult<AuthStatus>;

    /// Exchange credentials for a session token.
    /// Fails with `InvalidCredentials` on rejection.
    async fn login(&self, username: &str, password: &str) -> LotteryResult<SessionToken>;

    /// Create an account. Fails with `Validation` on malformed input.
    async fn register(&self, username: &str, email: &str, password: &str) -> LotteryResult<()>;

    /// Invalidate the session server-side
    async fn logout(&self, token: &SessionToken) -> LotteryResult<()>;

    /// Whether the user has completed identity verification
    async fn verification_status(&self) -> LotteryResult<VerificationStatus>;

    /// Upload the identity documents. Fails with `Unauthorized` if the
    /// token is absent or rejected.
    async fn submit_verification(
        &self,
        submission: &VerificationSubmission,
        token: &SessionToken,
    ) -> LotteryResult<()>;

    /// Whether the user has self-excluded
    async fn ban_status(&self) -> LotteryResult<BanStatus>;

    /// Set or clear the self-exclusion flag. The user's identity comes from
    /// the bearer token.
    async fn set_ban(&self, banned: bool, token: &SessionToken) -> LotteryResult<()>;

    /// Whether the user already paid into the current round
    async fn payment_status(&self) -> LotteryResult<PaymentStatus>;

    /// Pay the entry stake for the current round.
    /// Fails with `Unauthorized` or `PaymentRejected`.
    async fn submit_payment(
        &self,
        method: PaymentMethod,
        token: &SessionToken,
    ) -> LotteryResult<PaymentReceipt>;

    /// Prize pool and end time of the current round. Display only, never
    /// part of an eligibility decision.
    async fn round_info(&self) -> LotteryResult<RoundInfo>;
}
