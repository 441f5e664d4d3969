//! jackpot - client for a pay-to-enter lottery service
//!
//! The core of the crate is the eligibility gate: the ordered,
//! short-circuiting sequence of authorization checks (authentication,
//! identity verification, self-exclusion, prior payment) that must all
//! pass before the user may pick a payment method and enter the current
//! round. Around it sit the typed API gateway client, the session token
//! store, the identity-document encoder, and the flows that act on the
//! gate's decision.

pub mod config;
pub mod encoder;
pub mod errors;
pub mod flow;
pub mod gate;
pub mod gateway;
pub mod session;

pub use errors::{LotteryError, LotteryResult};
pub use flow::{BanControl, ParticipationFlow, UserStatusSnapshot, VerificationFlow};
pub use gate::{EligibilityGate, GateOutcome};
pub use gateway::models::PaymentMethod;
pub use session::{SessionStore, SessionToken};
