//! End-to-end participation scenario against the scripted backend
//! This walks a new user from registration through verification,
//! self-exclusion and entry into the current round.

use jackpot::flow::{BanControl, ParticipationFlow, VerificationFlow, VerificationOutcome};
use jackpot::gate::GateOutcome;
use jackpot::gateway::{LotteryBackend, MockBackend};
use jackpot::session::{FileSession, SessionStore};
use jackpot::PaymentMethod;
use std::sync::Arc;

#[tokio::test]
async fn test_full_participation_journey() {
    let backend = Arc::new(MockBackend::new().with_round(5000.0, 1_735_689_600_000));
    let session_dir = tempfile::tempdir().unwrap();
    let session: Arc<dyn SessionStore> =
        Arc::new(FileSession::new(session_dir.path().join("session")));

    let flow = ParticipationFlow::new(
        Arc::clone(&backend) as Arc<dyn LotteryBackend>,
        Arc::clone(&session),
    );

    // === PHASE 1: Anonymous user is sent to login ===
    assert_eq!(flow.attempt().await.unwrap(), GateOutcome::RequiresAuth);

    flow.register("carol", "carol@example.com", "s3cret")
        .await
        .unwrap();
    flow.log_in("carol", "s3cret").await.unwrap();
    assert_eq!(session.get().unwrap().as_str(), "session-carol");

    // === PHASE 2: Logged in but unverified ===
    assert_eq!(
        flow.attempt().await.unwrap(),
        GateOutcome::RequiresVerification
    );

    let verification = VerificationFlow::new(
        Arc::clone(&backend) as Arc<dyn LotteryBackend>,
        Arc::clone(&session),
    );
    let outcome = verification
        .submit(Some(b"id-front-bytes".as_slice()), Some(b"selfie-bytes".as_slice()))
        .await
        .unwrap();
    assert_eq!(outcome, VerificationOutcome::Submitted);

    // === PHASE 3: Self-exclusion blocks participation ===
    let mut ban = BanControl::load(
        Arc::clone(&backend) as Arc<dyn LotteryBackend>,
        Arc::clone(&session),
    )
    .await
    .unwrap();
    assert!(ban.toggle().await.unwrap());
    assert_eq!(flow.attempt().await.unwrap(), GateOutcome::Banned);

    assert!(!ban.toggle().await.unwrap());

    // === PHASE 4: Eligible, pay the stake, refetch shows the new truth ===
    assert_eq!(flow.attempt().await.unwrap(), GateOutcome::Eligible);

    let (receipt, status) = flow.enter(PaymentMethod::ApplePay).await.unwrap();
    assert!(receipt.message.contains("Apple Pay"));
    assert!(status.paid_current_round);

    assert_eq!(
        flow.attempt().await.unwrap(),
        GateOutcome::AlreadyParticipating
    );

    // === PHASE 5: Logout drops the persisted token ===
    flow.log_out().await.unwrap();
    assert!(session.get().is_none());
    assert_eq!(flow.attempt().await.unwrap(), GateOutcome::RequiresAuth);
}

#[tokio::test]
async fn test_round_info_is_independent_of_eligibility() {
    let backend = Arc::new(MockBackend::new().with_round(2500.0, 1_735_689_600_000));

    // Display data is served to anonymous and banned users alike
    let info = backend.round_info().await.unwrap();
    assert_eq!(info.jackpot(), 2000.0);
    assert_eq!(info.odds(), 250);

    // Fetching it never touches the eligibility checks
    assert_eq!(backend.call_count("auth_status"), 0);
    assert_eq!(backend.call_count("payment_status"), 0);
}

#[tokio::test]
async fn test_gate_failure_surfaces_as_unknown_status() {
    let backend = Arc::new(
        MockBackend::new()
            .logged_in(true)
            .verified(true)
            .failing_on("payment_status"),
    );
    let session_dir = tempfile::tempdir().unwrap();
    let session: Arc<dyn SessionStore> =
        Arc::new(FileSession::new(session_dir.path().join("session")));

    let flow = ParticipationFlow::new(
        Arc::clone(&backend) as Arc<dyn LotteryBackend>,
        session,
    );

    // The failed check aborts the decision; no outcome is substituted
    let err = flow.attempt().await.unwrap_err();
    assert!(!err.is_rejection());
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
