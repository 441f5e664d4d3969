//! jackpot CLI
//!
//! Terminal driver for the participation flows: log in, verify identity,
//! manage self-exclusion, and enter the current round.

use clap::{Parser, Subcommand};
use jackpot::config::ConfigLoader;
use jackpot::flow::{BanControl, ParticipationFlow, VerificationFlow};
use jackpot::gate::GateOutcome;
use jackpot::gateway::models::PaymentMethod;
use jackpot::gateway::{HttpBackend, LotteryBackend};
use jackpot::session::{FileSession, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "jackpot")]
#[command(about = "Lottery participation client", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current round's jackpot, odds and end time
    Info,
    /// Show the account status snapshot
    Status,
    /// Log in and store the session token
    Login { username: String, password: String },
    /// Create an account (log in afterwards)
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Log out and drop the stored session token
    Logout,
    /// Attempt to enter the current round with a payment method
    Enter {
        /// One of: credit-card, paypal, google-pay, apple-pay
        method: String,
    },
    /// Upload identity documents for verification
    Verify {
        /// Image of the front of the ID card
        #[arg(long)]
        id_front: Option<PathBuf>,
        /// Image of the person holding the ID
        #[arg(long)]
        selfie: Option<PathBuf>,
    },
    /// Show or toggle the self-exclusion flag
    Ban {
        /// Flip the current state
        #[arg(long)]
        toggle: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;

    let backend: Arc<dyn LotteryBackend> = Arc::new(HttpBackend::new(&config)?);
    let session: Arc<dyn SessionStore> = Arc::new(FileSession::new(&config.session_file));
    let flow = ParticipationFlow::new(Arc::clone(&backend), Arc::clone(&session));

    match args.command {
        Command::Info => {
            // Display-only read, independent of any eligibility state
            let info = backend.round_info().await?;
            println!("JACKPOT  {:.2}€", info.jackpot());
            println!("Odds     1 in {}", info.odds());
            match info.ends_at_utc() {
                Some(ends) => println!("Ends on  {}", ends.format("%d.%m.%Y %H:%M UTC")),
                None => println!("Ends on  (unknown)"),
            }
        }
        Command::Status => {
            let status = flow.refresh().await?;
            println!("Logged in      {}", status.authenticated);
            println!("Verified       {}", status.verified);
            println!("Self-excluded  {}", status.banned);
            println!("Participating  {}", status.paid_current_round);
        }
        Command::Login { username, password } => {
            flow.log_in(&username, &password).await?;
            println!("✅ Logged in as {}", username);
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            flow.register(&username, &email, &password).await?;
            println!("✅ Registered {}. Log in to continue.", username);
        }
        Command::Logout => {
            flow.log_out().await?;
            println!("✅ Logged out");
        }
        Command::Enter { method } => {
            let method: PaymentMethod = method.parse()?;
            match flow.attempt().await? {
                GateOutcome::RequiresAuth => {
                    println!("Please log in or register first (jackpot login / jackpot register)");
                }
                GateOutcome::RequiresVerification => {
                    println!("Please verify your identity first (jackpot verify)");
                }
                GateOutcome::Banned => {
                    println!("You are self-excluded. Lift the ban first (jackpot ban --toggle)");
                }
                GateOutcome::AlreadyParticipating => {
                    println!("You are already participating in this round.");
                }
                GateOutcome::Eligible => {
                    let (receipt, status) = flow.enter(method).await?;
                    println!("🎉 {}", receipt.message);
                    println!(
                        "You're in the game! Participating: {}",
                        status.paid_current_round
                    );
                }
            }
        }
        Command::Verify { id_front, selfie } => {
            let verification = VerificationFlow::new(Arc::clone(&backend), Arc::clone(&session));

            let id_front = read_image(id_front.as_deref())?;
            let selfie = read_image(selfie.as_deref())?;

            use jackpot::flow::VerificationOutcome;
            match verification
                .submit(id_front.as_deref(), selfie.as_deref())
                .await?
            {
                VerificationOutcome::AlreadyVerified => println!("You are already verified."),
                VerificationOutcome::Submitted => println!("✅ Verification submitted"),
            }
        }
        Command::Ban { toggle } => {
            let mut control = BanControl::load(Arc::clone(&backend), Arc::clone(&session)).await?;
            if toggle {
                let banned = control.toggle().await?;
                println!(
                    "Self-exclusion is now {}",
                    if banned { "ON" } else { "OFF" }
                );
            } else {
                println!(
                    "You are currently {}banned.",
                    if control.is_banned() { "" } else { "not " }
                );
            }
        }
    }

    Ok(())
}

/// Read an optional image fully into memory
fn read_image(path: Option<&std::path::Path>) -> std::io::Result<Option<Vec<u8>>> {
    match path {
        Some(p) => Ok(Some(std::fs::read(p)?)),
        None => Ok(None),
    }
}
