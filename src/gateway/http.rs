//! HTTP implementation of [`LotteryBackend`]
//!
//! Thin `reqwest` wrapper over the backend's five services. Transport
//! failures map to `Network`; rejected requests map to the typed error the
//! endpoint is documented to produce, with `Service{status,message}` as the
//! catch-all. The bearer token is attached only on the calls that take one.

use super::models::{
    AuthStatus, BanStatus, LoginRequest, LoginResponse, PaymentMethod, PaymentReceipt,
    PaymentRequest, PaymentStatus, RegisterRequest, RoundInfo, VerificationStatus,
    VerificationSubmission,
};
use super::LotteryBackend;
use crate::config::ClientConfig;
use crate::errors::{LotteryError, LotteryResult};
use crate::session::SessionToken;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> LotteryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pull the backend's `{message}` out of an error body, falling back to
    /// the canonical status text.
    async fn error_message(response: Response) -> String {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: String,
        }

        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        }
    }

    /// Default mapping for a rejected request
    async fn reject(response: Response) -> LotteryError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return LotteryError::Unauthorized;
        }

        let message = Self::error_message(response).await;
        warn!("Backend rejected request ({}): {}", status, message);
        LotteryError::Service {
            status: status.as_u16(),
            message,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> LotteryResult<T> {
        debug!("GET {}", path);
        let response = self.http.get(self.url(path)).send().await?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl LotteryBackend for HttpBackend {
    async fn auth_status(&self) -> LotteryResult<AuthStatus> {
        self.get_json("/api/users/auth/status").await
    }

    async fn login(&self, username: &str, password: &str) -> LotteryResult<SessionToken> {
        debug!("POST /api/users/login for {}", username);
        let response = self
            .http
            .post(self.url("/api/users/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => {
                let body: LoginResponse = response.json().await?;
                Ok(SessionToken::new(body.session_id))
            }
            StatusCode::UNAUTHORIZED => Err(LotteryError::InvalidCredentials),
            _ => Err(Self::reject(response).await),
        }
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> LotteryResult<()> {
        debug!("POST /api/users/register for {}", username);
        let response = self
            .http
            .post(self.url("/api/users/register"))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_client_error() {
            Err(LotteryError::Validation(Self::error_message(response).await))
        } else {
            Err(Self::reject(response).await)
        }
    }

    async fn logout(&self, token: &SessionToken) -> LotteryResult<()> {
        debug!("POST /api/users/logout");
        let response = self
            .http
            .post(self.url("/api/users/logout"))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::reject(response).await)
        }
    }

    async fn verification_status(&self) -> LotteryResult<VerificationStatus> {
        self.get_json("/api/verification/status").await
    }

    async fn submit_verification(
        &self,
        submission: &VerificationSubmission,
        token: &SessionToken,
    ) -> LotteryResult<()> {
        debug!("POST /api/verification/verify");
        let response = self
            .http
            .post(self.url("/api/verification/verify"))
            .bearer_auth(token.as_str())
            .json(submission)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::reject(response).await)
        }
    }

    async fn ban_status(&self) -> LotteryResult<BanStatus> {
        self.get_json("/api/ban/status").await
    }

    async fn set_ban(&self, banned: bool, token: &SessionToken) -> LotteryResult<()> {
        // The OASIS routes identify the user by the bearer token
        let path = if banned {
            "/api/ban/oasis-ban"
        } else {
            "/api/ban/oasis-unban"
        };
        debug!("POST {}", path);

        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token.as_str())
            .json(&serde_json::json!({}))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::reject(response).await)
        }
    }

    async fn payment_status(&self) -> LotteryResult<PaymentStatus> {
        self.get_json("/api/payments/status").await
    }

    async fn submit_payment(
        &self,
        method: PaymentMethod,
        token: &SessionToken,
    ) -> LotteryResult<PaymentReceipt> {
        debug!("POST /api/payments/pay via {}", method);
        let response = self
            .http
            .post(self.url("/api/payments/pay"))
            .bearer_auth(token.as_str())
            .json(&PaymentRequest {
                payment_method: method,
            })
            .send()
            .await?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(LotteryError::Unauthorized),
            s if s.is_client_error() => Err(LotteryError::PaymentRejected(
                Self::error_message(response).await,
            )),
            _ => Err(Self::reject(response).await),
        }
    }

    async fn round_info(&self) -> LotteryResult<RoundInfo> {
        self.get_json("/api/games/information").await
    }
}
