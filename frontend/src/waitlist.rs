//! Waitlist signups, posted straight to a webhook.
//!
//! The webhook does not send CORS headers, so the request goes out in
//! `no-cors` mode and the response is opaque. `Ok` therefore means "the
//! browser sent it", not "the webhook stored it"; there is no way to tell
//! those apart from the page.

use chrono::Utc;
use gloo_net::http::Request;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;
use web_sys::RequestMode;

use crate::config;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitlistSubmission {
    pub email: String,
    pub source: String,
    pub timestamp: String,
}

/// What we know after a submission left the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitlistReceipt {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaitlistError {
    #[error("{0}")]
    Validation(String),

    #[error("could not reach the waitlist: {0}")]
    Network(String),
}

pub fn validate_email(input: &str) -> Result<String, WaitlistError> {
    let email = input.trim();
    if email.is_empty() {
        return Err(WaitlistError::Validation("Please enter your email".to_string()));
    }

    let invalid = || WaitlistError::Validation("Please enter a valid email address".to_string());
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(email.to_lowercase()),
        _ => Err(invalid()),
    }
}

impl WaitlistSubmission {
    pub fn new(email: &str, source: &str) -> Result<Self, WaitlistError> {
        Ok(Self {
            email: validate_email(email)?,
            source: source.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

/// Post a signup. `source` names the form it came from (`hero`, `footer`).
pub async fn submit(email: &str, source: &str) -> Result<WaitlistReceipt, WaitlistError> {
    let submission = WaitlistSubmission::new(email, source)?;

    let request = Request::post(&config::get_waitlist_webhook_url())
        .mode(RequestMode::NoCors)
        .json(&submission)
        .map_err(|e| WaitlistError::Network(e.to_string()))?;

    match request.send().await {
        Ok(_) => {
            info!("[Waitlist] Submitted signup from {}", source);
            Ok(WaitlistReceipt {
                email: submission.email,
            })
        }
        Err(e) => {
            warn!("[Waitlist] Submission failed: {}", e);
            Err(WaitlistError::Network(e.to_string()))
        }
    }
}
