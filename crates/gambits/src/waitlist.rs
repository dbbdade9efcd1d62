//! Waitlist signups.
//!
//! Posts `{"email": ...}` as JSON to the configured form endpoint on a
//! background thread. An empty or `#` endpoint means no backend is wired up,
//! in which case a short delay stands in for the request and it succeeds.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeout for HTTP requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a simulated signup takes.
const SIMULATED_DELAY: Duration = Duration::from_secs(1);

/// Shown when the endpoint rejects a signup without saying why.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Shown when the endpoint could not be reached.
pub const NETWORK_ERROR: &str = "Network error. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    #[error("signup rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
}

impl WaitlistError {
    /// Text to put in front of the user.
    pub fn user_message(&self) -> &str {
        match self {
            WaitlistError::Rejected { message, .. } => message,
            WaitlistError::Transport(_) => NETWORK_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
}

/// Error body some form backends send back, e.g. `{"error": "Already signed up"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Pull a readable message out of an error response body.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.filter(|message| !message.trim().is_empty())
}

/// Whether `endpoint` is a stand-in rather than a real URL.
pub fn is_placeholder(endpoint: &str) -> bool {
    let endpoint = endpoint.trim();
    endpoint.is_empty() || endpoint == "#"
}

/// A signup running in the background.
#[derive(Debug)]
pub struct Submission {
    receiver: Receiver<Result<(), WaitlistError>>,
}

impl Submission {
    /// The outcome, once the request has finished.
    pub fn poll(&self) -> Option<Result<(), WaitlistError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(WaitlistError::Transport(
                "signup thread exited without a result".to_string(),
            ))),
        }
    }
}

/// Sends signups to a form endpoint.
#[derive(Debug, Clone)]
pub struct WaitlistClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl WaitlistClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start submitting `email`. The result arrives through the returned
    /// [`Submission`].
    pub fn submit(&self, email: String) -> Submission {
        let (sender, receiver) = mpsc::channel();
        let client = self.clone();

        thread::spawn(move || {
            let result = if is_placeholder(&client.endpoint) {
                tracing::debug!("No waitlist endpoint configured, simulating signup");
                thread::sleep(SIMULATED_DELAY);
                Ok(())
            } else {
                client.post(&email)
            };
            if let Err(e) = &result {
                tracing::warn!("Waitlist signup failed: {e}");
            } else {
                tracing::info!("Waitlist signup accepted");
            }
            // The receiver is gone if the app quit mid-request.
            let _ = sender.send(result);
        });

        Submission { receiver }
    }

    fn post(&self, email: &str) -> Result<(), WaitlistError> {
        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .send_json(SignupRequest { email })
            .map_err(|e| WaitlistError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .body_mut()
            .read_to_string()
            .ok()
            .and_then(|body| error_message(&body))
            .unwrap_or_else(|| GENERIC_ERROR.to_string());
        Err(WaitlistError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
