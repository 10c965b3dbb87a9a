//! API key rotation

use crate::config::{Credential, Platform, TimeoutConfig};
use crate::error::{GateError, GateResult};
use parking_lot::Mutex;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, warn};

/// An HTTP client together with the credential it is bound to.
///
/// Cloning is cheap; adapters take a snapshot per request so a concurrent
/// rotation never changes the key halfway through a call.
#[derive(Debug, Clone)]
pub struct Transport {
    pub http: Client,
    pub credential: Credential,
    /// Whole-request deadline for non-streaming calls
    pub request_timeout: Duration,
}

impl Transport {
    /// Start a POST to `url`.
    ///
    /// Non-streaming requests get the whole-request deadline. Streams are
    /// only bounded by the client's per-read timeout, so a backend that keeps
    /// sending fragments is never cut off.
    pub fn post(&self, url: &str, stream: bool) -> RequestBuilder {
        let request = self.http.post(url);
        if stream {
            request
        } else {
            request.timeout(self.request_timeout)
        }
    }
}

/// Build an HTTP client with the configured timeouts.
///
/// The request timeout is applied per read here; the total deadline is set
/// per request by [`Transport::post`].
pub fn build_http_client(platform: Platform, timeouts: &TimeoutConfig) -> GateResult<Client> {
    Client::builder()
        .connect_timeout(timeouts.connection_timeout())
        .read_timeout(timeouts.request_timeout())
        .build()
        .map_err(|e| {
            GateError::config_incomplete(
                platform.name(),
                format!("failed to create HTTP client: {e}"),
            )
        })
}

struct RotatorState {
    index: usize,
    transport: Transport,
}

/// Ordered credential list with a current position.
///
/// The index and the transport bound to it change together under one lock,
/// so readers always see a consistent pair.
pub struct KeyRotator {
    platform: Platform,
    credentials: Vec<Credential>,
    timeouts: TimeoutConfig,
    state: Mutex<RotatorState>,
}

impl KeyRotator {
    /// Create a rotator positioned at the first credential.
    ///
    /// # Errors
    ///
    /// Returns `ConfigIncomplete` if `credentials` is empty or the HTTP
    /// client cannot be built.
    pub fn new(
        platform: Platform,
        credentials: Vec<Credential>,
        timeouts: TimeoutConfig,
    ) -> GateResult<Self> {
        let Some(first) = credentials.first().cloned() else {
            return Err(GateError::config_incomplete(
                platform.name(),
                "no credentials configured",
            ));
        };

        let http = build_http_client(platform, &timeouts)?;
        debug!(
            platform = %platform,
            credentials = credentials.len(),
            key = %first.masked_key(),
            "key rotator ready"
        );

        Ok(Self {
            platform,
            credentials,
            timeouts,
            state: Mutex::new(RotatorState {
                index: 0,
                transport: Transport {
                    http,
                    credential: first,
                    request_timeout: timeouts.request_timeout(),
                },
            }),
        })
    }

    /// Move to the next credential, wrapping around, and rebind the transport.
    ///
    /// Never fails. If a fresh HTTP client cannot be built the previous one
    /// is kept and only the credential changes.
    pub fn advance(&self) {
        let mut state = self.state.lock();
        let next = (state.index + 1) % self.credentials.len();
        let credential = self.credentials[next].clone();

        match build_http_client(self.platform, &self.timeouts) {
            Ok(http) => state.transport.http = http,
            Err(e) => warn!(
                platform = %self.platform,
                error = %e,
                "keeping previous HTTP client after rebuild failure"
            ),
        }

        debug!(
            platform = %self.platform,
            index = next,
            key = %credential.masked_key(),
            "rotated to next credential"
        );
        state.index = next;
        state.transport.credential = credential;
    }

    /// Snapshot of the transport for one request
    pub fn current(&self) -> Transport {
        self.state.lock().transport.clone()
    }

    /// Position of the current credential
    pub fn index(&self) -> usize {
        self.state.lock().index
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Number of credentials
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Always false; construction rejects an empty list
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl std::fmt::Debug for KeyRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRotator")
            .field("platform", &self.platform)
            .field("credentials", &self.credentials.len())
            .field("index", &self.index())
            .finish()
    }
}
