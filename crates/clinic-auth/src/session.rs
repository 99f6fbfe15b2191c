//! Session management with on-demand token refresh using FSM-based state tracking.
//!
//! The FSM tracks transient phases (loading, logging in, refreshing) that
//! are never persisted. Tokens live in the [`TokenVault`]; the decoded
//! [`Session`] lives in memory and is rebuilt from the vault by
//! [`SessionManager::bootstrap`].

use crate::auth_fsm::{SessionMachine, SessionMachineInput, SessionPhase};
use crate::registration::registration_failure;
use crate::{AuthError, AuthResult, Claims, Registration, Specialization};
use chrono::{DateTime, Utc};
use clinic_storage::{StorageResult, TokenPair, TokenVault};
use clinic_transport::{summarize_body, ApiRequest, ApiResponse, Transport};
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The authenticated user as seen by the client.
///
/// Replaced wholesale on refresh; screens only ever see clones.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
    pub roles: BTreeSet<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a token pair, decoding the access token.
    pub fn from_tokens(access_token: String, refresh_token: String) -> AuthResult<Self> {
        let claims = Claims::decode(&access_token)?;
        let expires_at = claims.expires_at()?;
        Ok(Self {
            subject: claims.sub,
            roles: claims.roles.into_iter().collect(),
            access_token,
            refresh_token,
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// True if the session holds at least one of `allowed`.
    pub fn has_role(&self, allowed: &[&str]) -> bool {
        allowed.iter().any(|role| self.roles.contains(*role))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("subject", &self.subject)
            .field("roles", &self.roles)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Public session state for screens and guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup reload or login in progress.
    Loading,
    Authenticated(Session),
    Unauthenticated,
    /// Last login attempt failed with this message.
    Error(String),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Callback type for session state change notifications.
pub type SessionStateCallback = Box<dyn Fn(&SessionState) + Send + Sync>;

/// `{token, refreshToken}` from login and refresh.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
    #[serde(rename = "refreshToken", default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpecializationListing {
    Bare(Vec<Specialization>),
    Page {
        #[serde(default)]
        content: Vec<Specialization>,
    },
}

/// Owns the session lifecycle: bootstrap, login, refresh, logout.
pub struct SessionManager {
    vault: TokenVault,
    transport: Arc<dyn Transport>,
    fsm: Mutex<SessionMachine>,
    session: RwLock<Option<Session>>,
    last_error: Mutex<Option<String>>,
    /// Held for the whole of a bootstrap, login or refresh so only one
    /// runs at a time.
    lifecycle_gate: tokio::sync::Mutex<()>,
    state_callback: Mutex<Option<SessionStateCallback>>,
    last_published: Mutex<Option<SessionState>>,
}

impl SessionManager {
    pub fn new(vault: TokenVault, transport: Arc<dyn Transport>) -> Self {
        Self {
            vault,
            transport,
            fsm: Mutex::new(SessionMachine::new()),
            session: RwLock::new(None),
            last_error: Mutex::new(None),
            lifecycle_gate: tokio::sync::Mutex::new(()),
            state_callback: Mutex::new(None),
            last_published: Mutex::new(None),
        }
    }

    /// Set a callback to be notified when the public state changes.
    pub fn set_state_callback(&self, callback: SessionStateCallback) {
        *self.state_callback.lock() = Some(callback);
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from(self.fsm.lock().state())
    }

    pub fn state(&self) -> SessionState {
        match self.phase() {
            SessionPhase::Loading | SessionPhase::LoggingIn => SessionState::Loading,
            SessionPhase::Authenticated => match self.session() {
                Some(session) => SessionState::Authenticated(session),
                None => SessionState::Unauthenticated,
            },
            // A bootstrap refresh has no session yet.
            SessionPhase::Refreshing => match self.session() {
                Some(session) => SessionState::Authenticated(session),
                None => SessionState::Loading,
            },
            SessionPhase::Unauthenticated => SessionState::Unauthenticated,
            SessionPhase::Failed => SessionState::Error(
                self.last_error
                    .lock()
                    .clone()
                    .unwrap_or_else(|| "Authentication failed".to_string()),
            ),
        }
    }

    /// Snapshot of the current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// False when unauthenticated.
    pub fn has_role(&self, allowed: &[&str]) -> bool {
        self.session
            .read()
            .as_ref()
            .is_some_and(|session| session.has_role(allowed))
    }

    fn transition(&self, input: &SessionMachineInput) -> AuthResult<SessionPhase> {
        let (old_phase, new_phase) = {
            let mut fsm = self.fsm.lock();
            let old_phase = SessionPhase::from(fsm.state());
            fsm.consume(input).map_err(|_| {
                AuthError::InvalidStateTransition(format!(
                    "Cannot apply {:?} in state {:?}",
                    input,
                    fsm.state()
                ))
            })?;
            (old_phase, SessionPhase::from(fsm.state()))
        };

        if old_phase != new_phase {
            debug!(old_phase = ?old_phase, new_phase = ?new_phase, "Session phase transition");
        }
        self.publish();
        Ok(new_phase)
    }

    /// Apply an input that must always land in `Unauthenticated`.
    fn force_unauthenticated(&self, input: &SessionMachineInput) {
        {
            let mut fsm = self.fsm.lock();
            if fsm.consume(input).is_err() {
                warn!(input = ?input, state = ?fsm.state(), "Resetting session machine");
                *fsm = SessionMachine::new();
            }
        }
        self.publish();
    }

    fn publish(&self) {
        let state = self.state();
        {
            let mut last = self.last_published.lock();
            if last.as_ref() == Some(&state) {
                return;
            }
            *last = Some(state.clone());
        }
        if let Some(callback) = self.state_callback.lock().as_ref() {
            callback(&state);
        }
    }

    /// Clear tokens and in-memory session, then settle in `Unauthenticated`.
    fn reset(&self, input: &SessionMachineInput) -> StorageResult<()> {
        let cleared = self.vault.clear();
        *self.session.write() = None;
        *self.last_error.lock() = None;
        self.force_unauthenticated(input);
        cleared
    }

    fn lose_session(&self, input: &SessionMachineInput) {
        if let Err(e) = self.reset(input) {
            warn!(error = %e, "Failed to clear stored tokens");
        }
    }

    /// Reload the session from persisted tokens on startup.
    ///
    /// Missing tokens settle in `Unauthenticated`. An expired or undecodable
    /// access token triggers exactly one refresh; if that fails the tokens
    /// are cleared. Only storage failures are returned as errors. Waits for
    /// any login or refresh in flight to settle first.
    pub async fn bootstrap(&self) -> AuthResult<SessionState> {
        let _gate = self.lifecycle_gate.lock().await;
        self.transition(&SessionMachineInput::Bootstrap)?;
        *self.session.write() = None;

        let pair = match self.vault.pair() {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                info!("No stored session found on startup");
                self.transition(&SessionMachineInput::NoSession)?;
                return Ok(self.state());
            }
            Err(e) => {
                self.force_unauthenticated(&SessionMachineInput::NoSession);
                return Err(e.into());
            }
        };

        match Session::from_tokens(pair.access_token, pair.refresh_token) {
            Ok(session) if !session.is_expired() => {
                info!(user = %session.subject, "Stored session is valid");
                *self.session.write() = Some(session);
                self.transition(&SessionMachineInput::TokensValid)?;
            }
            Ok(session) => {
                info!(user = %session.subject, "Stored session expired, attempting refresh");
                self.bootstrap_refresh().await?;
            }
            Err(e) => {
                info!(error = %e, "Stored access token unreadable, attempting refresh");
                self.bootstrap_refresh().await?;
            }
        }

        Ok(self.state())
    }

    /// Caller holds the lifecycle gate.
    async fn bootstrap_refresh(&self) -> AuthResult<()> {
        self.transition(&SessionMachineInput::TokenExpired)?;
        match self.refresh_locked().await {
            Ok(_) => Ok(()),
            Err(e) => {
                info!(error = %e, "Stored session could not be refreshed");
                Ok(())
            }
        }
    }

    /// Log in with username and password.
    ///
    /// Empty credentials are rejected locally without a network call. Any
    /// previous session ends as soon as the attempt starts, so a failed
    /// login never leaves the old one usable.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<Session> {
        let mut problems = Vec::new();
        if username.trim().is_empty() {
            problems.push("username is required");
        }
        if password.is_empty() {
            problems.push("password is required");
        }
        if !problems.is_empty() {
            return Err(AuthError::Validation(problems.join("\n")));
        }

        let _gate = self.lifecycle_gate.lock().await;
        *self.last_error.lock() = None;
        self.transition(&SessionMachineInput::LoginAttempt)?;
        info!(user = %username, "Logging in");

        if self.session.write().take().is_some() {
            debug!("Dropping previous session before login");
            if let Err(e) = self.vault.clear() {
                return Err(self.fail_login(e.into()));
            }
        }

        let request = ApiRequest::post(
            "auth/login",
            json!({ "username": username, "password": password }),
        );
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_login(e.into())),
        };

        if !response.is_success() {
            warn!(
                status = response.status,
                body = %summarize_body(&response.body),
                "Login rejected"
            );
            let err = if response.status == 401 {
                AuthError::InvalidCredentials
            } else {
                AuthError::LoginFailed(response.status)
            };
            return Err(self.fail_login(err));
        }

        let session = match session_from_login(&response) {
            Ok(session) => session,
            Err(e) => return Err(self.fail_login(e)),
        };

        if let Err(e) = self.vault.store_pair(&TokenPair {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        }) {
            return Err(self.fail_login(e.into()));
        }

        *self.session.write() = Some(session.clone());
        if let Err(e) = self.transition(&SessionMachineInput::LoginSuccess) {
            self.lose_session(&SessionMachineInput::SessionLost);
            return Err(e);
        }

        info!(user = %session.subject, roles = ?session.roles, "Logged in");
        Ok(session)
    }

    fn fail_login(&self, err: AuthError) -> AuthError {
        warn!(error = %err, "Login failed");
        *self.last_error.lock() = Some(err.to_string());
        if let Err(e) = self.transition(&SessionMachineInput::LoginFailed) {
            debug!(error = %e, "Login outcome arrived after the session moved on");
        }
        err
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Rejection by the backend is final: tokens are cleared and the
    /// session ends. Not retried.
    pub async fn refresh(&self) -> AuthResult<Session> {
        let _gate = self.lifecycle_gate.lock().await;
        if self.session().is_none() {
            return Err(AuthError::NotLoggedIn);
        }
        self.transition(&SessionMachineInput::TokenExpired)?;
        self.refresh_locked().await
    }

    /// Access token for an outgoing call, refreshing first if it expired.
    ///
    /// Concurrent callers that find the token expired queue on the refresh
    /// gate; whoever gets there first refreshes, the rest pick up the result.
    pub async fn valid_access_token(&self) -> AuthResult<String> {
        let seen = self.session().ok_or(AuthError::NotLoggedIn)?;
        if !seen.is_expired() {
            return Ok(seen.access_token);
        }

        let _gate = self.lifecycle_gate.lock().await;
        let current = self.session().ok_or(AuthError::SessionExpired)?;
        if current.access_token != seen.access_token || !current.is_expired() {
            debug!(user = %current.subject, "Using token refreshed by another caller");
            return Ok(current.access_token);
        }

        info!(user = %current.subject, "Access token expired, refreshing");
        self.transition(&SessionMachineInput::TokenExpired)?;
        self.refresh_locked().await.map(|session| session.access_token)
    }

    /// Single refresh attempt. Caller holds the gate and has moved the FSM
    /// to `Refreshing`.
    ///
    /// Every failure that ends the session comes back as
    /// [`AuthError::SessionExpired`]; only an interrupted refresh with a
    /// session still in hand keeps it.
    async fn refresh_locked(&self) -> AuthResult<Session> {
        let refresh_token = match self.vault.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(self.refresh_failed("no refresh token stored")),
            Err(e) => return Err(self.refresh_failed(e)),
        };

        let request = ApiRequest::post(
            "auth/refresh-token",
            json!({ "refreshToken": refresh_token }),
        );
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = AuthError::from(e);
                if self.session().is_some() {
                    warn!(error = %err, "Refresh interrupted, keeping current session");
                    self.transition(&SessionMachineInput::RefreshInterrupted)?;
                    return Err(err);
                }
                return Err(self.refresh_failed(err));
            }
        };

        if !response.is_success() {
            warn!(
                status = response.status,
                body = %summarize_body(&response.body),
                "Refresh token rejected"
            );
            return Err(self.refresh_failed(format!("HTTP {}", response.status)));
        }

        let tokens: TokenResponse = match response.parse() {
            Ok(tokens) => tokens,
            Err(e) => return Err(self.refresh_failed(AuthError::UnexpectedResponse(e.to_string()))),
        };

        let rotated = tokens.refresh_token.filter(|token| !token.is_empty());
        let session = match Session::from_tokens(
            tokens.token,
            rotated.clone().unwrap_or(refresh_token),
        ) {
            Ok(session) => session,
            Err(e) => return Err(self.refresh_failed(e)),
        };

        let stored = match rotated {
            Some(_) => self.vault.store_pair(&TokenPair {
                access_token: session.access_token.clone(),
                refresh_token: session.refresh_token.clone(),
            }),
            None => self.vault.store_access_token(&session.access_token),
        };
        if let Err(e) = stored {
            return Err(self.refresh_failed(e));
        }

        *self.session.write() = Some(session.clone());
        self.transition(&SessionMachineInput::RefreshSuccess)?;

        info!(user = %session.subject, expires_at = %session.expires_at, "Session refreshed");
        Ok(session)
    }

    fn refresh_failed(&self, cause: impl fmt::Display) -> AuthError {
        warn!(error = %cause, "Refresh failed, clearing session");
        self.lose_session(&SessionMachineInput::RefreshFailed);
        AuthError::SessionExpired
    }

    /// Drop the session after the backend answered 401.
    pub fn invalidate(&self) {
        info!("Session rejected by backend, clearing tokens");
        self.lose_session(&SessionMachineInput::SessionLost);
    }

    /// Clear both tokens and settle in `Unauthenticated`. No network call.
    ///
    /// The state changes even when clearing storage fails; that failure is
    /// still reported.
    pub fn logout(&self) -> AuthResult<()> {
        let cleared = self.reset(&SessionMachineInput::LogoutRequested);
        info!("Logged out");
        cleared.map_err(AuthError::from)
    }

    /// Create a staff account. Returns the backend's text reply.
    pub async fn register(&self, registration: &Registration) -> AuthResult<String> {
        registration.validate()?;

        let body = serde_json::to_value(registration)?;
        let response = self
            .transport
            .send(ApiRequest::post("auth/register", body))
            .await?;

        if !response.is_success() {
            warn!(
                status = response.status,
                body = %summarize_body(&response.body),
                "Registration rejected"
            );
            return Err(registration_failure(response.status));
        }

        info!(user = %registration.username, "Account registered");
        Ok(response.body)
    }

    /// Specializations offered at registration. No session required.
    pub async fn specializations(&self) -> AuthResult<Vec<Specialization>> {
        let response = self
            .transport
            .send(ApiRequest::get("specializations/all"))
            .await?;

        if !response.is_success() {
            warn!(status = response.status, "Could not load specializations");
            return Err(AuthError::UnexpectedStatus(response.status));
        }

        Ok(match response.parse::<SpecializationListing>()? {
            SpecializationListing::Bare(items) => items,
            SpecializationListing::Page { content } => content,
        })
    }
}

fn session_from_login(response: &ApiResponse) -> AuthResult<Session> {
    let tokens: TokenResponse = response
        .parse()
        .map_err(|e| AuthError::UnexpectedResponse(e.to_string()))?;
    let refresh_token = tokens
        .refresh_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::UnexpectedResponse("login response has no refreshToken".to_string()))?;
    Session::from_tokens(tokens.token, refresh_token)
}
