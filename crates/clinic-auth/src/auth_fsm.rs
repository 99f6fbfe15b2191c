//! Session state machine using rust-fsm.
//!
//! Tracks the transient phases (loading, logging in, refreshing) that the
//! public [`crate::SessionState`] folds away.
//!
//! ## State Diagram
//!
//! ```text
//!                       Bootstrap
//! ┌─────────────────┐ ───────────► ┌─────────────────┐  NoSession
//! │ Unauthenticated │              │     Loading     │ ──────────► Unauthenticated
//! └────────┬────────┘              └───┬─────────┬───┘
//!          │ LoginAttempt  TokensValid │         │ TokenExpired
//!          ▼                           ▼         ▼
//! ┌─────────────────┐  LoginSuccess ┌─────────────────┐ TokenExpired ┌─────────────────┐
//! │    LoggingIn    │ ────────────► │  Authenticated  │ ───────────► │   Refreshing    │
//! └────────┬────────┘               └─────────────────┘ ◄─────────── └────────┬────────┘
//!          │ LoginFailed                     RefreshSuccess/Interrupted        │ RefreshFailed
//!          ▼                                                                   ▼
//!      Failed ── LoginAttempt ──► LoggingIn                            Unauthenticated
//!
//! Every state: LogoutRequested / SessionLost ──► Unauthenticated
//! ```

use rust_fsm::*;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Unauthenticated)

    Unauthenticated => {
        Bootstrap => Loading,
        LoginAttempt => LoggingIn,
        LogoutRequested => Unauthenticated,
        SessionLost => Unauthenticated
    },
    Loading => {
        TokensValid => Authenticated,
        // Expired or undecodable access token
        TokenExpired => Refreshing,
        NoSession => Unauthenticated,
        LogoutRequested => Unauthenticated,
        SessionLost => Unauthenticated
    },
    LoggingIn => {
        LoginSuccess => Authenticated,
        LoginFailed => Failed,
        LogoutRequested => Unauthenticated,
        SessionLost => Unauthenticated
    },
    Failed => {
        Bootstrap => Loading,
        LoginAttempt => LoggingIn,
        LogoutRequested => Unauthenticated,
        SessionLost => Unauthenticated
    },
    Authenticated => {
        Bootstrap => Loading,
        LoginAttempt => LoggingIn,
        TokenExpired => Refreshing,
        LogoutRequested => Unauthenticated,
        SessionLost => Unauthenticated
    },
    Refreshing => {
        RefreshSuccess => Authenticated,
        // Network failure with a usable session still in hand
        RefreshInterrupted => Authenticated,
        RefreshFailed => Unauthenticated,
        LogoutRequested => Unauthenticated,
        SessionLost => Unauthenticated
    }
}

pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Phase names for logs and status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    Loading,
    LoggingIn,
    Failed,
    Authenticated,
    Refreshing,
}

impl SessionPhase {
    /// Returns true while an operation is in progress.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SessionPhase::Loading | SessionPhase::LoggingIn | SessionPhase::Refreshing
        )
    }
}

impl From<&SessionMachineState> for SessionPhase {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Unauthenticated => SessionPhase::Unauthenticated,
            SessionMachineState::Loading => SessionPhase::Loading,
            SessionMachineState::LoggingIn => SessionPhase::LoggingIn,
            SessionMachineState::Failed => SessionPhase::Failed,
            SessionMachineState::Authenticated => SessionPhase::Authenticated,
            SessionMachineState::Refreshing => SessionPhase::Refreshing,
        }
    }
}
