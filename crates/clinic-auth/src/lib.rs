//! Client-side session lifecycle for the VetClinic console.
//!
//! [`SessionManager`] owns the current [`Session`]: it reloads persisted
//! tokens at startup, logs in, refreshes expired access tokens (one refresh
//! at a time), and answers role checks.

pub mod auth_fsm;
mod claims;
mod error;
mod registration;
pub mod roles;
mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use auth_fsm::{SessionMachine, SessionMachineInput, SessionMachineState, SessionPhase};
pub use claims::Claims;
pub use error::{AuthError, AuthResult};
pub use registration::{Registration, Specialization};
pub use session::{Session, SessionManager, SessionState, SessionStateCallback};
