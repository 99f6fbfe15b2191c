//! Navigation gates for the console.
//!
//! A protected view passes the session gate first, then (if it names
//! allowed roles) the role gate. [`RouteTable`] maps console paths to the
//! gates they need.

mod gate;
mod routes;

pub use gate::{evaluate, role_gate, session_gate, GateDecision, LOGIN_PATH, UNAUTHORIZED_PATH};
pub use routes::{Access, Navigation, Route, RouteTable, HOME_PATH};
