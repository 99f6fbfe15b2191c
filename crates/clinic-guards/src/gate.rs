use crate::Access;
use clinic_auth::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Outcome of gating a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    /// Session is still settling; show a pending indicator.
    Pending,
    RedirectToLogin,
    RedirectToUnauthorized,
}

impl GateDecision {
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GateDecision::RedirectToLogin => Some(LOGIN_PATH),
            GateDecision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
            GateDecision::Proceed | GateDecision::Pending => None,
        }
    }
}

/// Let through any authenticated session.
///
/// A failed login counts as unauthenticated.
pub fn session_gate(state: &SessionState) -> GateDecision {
    match state {
        SessionState::Loading => GateDecision::Pending,
        SessionState::Authenticated(_) => GateDecision::Proceed,
        SessionState::Unauthenticated | SessionState::Error(_) => GateDecision::RedirectToLogin,
    }
}

/// Let through sessions holding at least one of `allowed`.
///
/// Only meaningful once [`session_gate`] has passed.
pub fn role_gate(state: &SessionState, allowed: &[&str]) -> GateDecision {
    match state.session() {
        Some(session) if session.has_role(allowed) => GateDecision::Proceed,
        _ => GateDecision::RedirectToUnauthorized,
    }
}

/// Run the gates `access` calls for, in order.
pub fn evaluate(access: Access, state: &SessionState) -> GateDecision {
    match access {
        Access::Public => GateDecision::Proceed,
        Access::Session => session_gate(state),
        Access::Roles(allowed) => match session_gate(state) {
            GateDecision::Proceed => role_gate(state, allowed),
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_auth::roles::{CLINICAL, FRONT_DESK, ROLE_ADMIN, ROLE_RECEPTIONIST};
    use clinic_auth::testing::fresh_token;
    use clinic_auth::Session;

    fn signed_in(roles: &[&str]) -> SessionState {
        let session = Session::from_tokens(fresh_token("user", roles), "r1".to_string()).unwrap();
        SessionState::Authenticated(session)
    }

    #[test]
    fn test_session_gate() {
        assert_eq!(session_gate(&SessionState::Loading), GateDecision::Pending);
        assert_eq!(
            session_gate(&SessionState::Unauthenticated),
            GateDecision::RedirectToLogin
        );
        assert_eq!(
            session_gate(&SessionState::Error("Invalid credentials".into())),
            GateDecision::RedirectToLogin
        );
        assert_eq!(session_gate(&signed_in(&[])), GateDecision::Proceed);
    }

    #[test]
    fn test_role_gate() {
        let receptionist = signed_in(&[ROLE_RECEPTIONIST]);
        assert_eq!(role_gate(&receptionist, &[ROLE_ADMIN]), GateDecision::RedirectToUnauthorized);
        assert_eq!(role_gate(&receptionist, FRONT_DESK), GateDecision::Proceed);

        let admin = signed_in(&[ROLE_RECEPTIONIST, ROLE_ADMIN]);
        assert_eq!(role_gate(&admin, &[ROLE_ADMIN]), GateDecision::Proceed);
    }

    #[test]
    fn test_role_gate_waits_for_session_gate() {
        assert_eq!(
            evaluate(Access::Roles(CLINICAL), &SessionState::Loading),
            GateDecision::Pending
        );
        assert_eq!(
            evaluate(Access::Roles(CLINICAL), &SessionState::Unauthenticated),
            GateDecision::RedirectToLogin
        );
        assert_eq!(
            evaluate(Access::Roles(CLINICAL), &signed_in(&[ROLE_RECEPTIONIST])),
            GateDecision::RedirectToUnauthorized
        );
        assert_eq!(evaluate(Access::Public, &SessionState::Loading), GateDecision::Proceed);
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(GateDecision::RedirectToLogin.redirect_target(), Some("/login"));
        assert_eq!(
            GateDecision::RedirectToUnauthorized.redirect_target(),
            Some("/unauthorized")
        );
        assert_eq!(GateDecision::Pending.redirect_target(), None);
    }
}
