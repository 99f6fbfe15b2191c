//! The console's route tree.

use crate::{evaluate, GateDecision};
use clinic_auth::roles::{CLINICAL, FRONT_DESK};
use clinic_auth::SessionState;
use tracing::debug;

/// Where unknown paths land.
pub const HOME_PATH: &str = "/";

/// What a route requires before it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Session,
    Roles(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub access: Access,
}

impl Route {
    pub const fn new(path: &'static str, access: Access) -> Self {
        Self { path, access }
    }

    /// Exact match, or `path` is a sub-path (`/patients/7` under `/patients`).
    fn matches(&self, path: &str) -> bool {
        if self.path == HOME_PATH {
            return path == HOME_PATH;
        }
        path == self.path
            || path
                .strip_prefix(self.path)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Result of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The route that answered; the home route for unknown paths.
    pub route: Route,
    /// True when the requested path matched no route.
    pub fallback: bool,
    pub decision: GateDecision,
}

impl Navigation {
    /// Where the user ends up.
    pub fn destination(&self) -> &'static str {
        self.decision.redirect_target().unwrap_or(self.route.path)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    home: Route,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        let home = routes
            .iter()
            .copied()
            .find(|route| route.path == HOME_PATH)
            .unwrap_or(Route::new(HOME_PATH, Access::Session));
        Self { routes, home }
    }

    /// Every screen of the clinic console and who may open it.
    pub fn console() -> Self {
        Self::new(vec![
            Route::new("/login", Access::Public),
            Route::new("/register", Access::Public),
            Route::new("/unauthorized", Access::Public),
            Route::new(HOME_PATH, Access::Session),
            Route::new("/dashboard", Access::Session),
            Route::new("/patients", Access::Roles(FRONT_DESK)),
            Route::new("/owners", Access::Roles(FRONT_DESK)),
            Route::new("/blood-types", Access::Roles(CLINICAL)),
            Route::new("/species", Access::Roles(CLINICAL)),
            Route::new("/breeds", Access::Roles(CLINICAL)),
            Route::new("/vaccines", Access::Roles(CLINICAL)),
            Route::new("/allergies", Access::Roles(CLINICAL)),
            Route::new("/medications", Access::Roles(CLINICAL)),
            Route::new("/medication-batch", Access::Roles(CLINICAL)),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the route for `path`, ignoring any query string or trailing slash.
    pub fn resolve(&self, path: &str) -> Option<Route> {
        let path = normalize(path);
        self.routes
            .iter()
            .filter(|route| route.matches(&path))
            .max_by_key(|route| route.path.len())
            .copied()
    }

    /// Gate navigation to `path` against the current session state.
    pub fn navigate(&self, path: &str, state: &SessionState) -> Navigation {
        let (route, fallback) = match self.resolve(path) {
            Some(route) => (route, false),
            None => {
                debug!(path, "Unknown route, falling back to home");
                (self.home, true)
            }
        };
        let decision = evaluate(route.access, state);
        if let Some(target) = decision.redirect_target() {
            debug!(path = route.path, target, "Navigation redirected");
        }
        Navigation {
            route,
            fallback,
            decision,
        }
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_auth::roles::{ROLE_ADMIN, ROLE_RECEPTIONIST, ROLE_VETERINARIAN};
    use clinic_auth::testing::fresh_token;
    use clinic_auth::Session;

    fn signed_in(roles: &[&str]) -> SessionState {
        let session = Session::from_tokens(fresh_token("user", roles), "r1".to_string()).unwrap();
        SessionState::Authenticated(session)
    }

    #[test]
    fn test_public_routes_need_nothing() {
        let table = RouteTable::console();
        for path in ["/login", "/register", "/unauthorized"] {
            let nav = table.navigate(path, &SessionState::Unauthenticated);
            assert_eq!(nav.decision, GateDecision::Proceed, "{}", path);
        }
    }

    #[test]
    fn test_receptionist_reaches_front_desk_only() {
        let table = RouteTable::console();
        let state = signed_in(&[ROLE_RECEPTIONIST]);

        assert_eq!(table.navigate("/owners", &state).destination(), "/owners");
        assert_eq!(table.navigate("/patients/12", &state).destination(), "/patients");
        assert_eq!(table.navigate("/species", &state).destination(), "/unauthorized");
        assert_eq!(table.navigate("/medications", &state).destination(), "/unauthorized");
    }

    #[test]
    fn test_veterinarian_reaches_clinical_screens() {
        let table = RouteTable::console();
        let state = signed_in(&[ROLE_VETERINARIAN]);

        for path in ["/blood-types", "/breeds", "/medication-batch", "/owners"] {
            assert_eq!(table.navigate(path, &state).decision, GateDecision::Proceed, "{}", path);
        }
    }

    #[test]
    fn test_protected_route_without_session_goes_to_login() {
        let table = RouteTable::console();
        let nav = table.navigate("/dashboard", &SessionState::Unauthenticated);
        assert_eq!(nav.destination(), "/login");

        let nav = table.navigate("/owners", &SessionState::Loading);
        assert_eq!(nav.decision, GateDecision::Pending);
        assert_eq!(nav.destination(), "/owners");
    }

    #[test]
    fn test_unknown_paths_fall_back_to_home() {
        let table = RouteTable::console();
        let nav = table.navigate("/nowhere", &signed_in(&[ROLE_ADMIN]));
        assert!(nav.fallback);
        assert_eq!(nav.destination(), "/");

        let nav = table.navigate("/nowhere", &SessionState::Unauthenticated);
        assert_eq!(nav.destination(), "/login");
    }

    #[test]
    fn test_resolve_normalizes_paths() {
        let table = RouteTable::console();
        assert_eq!(table.resolve("/owners/").map(|r| r.path), Some("/owners"));
        assert_eq!(table.resolve("owners?page=2").map(|r| r.path), Some("/owners"));
        assert_eq!(table.resolve("/").map(|r| r.path), Some("/"));
        assert_eq!(table.resolve("/ownersx"), None);
    }
}
