//! Access decisions for navigation.
//!
//! The rules run in a fixed order: authentication first, then role, then
//! the monitor flag. The first failing rule decides; an unauthenticated
//! visitor is always sent to login with the path they wanted, never to
//! the unauthorized page.
use crate::session::{SessionSnapshot, SessionStore};
use hms_api::Role;
use std::sync::{Arc, Mutex};

/// What a route demands of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    pub role: Option<Role>,
    pub monitor: bool,
}

impl RouteRequirement {
    /// Any signed-in user.
    pub fn authenticated() -> Self {
        Self {
            role: None,
            monitor: false,
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            monitor: false,
        }
    }

    /// A student who also holds the monitor flag.
    pub fn monitor() -> Self {
        Self {
            role: Some(Role::Student),
            monitor: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectLogin { return_to: String },
    RedirectUnauthorized,
}

/// Pure decision function; all inputs explicit.
pub fn evaluate(
    snapshot: &SessionSnapshot,
    requirement: &RouteRequirement,
    path: &str,
) -> RouteDecision {
    if !snapshot.is_authenticated() {
        return RouteDecision::RedirectLogin {
            return_to: path.to_string(),
        };
    }
    if let Some(role) = requirement.role
        && !snapshot.has_role(role)
    {
        return RouteDecision::RedirectUnauthorized;
    }
    if requirement.monitor && !snapshot.is_monitor {
        return RouteDecision::RedirectUnauthorized;
    }
    RouteDecision::Allow
}

/// Stateful wrapper that remembers the path a login redirect came from,
/// so a successful sign-in can resume where the user was headed.
pub struct RouteGuard {
    session: Arc<SessionStore>,
    pending_return: Mutex<Option<String>>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            pending_return: Mutex::new(None),
        }
    }

    pub fn check(&self, path: &str, requirement: RouteRequirement) -> RouteDecision {
        let decision = evaluate(&self.session.snapshot(), &requirement, path);
        if let RouteDecision::RedirectLogin { return_to } = &decision {
            tracing::debug!(path, "redirecting unauthenticated visitor to login");
            *self
                .pending_return
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(return_to.clone());
        }
        decision
    }

    /// Consume the stored return path, if a redirect left one behind.
    pub fn take_return_to(&self) -> Option<String> {
        self.pending_return
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;

    fn signed_in(role: Role, is_monitor: bool) -> SessionSnapshot {
        SessionSnapshot {
            user: Some(SessionUser {
                user_id: 4,
                email: "u@hostel.edu".to_string(),
                role,
            }),
            token: Some("tok".to_string()),
            is_monitor,
        }
    }

    fn anonymous() -> SessionSnapshot {
        SessionSnapshot {
            user: None,
            token: None,
            is_monitor: false,
        }
    }

    #[test]
    fn unauthenticated_goes_to_login_with_return_path() {
        let decision = evaluate(
            &anonymous(),
            &RouteRequirement::role(Role::Admin),
            "/admin/students",
        );
        assert_eq!(
            decision,
            RouteDecision::RedirectLogin {
                return_to: "/admin/students".to_string()
            }
        );
    }

    #[test]
    fn authentication_is_checked_before_role() {
        // Even a role-gated route redirects anonymous visitors to login,
        // not to the unauthorized page.
        let decision = evaluate(&anonymous(), &RouteRequirement::monitor(), "/monitor");
        assert!(matches!(decision, RouteDecision::RedirectLogin { .. }));
    }

    #[test]
    fn wrong_role_is_unauthorized() {
        let decision = evaluate(
            &signed_in(Role::Student, false),
            &RouteRequirement::role(Role::Warden),
            "/warden/absences",
        );
        assert_eq!(decision, RouteDecision::RedirectUnauthorized);
    }

    #[test]
    fn monitor_routes_need_the_flag() {
        let plain = signed_in(Role::Student, false);
        assert_eq!(
            evaluate(&plain, &RouteRequirement::monitor(), "/monitor/attendance"),
            RouteDecision::RedirectUnauthorized
        );
        let monitor = signed_in(Role::Student, true);
        assert_eq!(
            evaluate(&monitor, &RouteRequirement::monitor(), "/monitor/attendance"),
            RouteDecision::Allow
        );
    }

    #[test]
    fn matching_role_is_allowed() {
        assert_eq!(
            evaluate(
                &signed_in(Role::Admin, false),
                &RouteRequirement::role(Role::Admin),
                "/admin"
            ),
            RouteDecision::Allow
        );
        assert_eq!(
            evaluate(
                &signed_in(Role::Warden, false),
                &RouteRequirement::authenticated(),
                "/profile"
            ),
            RouteDecision::Allow
        );
    }
}
