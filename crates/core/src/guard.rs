use crate::model::{Role, Session};

/// Decision for rendering a protected view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteGuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToUnauthorized,
}

/// Decide whether the current session may render a route.
///
/// Pure: the caller performs the actual navigation. `session` must be a
/// fresh read from the session funnel; decisions are never cached across
/// navigations. A session that failed to load (missing token, missing or
/// unreadable user record) arrives here as `None` and redirects to login.
#[must_use]
pub fn evaluate(session: Option<&Session>, required_role: Option<Role>) -> RouteGuardDecision {
    let Some(session) = session else {
        return RouteGuardDecision::RedirectToLogin;
    };

    match required_role {
        Some(required) if session.role() != required => {
            RouteGuardDecision::RedirectToUnauthorized
        }
        _ => RouteGuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{User, UserId};

    fn session(role: Role) -> Session {
        let user = User::new(UserId::new(1), "Ada", "ada@example.org", role);
        Session::new("tok", user).unwrap()
    }

    #[test]
    fn missing_session_redirects_to_login() {
        assert_eq!(evaluate(None, None), RouteGuardDecision::RedirectToLogin);
        assert_eq!(
            evaluate(None, Some(Role::Admin)),
            RouteGuardDecision::RedirectToLogin
        );
    }

    #[test]
    fn role_mismatch_redirects_to_unauthorized() {
        let student = session(Role::Student);
        assert_eq!(
            evaluate(Some(&student), Some(Role::Admin)),
            RouteGuardDecision::RedirectToUnauthorized
        );
        let admin = session(Role::Admin);
        assert_eq!(
            evaluate(Some(&admin), Some(Role::Student)),
            RouteGuardDecision::RedirectToUnauthorized
        );
    }

    #[test]
    fn matching_role_is_allowed() {
        let admin = session(Role::Admin);
        assert_eq!(
            evaluate(Some(&admin), Some(Role::Admin)),
            RouteGuardDecision::Allow
        );
    }

    #[test]
    fn routes_without_a_required_role_only_need_a_session() {
        let student = session(Role::Student);
        assert_eq!(evaluate(Some(&student), None), RouteGuardDecision::Allow);
    }
}
