//! Access gates deciding whether a page renders or redirects.
//!
//! This is a navigation policy, not a security boundary: the role comes from
//! an unverified token and the server enforces every permission again.

use super::routes::{Access, Page, LOGIN_PATH};
use crate::models::user::{IdentityClaim, Role};
use crate::session::{Session, SessionContext};

/// Outcome of a single gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Pass,
    Redirect(String),
}

/// Outcome of routing a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Page),
    Redirect(String),
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render(_))
    }
}

/// Session absent: redirect to login
pub fn authenticated_gate(session: Option<&Session>) -> Gate {
    match session {
        Some(_) => Gate::Pass,
        None => Gate::Redirect(LOGIN_PATH.to_string()),
    }
}

/// Anyone but a member is sent to the admin landing
pub fn member_gate(claim: &IdentityClaim) -> Gate {
    match claim.role {
        Role::Member => Gate::Pass,
        Role::Admin => Gate::Redirect(Role::Admin.landing_path().to_string()),
    }
}

/// Anyone but an admin is sent to the member landing
pub fn admin_gate(claim: &IdentityClaim) -> Gate {
    match claim.role {
        Role::Admin => Gate::Pass,
        Role::Member => Gate::Redirect(Role::Member.landing_path().to_string()),
    }
}

/// Route a path given the current session and its decoded claim.
///
/// The claim must come from decoding `session`; a session without a claim
/// is handled as no session at all.
pub fn decide(path: &str, session: Option<&Session>, claim: Option<&IdentityClaim>) -> GuardDecision {
    let session = session.filter(|_| claim.is_some());
    let claim = claim.filter(|_| session.is_some());

    let Some(page) = Page::from_path(path) else {
        // Catch-all, evaluated after every known route
        return match claim {
            Some(claim) => GuardDecision::Redirect(claim.role.landing_path().to_string()),
            None => GuardDecision::Redirect(LOGIN_PATH.to_string()),
        };
    };

    match page.access() {
        Access::Public => match (&page, claim) {
            // A logged-in user opening the login page goes to their landing
            (Page::Login, Some(claim)) => GuardDecision::Redirect(claim.role.landing_path().to_string()),
            _ => GuardDecision::Render(page),
        },
        access => {
            if let Gate::Redirect(to) = authenticated_gate(session) {
                return GuardDecision::Redirect(to);
            }
            let Some(claim) = claim else {
                return GuardDecision::Redirect(LOGIN_PATH.to_string());
            };
            let gate = match access {
                Access::Member => member_gate(claim),
                _ => admin_gate(claim),
            };
            match gate {
                Gate::Pass => GuardDecision::Render(page),
                Gate::Redirect(to) => GuardDecision::Redirect(to),
            }
        }
    }
}

/// Route guard bound to an explicit session context
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionContext,
}

impl RouteGuard {
    pub fn new(session: SessionContext) -> Self {
        Self { session }
    }

    /// Resolve the session (clearing it when undecodable) and route `path`
    pub fn check(&self, path: &str) -> GuardDecision {
        let claim = self.session.identity();
        let session = self.session.session();
        let decision = decide(path, session.as_ref(), claim.as_ref());
        tracing::debug!(path, ?decision, "Route guard decision");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_tokens::token_for_role;
    use crate::session::MemorySessionStore;
    use std::sync::Arc;

    fn claim(role: Role) -> IdentityClaim {
        IdentityClaim {
            role,
            id: None,
            email: None,
            exp: None,
        }
    }

    fn decide_as(role: Option<Role>, path: &str) -> GuardDecision {
        let session = role.map(|_| Session::new("token"));
        let claim = role.map(claim);
        decide(path, session.as_ref(), claim.as_ref())
    }

    fn redirect(to: &str) -> GuardDecision {
        GuardDecision::Redirect(to.to_string())
    }

    #[test]
    fn test_gates() {
        assert_eq!(authenticated_gate(None), Gate::Redirect("/".into()));
        assert_eq!(authenticated_gate(Some(&Session::new("t"))), Gate::Pass);
        assert_eq!(admin_gate(&claim(Role::Admin)), Gate::Pass);
        assert_eq!(admin_gate(&claim(Role::Member)), Gate::Redirect("/home".into()));
        assert_eq!(member_gate(&claim(Role::Member)), Gate::Pass);
        assert_eq!(member_gate(&claim(Role::Admin)), Gate::Redirect("/admin".into()));
    }

    #[test]
    fn test_unauthenticated_protected_paths_go_to_login() {
        for path in ["/home", "/books/1", "/admin", "/admin/users", "/admin/rentals"] {
            assert_eq!(decide_as(None, path), redirect("/"), "path {}", path);
        }
    }

    #[test]
    fn test_cross_role_redirects_to_own_landing() {
        assert_eq!(decide_as(Some(Role::Member), "/admin/users"), redirect("/home"));
        assert_eq!(decide_as(Some(Role::Admin), "/home"), redirect("/admin"));
        assert_eq!(decide_as(Some(Role::Admin), "/books/7"), redirect("/admin"));
    }

    #[test]
    fn test_matching_role_renders() {
        assert_eq!(decide_as(Some(Role::Admin), "/admin/books/add"), GuardDecision::Render(Page::BookCreate));
        assert_eq!(
            decide_as(Some(Role::Member), "/books/7"),
            GuardDecision::Render(Page::BookDetail { id: "7".into() })
        );
    }

    #[test]
    fn test_login_page() {
        assert_eq!(decide_as(None, "/"), GuardDecision::Render(Page::Login));
        assert_eq!(decide_as(Some(Role::Admin), "/"), redirect("/admin"));
        assert_eq!(decide_as(Some(Role::Member), "/"), redirect("/home"));
        assert_eq!(decide_as(None, "/register"), GuardDecision::Render(Page::Register));
    }

    #[test]
    fn test_catch_all() {
        assert_eq!(decide_as(None, "/does/not/exist"), redirect("/"));
        assert_eq!(decide_as(Some(Role::Member), "/does/not/exist"), redirect("/home"));
        assert_eq!(decide_as(Some(Role::Admin), "/admin/nope"), redirect("/admin"));
    }

    #[test]
    fn test_session_without_claim_is_unauthenticated() {
        let session = Session::new("token");
        assert_eq!(decide("/admin", Some(&session), None), redirect("/"));
    }

    #[test]
    fn test_guard_clears_poisoned_session() {
        let store = Arc::new(MemorySessionStore::with_token("poisoned"));
        let guard = RouteGuard::new(SessionContext::new(store.clone()));

        assert_eq!(guard.check("/admin"), redirect("/"));
        assert!(crate::session::SessionStore::get(store.as_ref()).is_none());
    }

    #[test]
    fn test_guard_with_real_token() {
        let store = Arc::new(MemorySessionStore::with_token(&token_for_role("admin")));
        let guard = RouteGuard::new(SessionContext::new(store));

        assert_eq!(guard.check("/admin/rentals"), GuardDecision::Render(Page::Rentals));
        assert_eq!(guard.check("/home"), redirect("/admin"));
    }
}
