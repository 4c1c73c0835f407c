// ── Route table and navigation guard ──
//
// Every screen of the application is a `Route`. Routes render to and
// parse from URL-style paths; the guard decides whether a route may be
// entered given the current session.

use std::fmt;

use strum::{EnumDiscriminants, IntoStaticStr};

/// A navigable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumDiscriminants)]
#[strum_discriminants(name(RouteName), derive(IntoStaticStr, Hash))]
pub enum Route {
    Home,
    EventDetail { id: i64 },
    EventCreate,
    SessionCreate,
    SessionUpdate { id: i64 },
    SessionAssistants,
    Login,
    Register,
    Profile,
}

impl Route {
    /// Whether entering this route needs a signed-in user.
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::EventCreate | Self::SessionCreate | Self::Profile)
    }

    /// Stable screen name (`"EventDetail"`, `"Login"`, ...).
    pub fn name(self) -> &'static str {
        RouteName::from(self).into()
    }

    pub fn path(self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::EventDetail { id } => format!("/event/{id}"),
            Self::EventCreate => "/event/create".into(),
            Self::SessionCreate => "/session/create".into(),
            Self::SessionUpdate { id } => format!("/session/update/{id}"),
            Self::SessionAssistants => "/session/assistants".into(),
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Profile => "/profile".into(),
        }
    }

    /// Parse a path produced by [`path`](Self::path). Trailing slashes and
    /// query strings are ignored; unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Home,
            ["event", "create"] => Self::EventCreate,
            ["event", id] => Self::EventDetail { id: id.parse().ok()? },
            ["session", "create"] => Self::SessionCreate,
            ["session", "assistants"] => Self::SessionAssistants,
            ["session", "update", id] => Self::SessionUpdate { id: id.parse().ok()? },
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["profile"] => Self::Profile,
            _ => return None,
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of consulting the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Allow iff the route is public or a session is present; otherwise send
/// the user to the login screen.
pub fn guard(target: Route, authenticated: bool) -> GuardDecision {
    if !target.requires_auth() || authenticated {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}
