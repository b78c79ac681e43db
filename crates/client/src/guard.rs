//! Route guarding for protected views.
//!
//! [`AuthGuard::check`] decides, from the session state at call time, whether
//! a protected view is rendered or the caller is redirected. Nothing is
//! cached between checks.

use estore_core::{Identity, RoleSet};

use crate::session::SessionContext;

/// Default login entry point.
pub const LOGIN_PATH: &str = "/login";

/// Default destination for authenticated users without the required role.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Result of guarding a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// The view ran for the permitted identity.
    Render(T),
    /// The view was not run.
    Redirect {
        /// Where to go instead.
        to: String,
        /// The location originally requested, kept so login can return to it.
        from: Option<String>,
    },
}

impl<T> GuardOutcome<T> {
    /// Whether the view was rendered.
    pub const fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}

/// Gate for views that require an authenticated, permitted identity.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    session: SessionContext,
    login_path: String,
    unauthorized_path: String,
}

impl AuthGuard {
    /// Guard with the default `/login` and `/unauthorized` destinations.
    #[must_use]
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            login_path: LOGIN_PATH.to_string(),
            unauthorized_path: UNAUTHORIZED_PATH.to_string(),
        }
    }

    /// Use a different login entry point.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Use a different unauthorized entry point.
    #[must_use]
    pub fn with_unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }

    /// Render `view` if the session holds an identity whose role `required` permits.
    ///
    /// - No identity (or an expired one): redirect to login, keeping `requested`.
    /// - Identity with a role outside `required`: redirect to unauthorized.
    ///
    /// `view` is only invoked on success. An empty `required` set admits any
    /// authenticated identity.
    pub fn check<T>(
        &self,
        required: RoleSet,
        requested: &str,
        view: impl FnOnce(&Identity) -> T,
    ) -> GuardOutcome<T> {
        let Some(identity) = self.session.current() else {
            tracing::debug!(requested, "No session, redirecting to login");
            return GuardOutcome::Redirect {
                to: self.login_path.clone(),
                from: Some(requested.to_string()),
            };
        };

        if !required.permits(identity.role) {
            tracing::debug!(requested, role = %identity.role, "Role not permitted");
            return GuardOutcome::Redirect {
                to: self.unauthorized_path.clone(),
                from: None,
            };
        }

        GuardOutcome::Render(view(&identity))
    }
}

/// Where to go after a successful login: the preserved location, or `/`.
///
/// Locations that are not site-relative paths are ignored, as is any location
/// containing `\` (read as `/` by browsers).
#[must_use]
pub fn post_login_target(from: Option<&str>) -> String {
    from.filter(|path| {
        path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
    })
    .unwrap_or("/")
    .to_string()
}
