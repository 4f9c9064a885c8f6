use std::sync::Arc;

use campus_core::model::Role;

use crate::api::{Backend, Registration};
use crate::error::AuthError;
use crate::session_service::SessionService;

/// Sign-in, sign-up and sign-out flows.
///
/// The only writer of session state besides the 401 policy; both funnel
/// through [`SessionService`], so the token and user record can never be
/// persisted separately.
pub struct AuthService {
    backend: Arc<dyn Backend>,
    session: Arc<SessionService>,
}

impl AuthService {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, session: Arc<SessionService>) -> Self {
        Self { backend, session }
    }

    /// Exchange credentials for a session. Returns the signed-in role so the
    /// caller can route to the matching landing page.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a rejected login, other
    /// variants for transport or persistence failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<Role, AuthError> {
        let payload = self.backend.login(email, password).await?;
        let role = payload.user.role();
        self.session.set(payload.token, payload.user).await?;
        log::debug!("signed in as {role}");
        Ok(role)
    }

    /// Create an account and sign in with it in one step.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for backend or persistence failures.
    pub async fn register(&self, registration: Registration) -> Result<Role, AuthError> {
        let payload = self.backend.register(&registration).await?;
        let role = payload.user.role();
        self.session.set(payload.token, payload.user).await?;
        Ok(role)
    }

    /// Drop the session. Client-side only; the consumed API surface has no
    /// logout endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the persisted session cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.session.clear().await?;
        log::debug!("signed out");
        Ok(())
    }
}
