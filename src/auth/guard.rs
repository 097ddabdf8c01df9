//! Request pipeline stages
//!
//! Every request passes through [`Authenticator::authenticate`] and then
//! [`authorize`] before reaching a handler. Routes declare what they need
//! through a [`RouteAccess`] value.

use std::sync::Arc;

use crate::auth::token::{extract_bearer_token, now_unix, TokenCodec};
use crate::auth::user::{Identity, Role};
use crate::error::{AuthError, Result};

/// Access metadata declared by a route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAccess {
    /// Reachable without a token
    pub is_public: bool,
    /// Empty means any authenticated caller
    pub required_roles: Vec<Role>,
}

impl RouteAccess {
    pub fn public() -> Self {
        Self {
            is_public: true,
            required_roles: Vec::new(),
        }
    }

    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self {
            is_public: false,
            required_roles: roles.to_vec(),
        }
    }
}

/// Typed output of the pipeline, handed to the route handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Identity for handlers that cannot run anonymously
    pub fn require_identity(&self) -> Result<&Identity> {
        self.identity.as_ref().ok_or(AuthError::Unauthorized)
    }
}

/// First pipeline stage: turns an `Authorization` header into an identity
#[derive(Clone)]
pub struct Authenticator {
    codec: Arc<TokenCodec>,
}

impl Authenticator {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        access: &RouteAccess,
    ) -> Result<RequestContext> {
        self.authenticate_at(authorization, access, now_unix())
    }

    /// Same as [`Authenticator::authenticate`] with an explicit clock reading
    pub fn authenticate_at(
        &self,
        authorization: Option<&str>,
        access: &RouteAccess,
        now: i64,
    ) -> Result<RequestContext> {
        let token = authorization.and_then(extract_bearer_token);

        let token = match token {
            Some(token) => token,
            None if access.is_public => return Ok(RequestContext::anonymous()),
            None => return Err(AuthError::Unauthorized),
        };

        match self.codec.verify_at(token, now) {
            Ok(claims) => Ok(RequestContext {
                identity: Some(claims.into_identity()),
            }),
            Err(e) if access.is_public => {
                log::debug!("Ignoring bad token on public route: {}", e);
                Ok(RequestContext::anonymous())
            }
            Err(e) => {
                log::debug!("Rejecting bad token: {}", e);
                Err(AuthError::Unauthorized)
            }
        }
    }
}

/// Second pipeline stage: role check against the route's declared roles
pub fn authorize(access: &RouteAccess, context: &RequestContext) -> Result<()> {
    if access.required_roles.is_empty() {
        return Ok(());
    }

    match context.identity() {
        Some(identity) if identity.has_any_role(&access.required_roles) => Ok(()),
        _ => Err(AuthError::Forbidden(access.required_roles.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Claims;

    const SECRET: &str = "guard-test-signing-key-0123456789abcdef";
    const NOW: i64 = 1_700_000_000;

    fn setup() -> (Arc<TokenCodec>, Authenticator) {
        let codec = Arc::new(TokenCodec::new(SECRET));
        (codec.clone(), Authenticator::new(codec))
    }

    fn bearer(codec: &TokenCodec, role: Role, ttl: i64) -> String {
        let token = codec
            .sign_at(&Claims::new(3, "r@newsroom.test", role), ttl, NOW)
            .unwrap();
        format!("Bearer {}", token)
    }

    fn context_for(role: Role) -> RequestContext {
        RequestContext {
            identity: Some(Identity {
                subject_id: 1,
                email: "x@newsroom.test".into(),
                role,
                expires_at: NOW + 60,
            }),
        }
    }

    #[test]
    fn protected_route_with_valid_token_gets_identity() {
        let (codec, auth) = setup();
        let header = bearer(&codec, Role::Reporter, 60);
        let ctx = auth
            .authenticate_at(Some(&header), &RouteAccess::authenticated(), NOW)
            .unwrap();

        let identity = ctx.identity().unwrap();
        assert_eq!(identity.subject_id, 3);
        assert_eq!(identity.role, Role::Reporter);
    }

    #[test]
    fn protected_route_without_token_is_unauthorized() {
        let (_, auth) = setup();
        let access = RouteAccess::authenticated();

        assert_eq!(auth.authenticate_at(None, &access, NOW), Err(AuthError::Unauthorized));
        assert_eq!(
            auth.authenticate_at(Some("Basic abc"), &access, NOW),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn protected_route_collapses_token_failures() {
        let (codec, auth) = setup();
        let access = RouteAccess::authenticated();
        let expired = bearer(&codec, Role::Admin, 10);

        assert_eq!(
            auth.authenticate_at(Some(&expired), &access, NOW + 10),
            Err(AuthError::Unauthorized)
        );
        assert_eq!(
            auth.authenticate_at(Some("Bearer not-a-token"), &access, NOW),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn public_route_proceeds_anonymously() {
        let (codec, auth) = setup();
        let access = RouteAccess::public();
        let expired = bearer(&codec, Role::Admin, 10);

        assert_eq!(auth.authenticate_at(None, &access, NOW), Ok(RequestContext::anonymous()));
        assert_eq!(
            auth.authenticate_at(Some(&expired), &access, NOW + 10),
            Ok(RequestContext::anonymous())
        );
    }

    #[test]
    fn public_route_is_personalised_by_valid_token() {
        let (codec, auth) = setup();
        let header = bearer(&codec, Role::Editor, 60);
        let ctx = auth
            .authenticate_at(Some(&header), &RouteAccess::public(), NOW)
            .unwrap();
        assert_eq!(ctx.identity().map(|i| i.role), Some(Role::Editor));
    }

    #[test]
    fn role_gate() {
        let access = RouteAccess::roles(&[Role::Admin, Role::Editor]);

        assert_eq!(
            authorize(&access, &context_for(Role::Reporter)),
            Err(AuthError::Forbidden(vec![Role::Admin, Role::Editor]))
        );
        assert_eq!(authorize(&access, &context_for(Role::Editor)), Ok(()));
    }

    #[test]
    fn empty_role_set_allows_any_caller() {
        let access = RouteAccess::authenticated();
        assert_eq!(authorize(&access, &context_for(Role::Contributor)), Ok(()));
        assert_eq!(authorize(&access, &RequestContext::anonymous()), Ok(()));
    }

    #[test]
    fn role_restricted_route_without_identity_is_forbidden() {
        let access = RouteAccess {
            is_public: true,
            required_roles: vec![Role::Admin],
        };
        assert_eq!(
            authorize(&access, &RequestContext::anonymous()),
            Err(AuthError::Forbidden(vec![Role::Admin]))
        );
    }
}
