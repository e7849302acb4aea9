use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use kernel::model::{actor::Actor, auth::AccessToken, id::UserId, user::User};
use registry::AppRegistry;
use shared::error::AppError;

/// A caller whose bearer token resolved to a user.
pub struct AuthorizedUser {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn actor(&self) -> Actor {
        Actor::registered(self.user.role, self.user.id)
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthenticated)?;
        let access_token = AccessToken(bearer.token().to_string());

        let user_id = registry
            .auth_repository()
            .fetch_user_id_from_token(&access_token)
            .await?
            .ok_or(AppError::Unauthenticated)?;
        let user = registry
            .user_repository()
            .find_current_user(user_id)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        Ok(Self { access_token, user })
    }
}

/// Public endpoints that behave differently for authenticated
/// callers. No `Authorization` header means anonymous; a header that
/// does not resolve is rejected rather than downgraded.
pub struct MaybeAuthorizedUser(pub Option<AuthorizedUser>);

impl MaybeAuthorizedUser {
    /// The caller as an `Actor`, anonymous callers optionally
    /// identifying themselves with a visitor email.
    pub fn actor(&self, visitor_email: Option<String>) -> Actor {
        match &self.0 {
            Some(user) => user.actor(),
            None => Actor::anonymous(visitor_email),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for MaybeAuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get(AUTHORIZATION).is_none() {
            return Ok(Self(None));
        }
        AuthorizedUser::from_request_parts(parts, registry)
            .await
            .map(|user| Self(Some(user)))
    }
}
