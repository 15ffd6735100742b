use std::collections::HashMap;

use axum::{
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

/// Admin caller identified by the shared secret.
///
/// Add this as a handler parameter to gate an operation on the admin check.
/// The secret is accepted from the `X-Admin-Password` header or the `password`
/// query parameter and compared by exact string equality. An empty configured
/// secret refuses everything: missing configuration fails closed, never open.
pub struct AdminUser;

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let expected = app_state.config.auth.admin_password.as_str();
        if expected.is_empty() {
            return Err(AppError::Forbidden);
        }

        let provided = match parts.headers.get("X-Admin-Password") {
            Some(value) => value.to_str().ok().map(str::to_owned),
            None => Query::<HashMap<String, String>>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|Query(mut params)| params.remove("password")),
        };

        match provided {
            Some(password) if password == expected => Ok(AdminUser),
            _ => Err(AppError::Forbidden),
        }
    }
}
