//! Bearer credential check
//!
//! A request is authenticated when its `authorization` header carries a
//! valid token with a `userId` claim and that user has a live session.

use std::sync::Arc;

use trellis_domain::error::{Error, Result};
use trellis_domain::value_objects::InboundRequest;
use trellis_infrastructure::constants::{AUTHORIZATION_HEADER, BEARER_PREFIX};
use trellis_infrastructure::crypto::JwtService;
use trellis_infrastructure::session::SessionService;

/// Resolves the user behind a request
#[derive(Debug, Clone)]
pub struct Authenticator {
    jwt: Arc<JwtService>,
    sessions: Arc<SessionService>,
}

impl Authenticator {
    /// Authenticator verifying tokens with `jwt` against `sessions`
    pub fn new(jwt: Arc<JwtService>, sessions: Arc<SessionService>) -> Self {
        Self { jwt, sessions }
    }

    /// User id of the caller
    ///
    /// Every failure is an [`Error::Authorization`]; a well-formed token
    /// without a session fails with `Please login first.`
    pub async fn authenticate(&self, request: &InboundRequest) -> Result<String> {
        let header = request.header(AUTHORIZATION_HEADER).ok_or_else(|| {
            Error::authorization(format!("The header `{AUTHORIZATION_HEADER}` is not found."))
        })?;
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::authorization("Token is not found."))?;

        let claims = self.jwt.verify(token)?;
        let user_id = claims
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::authorization("Cannot parse `userId` from payload."))?;

        if !self.sessions.is_open(&user_id).await? {
            return Err(Error::authorization("Please login first."));
        }
        Ok(user_id)
    }
}
