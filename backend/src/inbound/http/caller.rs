//! Authenticated caller extraction.
//!
//! Handlers for protected operations take a [`Caller`] argument. Extraction
//! reads the `Authorization: Bearer <token>` header and resolves it through
//! the [`Authenticator`](crate::domain::ports::Authenticator) port held in
//! [`HttpState`]. Extractors run before the handler body, so an
//! unauthenticated request never reaches the account service.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::ports::AuthenticatorError;
use crate::domain::{BearerToken, Error, UserId};
use crate::inbound::http::state::HttpState;

/// Message returned when credentials are missing or not recognised.
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(UserId);

impl Caller {
    /// Identifier of the authenticated user.
    pub fn id(&self) -> &UserId {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<BearerToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(UNAUTHENTICATED_MESSAGE))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized(UNAUTHENTICATED_MESSAGE))?;
    BearerToken::from_header_value(value).map_err(|err| {
        debug!(error = %err, "rejected authorization header");
        Error::unauthorized(UNAUTHENTICATED_MESSAGE)
    })
}

fn map_authenticator_error(err: AuthenticatorError) -> Error {
    warn!(error = %err, "authenticator failed");
    match err {
        AuthenticatorError::Unavailable { .. } => {
            Error::service_unavailable("authentication is temporarily unavailable")
        }
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let token = token?;
            match state
                .authenticator
                .authenticate(&token)
                .await
                .map_err(map_authenticator_error)?
            {
                Some(id) => Ok(Caller(id)),
                None => {
                    debug!("bearer token not recognised");
                    Err(Error::unauthorized(UNAUTHENTICATED_MESSAGE))
                }
            }
        })
    }
}
