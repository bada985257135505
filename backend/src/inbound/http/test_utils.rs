//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{MockAccountCommand, MockAccountQuery, MockAuthenticator};
use crate::domain::{EmailAddress, UserId, UserName, UserView};
use crate::inbound::http::routes::{API_PREFIX, configure};
use crate::inbound::http::state::HttpState;

/// Identifier resolved for the token `alice-token`.
pub const ALICE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
/// Identifier of a second account.
pub const BOB_ID: &str = "0b7d2a4e-97c5-4d2f-9c3e-5e1f0d6a8b21";
/// Bearer header accepted by [`alice_authenticator`].
pub const ALICE_AUTH: &str = "Bearer alice-token";

pub fn alice() -> UserId {
    UserId::new(ALICE_ID).expect("fixture id")
}

pub fn bob() -> UserId {
    UserId::new(BOB_ID).expect("fixture id")
}

/// Public view fixture for `id`.
pub fn view_of(id: UserId, name: &str, email: &str) -> UserView {
    UserView {
        id,
        name: UserName::new(name).expect("fixture name"),
        avatar: None,
        email: EmailAddress::new(email).expect("fixture email"),
        email_update: None,
    }
}

/// Authenticator resolving `alice-token` to [`ALICE_ID`] and nothing else.
pub fn alice_authenticator() -> MockAuthenticator {
    let mut authenticator = MockAuthenticator::new();
    authenticator.expect_authenticate().returning(|token| {
        Ok((token.expose() == "alice-token").then(alice))
    });
    authenticator
}

pub fn http_state(
    authenticator: MockAuthenticator,
    query: MockAccountQuery,
    command: MockAccountCommand,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(authenticator),
        Arc::new(query),
        Arc::new(command),
    ))
}

/// App serving the account routes with the trace middleware.
pub fn account_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope(API_PREFIX).configure(configure))
}
