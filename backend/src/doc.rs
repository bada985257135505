//! OpenAPI documentation for the account API.
//!
//! [`ApiDoc`] registers every handler in `inbound::http::users` and the health
//! probes, the schema wrappers from `inbound::http::schemas`, and the
//! `BearerAuth` security scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, PageLinksSchema, PageMetaSchema, UserPageSchema, UserViewSchema,
};
use crate::inbound::http::users::{
    UpdateAccountRequest, UpdatePasswordRequest, UpdateProfileRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the bearer token scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque bearer token resolved to a user id."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the account API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Account service API",
        description = "Read and update user accounts: profile, password proof and email changes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::get_self,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::update_password,
        crate::inbound::http::users::request_email_change,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserViewSchema,
        UserPageSchema,
        PageMetaSchema,
        PageLinksSchema,
        ErrorSchema,
        ErrorCodeSchema,
        UpdateProfileRequest,
        UpdatePasswordRequest,
        UpdateAccountRequest,
    )),
    tags(
        (name = "users", description = "Account operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
