//! Route table for the account API.
//!
//! Every operation is declared once in [`ROUTES`] and registered by
//! [`configure`] under the `/api/v1` scope. Routes sharing a path are folded
//! into one resource so an unsupported method yields `405`.

use actix_web::{Route, web};

use crate::inbound::http::users;
use crate::inbound::http::validation::{json_config, path_config, query_config};

/// Prefix under which the account API is mounted.
pub const API_PREFIX: &str = "/api/v1";

/// HTTP methods used by the account API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    fn route(self) -> Route {
        match self {
            Self::Get => web::get(),
            Self::Put => web::put(),
            Self::Patch => web::patch(),
        }
    }

    /// Method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
        }
    }
}

/// Whether an operation needs a bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Served to anyone; credentials are ignored.
    Public,
    /// Requires an authenticated caller.
    Authenticated,
}

/// One operation in the route table.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    /// OpenAPI operation id.
    pub operation: &'static str,
    /// Path relative to [`API_PREFIX`].
    pub path: &'static str,
    /// Methods accepted for this operation.
    pub methods: &'static [HttpMethod],
    /// Credential requirement.
    pub access: Access,
    attach: fn(Route) -> Route,
}

/// All account operations.
pub static ROUTES: &[RouteSpec] = &[
    RouteSpec {
        operation: "getSelf",
        path: "/me",
        methods: &[HttpMethod::Get],
        access: Access::Authenticated,
        attach: |route| route.to(users::get_self),
    },
    RouteSpec {
        operation: "listUsers",
        path: "/users",
        methods: &[HttpMethod::Get],
        access: Access::Public,
        attach: |route| route.to(users::list_users),
    },
    RouteSpec {
        operation: "getUser",
        path: "/users/{id}",
        methods: &[HttpMethod::Get],
        access: Access::Public,
        attach: |route| route.to(users::get_user),
    },
    RouteSpec {
        operation: "updateProfile",
        path: "/users/{id}",
        methods: &[HttpMethod::Put, HttpMethod::Patch],
        access: Access::Authenticated,
        attach: |route| route.to(users::update_profile),
    },
    RouteSpec {
        operation: "updatePassword",
        path: "/users/{id}/password",
        methods: &[HttpMethod::Put, HttpMethod::Patch],
        access: Access::Authenticated,
        attach: |route| route.to(users::update_password),
    },
    RouteSpec {
        operation: "requestEmailChange",
        path: "/users/{id}/account",
        methods: &[HttpMethod::Put, HttpMethod::Patch],
        access: Access::Authenticated,
        attach: |route| route.to(users::request_email_change),
    },
];

/// Register extractor settings and every route in [`ROUTES`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use accounts::inbound::http::routes::{API_PREFIX, configure};
///
/// let app = App::new().service(web::scope(API_PREFIX).configure(configure));
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config());

    let mut paths: Vec<&'static str> = Vec::new();
    for spec in ROUTES {
        if !paths.contains(&spec.path) {
            paths.push(spec.path);
        }
    }

    for path in paths {
        let mut resource = web::resource(path);
        for spec in ROUTES.iter().filter(|spec| spec.path == path) {
            for method in spec.methods {
                resource = resource.route((spec.attach)(method.route()));
            }
        }
        cfg.service(resource);
    }
}
