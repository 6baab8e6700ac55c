//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together with
//! the domain schemas they return, plus the bearer-token security scheme.
//! Swagger UI serves it in debug builds and `cargo run --bin openapi-dump`
//! prints it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AccessToken, Contact, Error, ErrorCode, User};
use crate::inbound::http::contacts::ContactRequest;
use crate::inbound::http::users::{LoginBody, SignupBody};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Adds the JWT bearer scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Contacts API",
        description = "Per-user contact book with search and upcoming-birthday reminders."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::delete_contact,
        crate::inbound::http::contacts::search_contacts,
        crate::inbound::http::contacts::upcoming_birthdays,
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Contact,
        ContactRequest,
        User,
        SignupBody,
        LoginBody,
        AccessToken,
        Error,
        ErrorCode
    )),
    tags(
        (name = "contacts", description = "Contact records owned by the caller"),
        (name = "auth", description = "Signup and token issuance"),
        (name = "users", description = "The authenticated account"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
