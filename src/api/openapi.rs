//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::user_handler;
use crate::domain::{Role, UserSummary};
use crate::types::{MessageResponse, UserListResponse, UserResponse};

/// OpenAPI documentation for the User Directory API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory",
        version = "0.1.0",
        description = "User management API with role-based visibility"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::search_users,
    ),
    components(
        schemas(
            Role,
            UserSummary,
            UserResponse,
            UserListResponse,
            MessageResponse,
            user_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 token issued by the identity provider"))
                        .build(),
                ),
            );
        }
    }
}
