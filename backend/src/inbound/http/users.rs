//! Account API handlers.
//!
//! ```text
//! POST /api/auth/signup {"username":"ada","email":"ada@example.com","password":"analytical"}
//! POST /api/auth/login {"email":"ada@example.com","password":"analytical"}
//! GET  /api/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AccessToken, CredentialsValidationError, Error, LoginCredentials, SignupRequest, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_validation_error;

/// Signup body for `POST /api/auth/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignupBody {
    /// Login name, 1 to 50 characters.
    #[schema(example = "ada")]
    pub username: String,
    /// Unique account email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Password, 6 to 128 characters.
    #[schema(example = "analytical")]
    pub password: String,
}

impl TryFrom<SignupBody> for SignupRequest {
    type Error = CredentialsValidationError;

    fn try_from(value: SignupBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

/// Login body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginBody {
    /// Account email.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Account password.
    #[schema(example = "analytical")]
    pub password: String,
}

impl TryFrom<LoginBody> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 409, description = "Email already registered", body = Error),
        (status = 422, description = "Invalid signup payload", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let request = SignupRequest::try_from(payload.into_inner())
        .map_err(|err| credentials_validation_error(&err))?;
    let user = state.auth.signup(request).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Token issued", body = AccessToken),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 422, description = "Invalid login payload", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<AccessToken>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| credentials_validation_error(&err))?;
    let token = state.auth.login(credentials).await?;
    Ok(web::Json(token))
}

/// Return the account behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(user: AuthenticatedUser) -> web::Json<User> {
    web::Json(user.into_inner())
}
