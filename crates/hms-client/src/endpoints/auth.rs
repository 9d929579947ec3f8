use crate::gateway::{Gateway, RequestDescriptor};
use hms_api::{ApiResult, LoginRequest, LoginResponse};

/// Exchange credentials for a token. Prefer going through
/// [`SessionStore::login`](crate::session::SessionStore::login), which
/// commits the result to the session.
pub async fn login(gateway: &Gateway, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
    gateway
        .send(RequestDescriptor::post("/api/auth/login").json(credentials)?)
        .await
}
