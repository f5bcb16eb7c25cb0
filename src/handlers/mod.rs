pub mod ancillaries;
pub mod changes;
pub mod health;
pub mod hold;
pub mod offers;
pub mod orders;
pub mod search;

use axum::http::HeaderMap;

use crate::errors::AppError;

/// The authenticated caller, as injected by the auth layer in front of this
/// service. Authentication itself is out of scope here; this header is the
/// narrow interface to it.
pub fn current_user(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}
