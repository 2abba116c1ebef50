//! Request extractor resolving the signed-in account.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpRequest, web};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::UserId;
use crate::repository::DieselRepository;
use crate::services::auth::load_authenticated_user;

/// Fails with 401 for anonymous requests and for sessions whose account is
/// gone or inactive. Use `Option<AuthenticatedUser>` on public pages.
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("authentication required"))?;
    let user_id = identity
        .id()
        .ok()
        .and_then(|id| id.parse::<i32>().ok())
        .and_then(|id| UserId::new(id).ok())
        .ok_or_else(|| ErrorUnauthorized("invalid session"))?;

    let repo = req
        .app_data::<web::Data<DieselRepository>>()
        .ok_or_else(|| ErrorInternalServerError("repository is not configured"))?;

    match load_authenticated_user(repo.get_ref(), user_id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ErrorUnauthorized("authentication required")),
        Err(err) => {
            log::error!("Failed to load session user {user_id}: {err}");
            Err(ErrorInternalServerError("failed to load user"))
        }
    }
}
