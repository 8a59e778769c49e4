// shopfront_app/src/web/extractors.rs

//! Request extractors that turn the session cookie into the explicit `Actor`
//! values the core operations take.

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::session::session_user_id;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use shopfront::accounts;
use shopfront::models::{Actor, AdminActor};
use tracing::warn;

/// The signed-in user, if any. Never fails on a missing or stale session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Actor>);

/// A signed-in user. Without one the request redirects to `/login?next=<path>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Actor);

/// A signed-in admin. Shoppers are redirected to `/`.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminActor);

async fn load_actor(req: &HttpRequest) -> Result<Option<Actor>, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
  let Some(user_id) = session_user_id(req, &state.session_key) else {
    return Ok(None);
  };
  let actor = accounts::find_actor(&state.db_pool, user_id).await?;
  if actor.is_none() {
    warn!(%user_id, "Session refers to a user that no longer exists.");
  }
  Ok(actor)
}

fn requested_path(req: &HttpRequest) -> String {
  // Form posts return to the page that hosts the form, not to the action URL.
  if req.method() == actix_web::http::Method::POST {
    if let Some(referer) = req
      .headers()
      .get(actix_web::http::header::REFERER)
      .and_then(|v| v.to_str().ok())
    {
      if let Some(path) = path_of_url(referer) {
        return path;
      }
    }
    return "/".to_string();
  }
  match req.uri().path_and_query() {
    Some(pq) => pq.as_str().to_string(),
    None => req.path().to_string(),
  }
}

fn path_of_url(url: &str) -> Option<String> {
  let after_scheme = url.split_once("://").map(|(_, rest)| rest)?;
  let path_start = after_scheme.find('/')?;
  Some(after_scheme[path_start..].to_string())
}

impl FromRequest for CurrentUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move { Ok(CurrentUser(load_actor(&req).await?)) })
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      match load_actor(&req).await? {
        Some(actor) => Ok(AuthenticatedUser(actor)),
        None => Err(AppError::LoginRequired {
          next: requested_path(&req),
        }),
      }
    })
  }
}

impl FromRequest for RequireAdmin {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      let actor = match load_actor(&req).await? {
        Some(actor) => actor,
        None => {
          return Err(AppError::LoginRequired {
            next: requested_path(&req),
          })
        }
      };
      actor.require_admin().map(RequireAdmin).map_err(|_| AppError::AdminRequired)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn referer_is_reduced_to_its_path() {
    assert_eq!(
      path_of_url("http://shop.example/products/desk-lamp?x=1").as_deref(),
      Some("/products/desk-lamp?x=1")
    );
    assert_eq!(path_of_url("http://shop.example"), None);
    assert_eq!(path_of_url("/relative"), None);
  }
}
