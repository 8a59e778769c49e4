// shopfront_app/src/web/handlers/auth_handlers.rs

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::responses::redirect_with_error;
use crate::web::session::{removal_cookie, safe_internal_path, session_cookie};
use shopfront::accounts::{self, Registration};
use shopfront::models::Actor;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
  pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
  pub next: Option<String>,
}

fn signed_in_redirect(app_state: &AppState, actor: &Actor, next: &str) -> Result<HttpResponse, AppError> {
  let cookie = session_cookie(actor.id, &app_state.session_key, app_state.config.secure_cookies)
    .ok_or_else(|| AppError::Internal("Session cookie could not be signed.".to_string()))?;
  Ok(
    HttpResponse::SeeOther()
      .insert_header((header::LOCATION, next))
      .cookie(cookie)
      .finish(),
  )
}

fn login_origin(next: &str) -> String {
  let query = serde_urlencoded::to_string(&[("next", next)]).unwrap_or_default();
  format!("/login?{}", query)
}

#[instrument(name = "handler::login", skip(app_state, form))]
pub async fn login_handler(app_state: web::Data<AppState>, form: web::Form<LoginForm>) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  let next = safe_internal_path(form.next.as_deref(), "/");

  match accounts::authenticate(&app_state.db_pool, &form.email, &form.password).await {
    Ok(actor) => signed_in_redirect(&app_state, &actor, &next),
    Err(err) => Ok(redirect_with_error(&login_origin(&next), &err)),
  }
}

#[instrument(name = "handler::register", skip(app_state, form))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  let next = safe_internal_path(form.next.as_deref(), "/");
  let registration = Registration {
    name: form.name,
    email: form.email,
    password: form.password,
  };

  match accounts::register(&app_state.db_pool, registration).await {
    Ok(actor) => {
      info!(user_id = %actor.id, "Registered and signed in.");
      signed_in_redirect(&app_state, &actor, &next)
    }
    Err(err) => Ok(redirect_with_error("/register", &err)),
  }
}

pub async fn logout_handler() -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header((header::LOCATION, "/"))
    .cookie(removal_cookie())
    .finish()
}
