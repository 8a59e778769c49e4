// shopfront_app/src/web/responses.rs

//! Form actions answer with `303 See Other`: to the success location, or back
//! to the originating page with `?error=<message>` appended.

use crate::errors::AppError;
use actix_web::http::header;
use actix_web::HttpResponse;
use shopfront::ShopError;

pub fn see_other(location: &str) -> HttpResponse {
  HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish()
}

/// `origin` with an `error` query parameter added.
pub fn location_with_error(origin: &str, message: &str) -> String {
  let separator = if origin.contains('?') { '&' } else { '?' };
  let query = serde_urlencoded::to_string(&[("error", message)]).unwrap_or_default();
  format!("{}{}{}", origin, separator, query)
}

/// Turns the outcome of a form action into a redirect. Core failures go back to
/// `origin` with their user-facing message; session failures (login or admin
/// required) are returned unchanged so their own redirects apply.
pub fn form_outcome(outcome: Result<String, AppError>, origin: &str) -> Result<HttpResponse, AppError> {
  match outcome {
    Ok(location) => Ok(see_other(&location)),
    Err(AppError::Shop(shop_err)) => Ok(redirect_with_error(origin, &shop_err)),
    Err(other) => Err(other),
  }
}

pub fn redirect_with_error(origin: &str, err: &ShopError) -> HttpResponse {
  if err.is_user_facing() {
    tracing::info!(error = %err, origin, "Form action rejected.");
  } else {
    tracing::error!(error = %err, origin, "Form action failed.");
  }
  see_other(&location_with_error(origin, &err.user_message()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_is_url_encoded_and_appended() {
    assert_eq!(
      location_with_error("/cart", "Your cart is empty."),
      "/cart?error=Your+cart+is+empty."
    );
    assert_eq!(
      location_with_error("/login?next=%2Fcart", "Invalid credentials."),
      "/login?next=%2Fcart&error=Invalid+credentials."
    );
  }

  #[test]
  fn internal_errors_are_reported_generically() {
    let resp = redirect_with_error("/checkout", &ShopError::Internal("disk on fire".into()));
    let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/checkout?error=Something+went+wrong.+Please+try+again.");
  }
}
