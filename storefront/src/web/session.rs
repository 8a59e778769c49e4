// shopfront_app/src/web/session.rs

//! The signed `shop_session` cookie. It carries only the user id; the role is
//! looked up on every request so a demotion takes effect immediately.

use actix_web::cookie::{time::Duration, Cookie, CookieJar, Key, SameSite};
use actix_web::HttpRequest;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "shop_session";
const SESSION_DAYS: i64 = 7;

/// The user id from a correctly signed session cookie, if any.
pub fn session_user_id(req: &HttpRequest, key: &Key) -> Option<Uuid> {
  let cookie = req.cookie(SESSION_COOKIE)?;
  let mut jar = CookieJar::new();
  jar.add_original(cookie);
  let verified = jar.signed(key).get(SESSION_COOKIE)?;
  Uuid::parse_str(verified.value()).ok()
}

pub fn session_cookie(user_id: Uuid, key: &Key, secure: bool) -> Option<Cookie<'static>> {
  let cookie = Cookie::build(SESSION_COOKIE, user_id.to_string())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(secure)
    .max_age(Duration::days(SESSION_DAYS))
    .finish();

  let mut jar = CookieJar::new();
  jar.signed_mut(key).add(cookie);
  jar.get(SESSION_COOKIE).cloned()
}

pub fn removal_cookie() -> Cookie<'static> {
  let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
  cookie.make_removal();
  cookie
}

/// `path` if it is a same-site absolute path, otherwise `fallback`. Rejects
/// `//host` style values that browsers treat as another origin.
pub fn safe_internal_path(path: Option<&str>, fallback: &str) -> String {
  match path.map(str::trim) {
    Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p.to_string(),
    _ => fallback.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn signed_cookie_round_trips_and_rejects_tampering() {
    let key = Key::derive_from(b"a-test-secret-that-is-long-enough-for-key-derivation");
    let user_id = Uuid::new_v4();
    let cookie = session_cookie(user_id, &key, false).unwrap();
    assert_ne!(cookie.value(), user_id.to_string());
    assert_eq!(cookie.http_only(), Some(true));

    let req = TestRequest::default().cookie(cookie).to_http_request();
    assert_eq!(session_user_id(&req, &key), Some(user_id));

    let forged = Cookie::new(SESSION_COOKIE, Uuid::new_v4().to_string());
    let req = TestRequest::default().cookie(forged).to_http_request();
    assert_eq!(session_user_id(&req, &key), None);

    let other_key = Key::derive_from(b"another-secret-that-is-also-long-enough-for-this");
    let cookie = session_cookie(user_id, &other_key, false).unwrap();
    let req = TestRequest::default().cookie(cookie).to_http_request();
    assert_eq!(session_user_id(&req, &key), None);
  }

  #[test]
  fn only_internal_paths_are_followed() {
    assert_eq!(safe_internal_path(Some("/cart"), "/"), "/cart");
    assert_eq!(safe_internal_path(Some("//evil.example"), "/"), "/");
    assert_eq!(safe_internal_path(Some("https://evil.example"), "/"), "/");
    assert_eq!(safe_internal_path(Some("/\\evil.example"), "/"), "/");
    assert_eq!(safe_internal_path(None, "/products"), "/products");
  }
}
