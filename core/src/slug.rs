// shopfront/src/slug.rs

/// Deterministic URL-safe identifier: lowercase ASCII letters and digits, with
/// every run of anything else collapsed to a single `-` and no leading or
/// trailing `-`. May return an empty string.
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut pending_hyphen = false;

  for ch in text.chars().flat_map(char::to_lowercase) {
    if ch.is_ascii_alphanumeric() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(ch);
    } else {
      pending_hyphen = true;
    }
  }

  slug
}

/// Slug for an admin form: the explicit slug when given, else the name.
pub fn derive_slug(explicit: Option<&str>, name: &str) -> String {
  match explicit {
    Some(s) if !s.trim().is_empty() => slugify(s),
    _ => slugify(name),
  }
}
