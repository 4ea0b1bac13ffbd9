// Secret comparison, Basic-Auth derivation and redirect sanitising

use base64::{Engine as _, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use url::Url;

const REDIRECT_BASE: &str = "http://draft.invalid/";

/// Constant-time equality over byte strings of any length.
///
/// Both inputs are zero-padded to the longer length; the length check also
/// goes through `subtle`.
pub fn safe_compare(a: &[u8], b: &[u8]) -> bool {
    let max = a.len().max(b.len());
    let mut pa = vec![0u8; max];
    let mut pb = vec![0u8; max];
    pa[..a.len()].copy_from_slice(a);
    pb[..b.len()].copy_from_slice(b);

    let same_len = (a.len() as u64).ct_eq(&(b.len() as u64));
    let same_bytes = pa.as_slice().ct_eq(pb.as_slice());
    bool::from(same_len & same_bytes)
}

/// True only when a secret is configured, one was provided, and they match.
pub fn secret_matches(provided: Option<&str>, configured: Option<&SecretString>) -> bool {
    let Some(configured) = configured else {
        return false;
    };
    let configured = configured.expose_secret();
    match provided {
        Some(provided) if !provided.is_empty() && !configured.is_empty() => {
            safe_compare(provided.as_bytes(), configured.as_bytes())
        }
        _ => false,
    }
}

/// `Basic base64(user:password)`
pub fn basic_auth_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

/// Normalise `slug` into a same-origin redirect path, or `None` when it is
/// not syntactically a path.
pub fn sanitize_redirect_path(slug: &str) -> Option<String> {
    if !slug.starts_with('/')
        || slug.starts_with("//")
        || slug.contains('\\')
        || slug.chars().any(char::is_control)
    {
        return None;
    }

    let base = Url::parse(REDIRECT_BASE).ok()?;
    let joined = base.join(slug).ok()?;
    if joined.origin() != base.origin() {
        return None;
    }

    let mut target = joined.path().to_string();
    if let Some(query) = joined.query() {
        target.push('?');
        target.push_str(query);
    }
    if let Some(fragment) = joined.fragment() {
        target.push('#');
        target.push_str(fragment);
    }
    Some(target)
}

/// Where the activator sends the browser: the sanitised slug, else `/`.
pub fn redirect_target(slug: Option<&str>) -> String {
    slug.and_then(sanitize_redirect_path)
        .unwrap_or_else(|| "/".to_string())
}
