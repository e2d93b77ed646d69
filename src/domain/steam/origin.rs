//! App origin resolution and account-page redirects.
//!
//! Every redirect this service issues towards the browser goes through
//! [`resolve_app_origin`], so an attacker-supplied referer or `app_origin`
//! value can never pick the destination host.

use url::Url;

use crate::config::{SteamConfig, ACCOUNT_PAGE_PATH};

/// Picks the first candidate whose host falls under an allowed suffix and
/// returns its origin (`scheme://host[:port]`), or `default_origin`.
///
/// A host matches a suffix when it equals it or ends with `.` + suffix, so
/// `evilgameshlf.com` does not match `gameshlf.com`. Only `http` and `https`
/// candidates are considered.
pub fn resolve_app_origin(
    candidates: &[Option<&str>],
    allowed_suffixes: &[String],
    default_origin: &str,
) -> String {
    candidates
        .iter()
        .flatten()
        .find_map(|candidate| allowed_origin(candidate, allowed_suffixes))
        .unwrap_or_else(|| default_origin.trim_end_matches('/').to_string())
}

fn allowed_origin(candidate: &str, allowed_suffixes: &[String]) -> Option<String> {
    let url = Url::parse(candidate.trim()).ok()?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    let permitted = allowed_suffixes.iter().any(|suffix| {
        host == *suffix
            || host
                .strip_suffix(suffix.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
    });
    if !permitted {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

/// Result marker appended to the account page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    Failed(&'static str),
}

impl LinkOutcome {
    fn query_pair(&self) -> (&'static str, &'static str) {
        match self {
            LinkOutcome::Linked => ("steam_linked", "true"),
            LinkOutcome::Failed(code) => ("steam_error", code),
        }
    }
}

/// Allow-list and fallback for app origins, as configured.
#[derive(Debug, Clone)]
pub struct AppOriginPolicy {
    allowed_suffixes: Vec<String>,
    default_origin: String,
}

impl AppOriginPolicy {
    pub fn new(allowed_suffixes: Vec<String>, default_origin: impl Into<String>) -> Self {
        Self {
            allowed_suffixes,
            default_origin: default_origin.into(),
        }
    }

    pub fn from_config(config: &SteamConfig) -> Self {
        Self::new(config.allowed_suffixes(), config.default_app_origin.clone())
    }

    pub fn resolve(&self, candidates: &[Option<&str>]) -> String {
        resolve_app_origin(candidates, &self.allowed_suffixes, &self.default_origin)
    }

    /// `{origin}/account?steam_linked=true` or `{origin}/account?steam_error=<code>`.
    ///
    /// `origin` must come from [`AppOriginPolicy::resolve`].
    pub fn account_redirect(&self, origin: &str, outcome: LinkOutcome) -> String {
        let (key, value) = outcome.query_pair();
        match Url::parse(origin).and_then(|base| base.join(ACCOUNT_PAGE_PATH)) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair(key, value);
                url.to_string()
            }
            // Unparseable origin can only come from a bad default; keep the
            // redirect relative rather than failing the response.
            Err(_) => format!("{}?{}={}", ACCOUNT_PAGE_PATH, key, value),
        }
    }
}
