//! OpenID 2.0 messages exchanged with Steam.
//!
//! Steam only supports the identifier-select flow: we send the user to the
//! provider with `checkid_setup`, Steam sends them back with a positive
//! assertion (`id_res`), and we confirm that assertion server-to-server
//! with `check_authentication` before trusting the claimed identity.

use std::collections::{BTreeMap, HashMap};

use url::Url;

use super::errors::SteamLinkError;
use crate::domain::account::SteamId;

pub const OPENID_NS: &str = "http://specs.openid.net/auth/2.0";
pub const IDENTIFIER_SELECT: &str = "http://specs.openid.net/auth/2.0/identifier_select";
pub const STEAM_IDENTITY_PREFIX: &str = "https://steamcommunity.com/openid/id/";

pub const MODE_CHECKID_SETUP: &str = "checkid_setup";
pub const MODE_ID_RES: &str = "id_res";
pub const MODE_CHECK_AUTHENTICATION: &str = "check_authentication";

/// Query parameter carrying the session token through the round-trip.
pub const TOKEN_PARAM: &str = "token";
/// Query parameter carrying the resolved app origin through the round-trip.
pub const APP_ORIGIN_PARAM: &str = "app_origin";
/// Presence of this parameter marks a request as a provider callback.
pub const MODE_PARAM: &str = "openid.mode";

/// Parameters a callback must carry, in the order they are reported.
pub const REQUIRED_CALLBACK_PARAMS: [&str; 8] = [
    "openid.mode",
    "openid.identity",
    "openid.return_to",
    "openid.response_nonce",
    "openid.assoc_handle",
    "openid.signed",
    "openid.sig",
    TOKEN_PARAM,
];

/// Marker line in a positive `check_authentication` response.
const IS_VALID_TRUE: &str = "is_valid:true";

/// Builds the `return_to` URL: the callback route plus the round-tripped
/// token and app origin.
pub fn build_return_to(
    callback_url: &str,
    token: &str,
    app_origin: &str,
) -> Result<Url, SteamLinkError> {
    Url::parse_with_params(callback_url, &[(TOKEN_PARAM, token), (APP_ORIGIN_PARAM, app_origin)])
        .map_err(|e| SteamLinkError::Configuration(format!("invalid callback URL: {}", e)))
}

/// Builds the `checkid_setup` redirect to the provider.
pub fn build_checkid_setup(
    endpoint: &str,
    return_to: &Url,
    realm: &str,
) -> Result<Url, SteamLinkError> {
    Url::parse_with_params(
        endpoint,
        &[
            ("openid.ns", OPENID_NS),
            ("openid.mode", MODE_CHECKID_SETUP),
            ("openid.return_to", return_to.as_str()),
            ("openid.realm", realm),
            ("openid.identity", IDENTIFIER_SELECT),
            ("openid.claimed_id", IDENTIFIER_SELECT),
        ],
    )
    .map_err(|e| SteamLinkError::Configuration(format!("invalid OpenID endpoint: {}", e)))
}

/// A structurally valid Steam callback, not yet confirmed by Steam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamCallback {
    pub steam_id: SteamId,
    /// Session token read from the signed `openid.return_to`, never from the
    /// unsigned top-level query. Empty when `return_to` carries none.
    pub token: String,
    return_to: String,
    openid_params: BTreeMap<String, String>,
}

impl SteamCallback {
    /// Runs the local checks on the callback query, in order: required
    /// parameters, mode, identity URL shape, Steam id format.
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, SteamLinkError> {
        let missing: Vec<String> = REQUIRED_CALLBACK_PARAMS
            .iter()
            .filter(|name| param(params, name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SteamLinkError::MissingParameters(missing));
        }

        let mode = param(params, "openid.mode").unwrap_or_default();
        if mode != MODE_ID_RES {
            return Err(SteamLinkError::InvalidMode(mode.to_string()));
        }

        let identity = param(params, "openid.identity").unwrap_or_default();
        let steam_id = extract_steam_id(identity)?;

        let return_to = param(params, "openid.return_to")
            .unwrap_or_default()
            .to_string();
        let token = Url::parse(&return_to)
            .ok()
            .and_then(|url| {
                url.query_pairs()
                    .find(|(key, _)| key == TOKEN_PARAM)
                    .map(|(_, value)| value.into_owned())
            })
            .unwrap_or_default();
        let openid_params = params
            .iter()
            .filter(|(key, _)| key.starts_with("openid."))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            steam_id,
            token,
            return_to,
            openid_params,
        })
    }

    /// Checks that the assertion was issued for our own callback route.
    ///
    /// Steam signs `return_to`, so an assertion minted for another relying
    /// party keeps that party's URL and fails here.
    pub fn check_return_to(&self, callback_url: &str) -> Result<(), SteamLinkError> {
        let mismatch = || SteamLinkError::ReturnToMismatch(self.return_to.clone());
        let expected = Url::parse(callback_url)
            .map_err(|e| SteamLinkError::Configuration(format!("invalid callback URL: {}", e)))?;
        let actual = Url::parse(&self.return_to).map_err(|_| mismatch())?;

        let same_route = actual.scheme() == expected.scheme()
            && actual.host_str() == expected.host_str()
            && actual.port_or_known_default() == expected.port_or_known_default()
            && actual.path() == expected.path();
        if same_route {
            Ok(())
        } else {
            Err(mismatch())
        }
    }

    /// Form body for the `check_authentication` request: every `openid.*`
    /// parameter echoed back with the mode overridden.
    pub fn verification_form(&self) -> Vec<(String, String)> {
        self.openid_params
            .iter()
            .map(|(key, value)| {
                if key == MODE_PARAM {
                    (key.clone(), MODE_CHECK_AUTHENTICATION.to_string())
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect()
    }
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn extract_steam_id(identity: &str) -> Result<SteamId, SteamLinkError> {
    let tail = identity
        .strip_prefix(STEAM_IDENTITY_PREFIX)
        .ok_or(SteamLinkError::InvalidIdentityFormat)?;
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SteamLinkError::SteamIdExtractionFailed);
    }
    SteamId::parse(tail).map_err(|_| SteamLinkError::InvalidSteamIdFormat(tail.to_string()))
}

/// True when a `check_authentication` response confirms the assertion.
///
/// The response is OpenID key-value form; one line must read `is_valid:true`.
pub fn is_assertion_confirmed(body: &str) -> bool {
    body.lines().any(|line| line.trim() == IS_VALID_TRUE)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use proptest::prelude::*;

    // ══════════════════════════════════════════════════════════════
    // Outbound request
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn return_to_embeds_token_and_origin() {
        let url = build_return_to(
            "https://api.gameshlf.com/api/steam/auth",
            "tok en",
            "https://gameshlf.com",
        )
        .unwrap();
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/api/steam/auth");
        assert_eq!(pairs.get("token").map(String::as_str), Some("tok en"));
        assert_eq!(
            pairs.get("app_origin").map(String::as_str),
            Some("https://gameshlf.com")
        );
    }

    #[test]
    fn checkid_setup_uses_fixed_openid_values() {
        let return_to =
            build_return_to("https://api.gameshlf.com/api/steam/auth", "t", "https://gameshlf.com")
                .unwrap();
        let url = build_checkid_setup(
            "https://steamcommunity.com/openid/login",
            &return_to,
            "https://api.gameshlf.com",
        )
        .unwrap();
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("steamcommunity.com"));
        assert_eq!(url.path(), "/openid/login");
        assert_eq!(pairs["openid.ns"], OPENID_NS);
        assert_eq!(pairs["openid.mode"], "checkid_setup");
        assert_eq!(pairs["openid.identity"], IDENTIFIER_SELECT);
        assert_eq!(pairs["openid.claimed_id"], IDENTIFIER_SELECT);
        assert_eq!(pairs["openid.realm"], "https://api.gameshlf.com");
        assert_eq!(pairs["openid.return_to"], return_to.as_str());
    }

    #[test]
    fn bad_callback_url_is_configuration_error() {
        let result = build_return_to("not a url", "t", "https://gameshlf.com");
        assert!(matches!(result, Err(SteamLinkError::Configuration(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Callback parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parses_valid_callback() {
        let callback = SteamCallback::parse(&callback_params("session-token")).unwrap();
        assert_eq!(callback.steam_id.as_str(), STEAM_ID);
        assert_eq!(callback.token, "session-token");
    }

    #[test]
    fn token_comes_from_signed_return_to() {
        let mut params = callback_params("signed-token");
        params.insert("token".into(), "query-token".into());

        let callback = SteamCallback::parse(&params).unwrap();

        assert_eq!(callback.token, "signed-token");
    }

    #[test]
    fn return_to_without_token_yields_empty_token() {
        let mut params = callback_params("t");
        params.insert(
            "openid.return_to".into(),
            "https://api.gameshlf.com/api/steam/auth".into(),
        );

        assert_eq!(SteamCallback::parse(&params).unwrap().token, "");
    }

    #[test]
    fn own_return_to_passes_route_check() {
        let callback = SteamCallback::parse(&callback_params("t")).unwrap();
        assert_eq!(
            callback.check_return_to("https://api.gameshlf.com/api/steam/auth"),
            Ok(())
        );
    }

    #[test]
    fn foreign_return_to_fails_route_check() {
        for foreign in [
            "https://evil-rp.example/steam/return?token=t",
            "https://api.gameshlf.com/other/route?token=t",
            "http://api.gameshlf.com/api/steam/auth?token=t",
            "https://api.gameshlf.com:8443/api/steam/auth?token=t",
            "not a url",
        ] {
            let mut params = callback_params("t");
            params.insert("openid.return_to".into(), foreign.into());
            let callback = SteamCallback::parse(&params).unwrap();

            assert_eq!(
                callback.check_return_to("https://api.gameshlf.com/api/steam/auth"),
                Err(SteamLinkError::ReturnToMismatch(foreign.to_string())),
                "{}",
                foreign
            );
        }
    }

    #[test]
    fn reports_every_missing_parameter() {
        let mut params = callback_params("t");
        params.remove("openid.sig");
        params.remove("token");

        assert_eq!(
            SteamCallback::parse(&params),
            Err(SteamLinkError::MissingParameters(vec![
                "openid.sig".to_string(),
                "token".to_string()
            ]))
        );
    }

    #[test]
    fn blank_parameter_counts_as_missing() {
        let mut params = callback_params("t");
        params.insert("openid.assoc_handle".into(), "  ".into());

        assert!(matches!(
            SteamCallback::parse(&params),
            Err(SteamLinkError::MissingParameters(names)) if names == vec!["openid.assoc_handle"]
        ));
    }

    #[test]
    fn rejects_non_id_res_mode() {
        let mut params = callback_params("t");
        params.insert("openid.mode".into(), "cancel".into());

        assert_eq!(
            SteamCallback::parse(&params),
            Err(SteamLinkError::InvalidMode("cancel".into()))
        );
    }

    #[test]
    fn rejects_foreign_identity_url() {
        let mut params = callback_params("t");
        params.insert(
            "openid.identity".into(),
            format!("https://evil.example/openid/id/{}", STEAM_ID),
        );

        assert_eq!(
            SteamCallback::parse(&params),
            Err(SteamLinkError::InvalidIdentityFormat)
        );
    }

    #[test]
    fn rejects_identity_without_numeric_tail() {
        let mut params = callback_params("t");
        params.insert("openid.identity".into(), format!("{}gaben", STEAM_IDENTITY_PREFIX));

        assert_eq!(
            SteamCallback::parse(&params),
            Err(SteamLinkError::SteamIdExtractionFailed)
        );
    }

    #[test]
    fn rejects_short_numeric_id() {
        let mut params = callback_params("t");
        params.insert("openid.identity".into(), format!("{}12345", STEAM_IDENTITY_PREFIX));

        assert_eq!(
            SteamCallback::parse(&params),
            Err(SteamLinkError::InvalidSteamIdFormat("12345".into()))
        );
    }

    #[test]
    fn verification_form_overrides_mode_and_drops_non_openid() {
        let callback = SteamCallback::parse(&callback_params("secret-token")).unwrap();
        let form: HashMap<_, _> = callback.verification_form().into_iter().collect();

        assert_eq!(form["openid.mode"], MODE_CHECK_AUTHENTICATION);
        assert_eq!(form["openid.sig"], "c2lnbmF0dXJl");
        assert!(!form.contains_key("token"));
        assert!(!form.contains_key("app_origin"));
        assert!(form.keys().all(|k| k.starts_with("openid.")));
    }

    // ══════════════════════════════════════════════════════════════
    // check_authentication response
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn confirmed_response_is_accepted() {
        let body = "ns:http://specs.openid.net/auth/2.0\nis_valid:true\n";
        assert!(is_assertion_confirmed(body));
    }

    #[test]
    fn negative_response_is_rejected() {
        let body = "ns:http://specs.openid.net/auth/2.0\nis_valid:false\n";
        assert!(!is_assertion_confirmed(body));
        assert!(!is_assertion_confirmed(""));
        assert!(!is_assertion_confirmed("is_valid:trueish"));
    }

    proptest! {
        #[test]
        fn non_steam_identities_never_parse(host in "[a-z]{3,12}\\.(com|net|io)", id in "[0-9]{17}") {
            let mut params = callback_params("t");
            params.insert("openid.identity".into(), format!("https://{}/openid/id/{}", host, id));
            prop_assert!(SteamCallback::parse(&params).is_err());
        }

        #[test]
        fn wrong_length_ids_never_parse(id in "[0-9]{1,16}|[0-9]{18,22}") {
            let mut params = callback_params("t");
            params.insert("openid.identity".into(), format!("{}{}", STEAM_IDENTITY_PREFIX, id));
            prop_assert!(SteamCallback::parse(&params).is_err());
        }
    }
}
