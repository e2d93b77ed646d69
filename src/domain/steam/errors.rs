//! Steam linking error types.

use thiserror::Error;

use crate::domain::foundation::ErrorKind;

/// Everything that can stop a Steam account from being linked.
///
/// Variants follow the order in which the callback is checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SteamLinkError {
    /// Initiation without a session token.
    #[error("Missing session token")]
    MissingToken,

    /// Callback lacks one or more required query parameters.
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    /// `openid.mode` was not `id_res`.
    #[error("Unexpected OpenID mode: {0}")]
    InvalidMode(String),

    /// `openid.identity` is not a Steam community identity URL.
    #[error("Identity is not a Steam OpenID identity URL")]
    InvalidIdentityFormat,

    /// The identity URL does not end in a numeric id.
    #[error("Could not extract a Steam id from the identity URL")]
    SteamIdExtractionFailed,

    /// The extracted id is not exactly 17 digits.
    #[error("Invalid Steam id format: {0}")]
    InvalidSteamIdFormat(String),

    /// `openid.return_to` does not point at our callback route.
    #[error("Assertion was issued for another return URL: {0}")]
    ReturnToMismatch(String),

    /// Steam did not confirm the assertion, or could not be asked.
    #[error("OpenID assertion verification failed: {0}")]
    VerificationFailed(String),

    /// The session token carried through the round-trip is not valid.
    #[error("Invalid session token")]
    InvalidToken,

    /// Writing the Steam id to the profile failed.
    #[error("Failed to update profile: {0}")]
    UpdateFailed(String),

    /// The outbound redirect could not be built from configuration.
    #[error("Steam linking misconfigured: {0}")]
    Configuration(String),
}

impl SteamLinkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SteamLinkError::MissingToken
            | SteamLinkError::MissingParameters(_)
            | SteamLinkError::InvalidMode(_)
            | SteamLinkError::InvalidIdentityFormat
            | SteamLinkError::SteamIdExtractionFailed
            | SteamLinkError::InvalidSteamIdFormat(_)
            | SteamLinkError::ReturnToMismatch(_) => ErrorKind::Validation,
            SteamLinkError::InvalidToken => ErrorKind::Auth,
            SteamLinkError::VerificationFailed(_) | SteamLinkError::UpdateFailed(_) => {
                ErrorKind::Upstream
            }
            SteamLinkError::Configuration(_) => ErrorKind::Config,
        }
    }

    /// Error code for JSON bodies, in the same casing as every other API error.
    pub fn code(&self) -> &'static str {
        match self {
            SteamLinkError::MissingToken => "MISSING_TOKEN",
            SteamLinkError::MissingParameters(_) => "MISSING_PARAMETERS",
            SteamLinkError::InvalidMode(_) => "INVALID_MODE",
            SteamLinkError::InvalidIdentityFormat
            | SteamLinkError::SteamIdExtractionFailed
            | SteamLinkError::InvalidSteamIdFormat(_) => "INVALID_IDENTITY",
            SteamLinkError::ReturnToMismatch(_) | SteamLinkError::VerificationFailed(_) => {
                "VERIFICATION_FAILED"
            }
            SteamLinkError::InvalidToken => "INVALID_TOKEN",
            SteamLinkError::UpdateFailed(_) => "UPDATE_FAILED",
            SteamLinkError::Configuration(_) => "CONFIG_ERROR",
        }
    }

    /// Stable marker for the `steam_error` redirect parameter.
    pub fn marker(&self) -> &'static str {
        match self {
            SteamLinkError::MissingToken => "missing_token",
            SteamLinkError::MissingParameters(_) => "missing_parameters",
            SteamLinkError::InvalidMode(_) => "invalid_mode",
            SteamLinkError::InvalidIdentityFormat
            | SteamLinkError::SteamIdExtractionFailed
            | SteamLinkError::InvalidSteamIdFormat(_) => "invalid_identity",
            SteamLinkError::ReturnToMismatch(_) | SteamLinkError::VerificationFailed(_) => {
                "verification_failed"
            }
            SteamLinkError::InvalidToken => "invalid_token",
            SteamLinkError::UpdateFailed(_) => "update_failed",
            SteamLinkError::Configuration(_) => "server_error",
        }
    }
}
