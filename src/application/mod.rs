//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::billing::{
    OpenCustomerPortalCommand, OpenCustomerPortalHandler, OpenCustomerPortalResult,
    ReconcileOutcome, ReconcileWebhookCommand, ReconcileWebhookHandler, ReconcileWebhookResult,
};
pub use handlers::steam::{
    CompleteSteamLinkCommand, CompleteSteamLinkHandler, CompleteSteamLinkResult,
    InitiateSteamLinkCommand, InitiateSteamLinkHandler, InitiateSteamLinkResult,
    SteamLinkSettings,
};
