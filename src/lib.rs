//! Game Shlf - account service
//!
//! Links a user's Steam identity through OpenID 2.0, keeps donor status in
//! step with Stripe billing events, and hands donors off to the Stripe
//! customer portal.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
