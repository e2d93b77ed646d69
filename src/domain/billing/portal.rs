//! Customer portal feature set.

/// Customer fields a donor may edit from the portal.
pub const PORTAL_EDITABLE_CUSTOMER_FIELDS: [&str; 2] = ["email", "address"];

/// Features enabled on every portal session this service creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalFeatures {
    pub payment_method_update: bool,
    pub invoice_history: bool,
    pub customer_update_fields: Vec<&'static str>,
}

impl PortalFeatures {
    /// Payment method updates, invoice history, and email/address edits.
    pub fn donor_defaults() -> Self {
        Self {
            payment_method_update: true,
            invoice_history: true,
            customer_update_fields: PORTAL_EDITABLE_CUSTOMER_FIELDS.to_vec(),
        }
    }
}

impl Default for PortalFeatures {
    fn default() -> Self {
        Self::donor_defaults()
    }
}
