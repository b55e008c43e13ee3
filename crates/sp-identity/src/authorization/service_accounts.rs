//! Recognized service accounts
//!
//! System callers (billing webhooks, maintenance jobs) act under fixed
//! principal ids. Only these may trigger plan-driven feature resets.

use std::collections::HashSet;

use sp_config::IdentityConfig;

pub const MAINTENANCE: &str = "svc_maintenance";
pub const SERVICE_CLIENT: &str = "svc_serviceclient";
pub const EXTERNAL_WEBHOOK: &str = "svc_externalwebhook";

pub const BUILTIN: &[&str] = &[MAINTENANCE, SERVICE_CLIENT, EXTERNAL_WEBHOOK];

#[derive(Debug, Clone)]
pub struct ServiceAccounts {
    ids: HashSet<String>,
}

impl ServiceAccounts {
    /// Built-in accounts only.
    pub fn builtin() -> Self {
        Self {
            ids: BUILTIN.iter().map(|id| id.to_string()).collect(),
        }
    }

    /// Built-in accounts plus `identity.service_accounts`.
    pub fn from_config(config: &IdentityConfig) -> Self {
        let mut accounts = Self::builtin();
        accounts.ids.extend(
            config
                .service_accounts
                .iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        );
        accounts
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for ServiceAccounts {
    fn default() -> Self {
        Self::builtin()
    }
}
