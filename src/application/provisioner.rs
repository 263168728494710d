// Provisioning API seam - what the trigger sequence needs from the remote service
use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::node::{NodeDefinition, NodeName};

/// Raw status string reported by `GET /v1/node/{name}/instance`. Anything
/// outside the two pending values is terminal; the service does not let us
/// distinguish success from failure there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceStatus(pub String);

impl InstanceStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self.0.as_str(), "provision_pending" | "provisioning")
    }
}

impl Display for InstanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A failed call to the provisioning API. Aborts the current triggered
/// action only; the kiosk keeps polling for the next press.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

#[async_trait]
pub trait ProvisionerApi: Send + Sync {
    /// `PUT /v1/node/{name}/definition`, expects 201 Created.
    async fn create_definition(
        &self,
        name: &NodeName,
        definition: &NodeDefinition,
    ) -> Result<(), ProvisioningError>;

    /// `PUT /v1/node/{name}/instance` with an empty body, expects 202 Accepted.
    async fn start_instance(&self, name: &NodeName) -> Result<(), ProvisioningError>;

    /// `GET /v1/node/{name}/instance`, returns the `status` field.
    async fn instance_status(&self, name: &NodeName) -> Result<InstanceStatus, ProvisioningError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_statuses() {
        assert!(InstanceStatus("provision_pending".to_string()).is_pending());
        assert!(InstanceStatus("provisioning".to_string()).is_pending());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!InstanceStatus("active".to_string()).is_pending());
        assert!(!InstanceStatus("failed".to_string()).is_pending());
        assert!(!InstanceStatus("".to_string()).is_pending());
    }
}
