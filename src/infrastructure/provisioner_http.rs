// HTTP client for the provisioning API
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::application::provisioner::{InstanceStatus, ProvisionerApi, ProvisioningError};
use crate::domain::node::{NodeDefinition, NodeName};

pub struct HttpProvisionerApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct InstanceStatusResponse {
    status: String,
}

impl HttpProvisionerApi {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn definition_url(&self, name: &NodeName) -> String {
        format!("{}/v1/node/{}/definition", self.base_url, name)
    }

    fn instance_url(&self, name: &NodeName) -> String {
        format!("{}/v1/node/{}/instance", self.base_url, name)
    }
}

async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
    url: &str,
) -> Result<reqwest::Response, ProvisioningError> {
    if response.status() != expected {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ProvisioningError::UnexpectedStatus {
            url: url.to_string(),
            status,
            body,
        });
    }
    Ok(response)
}

fn transport(url: &str, source: reqwest::Error) -> ProvisioningError {
    ProvisioningError::Transport {
        url: url.to_string(),
        source: source.into(),
    }
}

#[async_trait]
impl ProvisionerApi for HttpProvisionerApi {
    async fn create_definition(
        &self,
        name: &NodeName,
        definition: &NodeDefinition,
    ) -> Result<(), ProvisioningError> {
        let url = self.definition_url(name);
        let response = self
            .client
            .put(&url)
            .json(definition)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        expect_status(response, StatusCode::CREATED, &url).await?;
        Ok(())
    }

    async fn start_instance(&self, name: &NodeName) -> Result<(), ProvisioningError> {
        let url = self.instance_url(name);
        let response = self
            .client
            .put(&url)
            .body("")
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        expect_status(response, StatusCode::ACCEPTED, &url).await?;
        Ok(())
    }

    async fn instance_status(&self, name: &NodeName) -> Result<InstanceStatus, ProvisioningError> {
        let url = self.instance_url(name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        let response = expect_status(response, StatusCode::OK, &url).await?;
        let body = response
            .json::<InstanceStatusResponse>()
            .await
            .map_err(|e| transport(&url, e))?;
        Ok(InstanceStatus(body.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_from_trimmed_base() {
        let api = HttpProvisionerApi::new("http://provisioner-dev.hq.local:8080/".to_string());
        let name = NodeName::generate();

        assert_eq!(
            api.definition_url(&name),
            format!("http://provisioner-dev.hq.local:8080/v1/node/{}/definition", name)
        );
        assert_eq!(
            api.instance_url(&name),
            format!("http://provisioner-dev.hq.local:8080/v1/node/{}/instance", name)
        );
    }
}
