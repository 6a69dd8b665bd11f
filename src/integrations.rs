//! Integration discovery and registration

use log::{debug, error, trace};

use crate::request::{IntegrationAdded, IntegrationRequest, ScanResponse};

#[derive(Debug, Clone)]
pub struct IntegrationClient
{   transport: crate::transport::Transport
}

impl IntegrationClient
{   pub fn new(config: &crate::config::ClientConfig)
      -> Result<Self, crate::error::Error>
    {   let transport = crate::transport::Transport::new(config)?;
        Ok(IntegrationClient::with_transport(transport))
    }

    pub fn with_transport(transport: crate::transport::Transport) -> Self
    {   IntegrationClient { transport }
    }

    /// Systems the backend can integrate with, in backend order
    pub async fn list_detected_systems(&self)
      -> Result<Vec<String>, crate::error::Error>
    {   debug!("list_detected_systems");
        let scan: ScanResponse = self.transport
          .get_json(&["integrations", "scan"])
          .await?;
        debug!("Backend detected {} systems", scan.detected_systems.len());
        Ok(scan.detected_systems)
    }

    /// Register `api_key` for `system`.
    /// The key travels in the JSON body, not in a header.
    pub async fn add_integration(
      &self
    , system: &str
    , api_key: &str
    ) -> Result<IntegrationAdded, crate::error::Error>
    {   if system.is_empty()
        {   error!("add_integration called without a system");
            return Err(crate::error::Error::InvalidInput(
              "no system selected".to_string()
            ));
        }

        let request = IntegrationRequest::new(system, api_key);
        debug!("add_integration {:?}", request);

        let text = self.transport
          .post_text(&["integrations", "add"], &request)
          .await?;

        // success body is backend-defined
        let added = serde_json::from_str::<IntegrationAdded>(&text)
          .unwrap_or_else(|e| {
            trace!("Unstructured add response ({}): {}", e, text);
            IntegrationAdded::default()
          });
        debug!("Integration {} added", system);
        Ok(added)
    }
}
