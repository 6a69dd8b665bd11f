//! Client-side controller state for one UI instance

use log::{debug, error, info};

use crate::integrations::IntegrationClient;
use crate::prompt::PromptClient;

/// Owns everything the UI shows between requests: the detected
/// systems, the current selection and the last prompt response.
///
/// Methods that talk to the backend take `&mut self`, so a session
/// never has two requests in flight. A failed call leaves the state
/// exactly as it was.
#[derive(Debug)]
pub struct Session
{   prompts: PromptClient
  , integrations: IntegrationClient
  , systems: Vec<String>
  , selected: Option<String>
  , last_response: Option<String>
}

impl Session
{   pub fn new(config: &crate::config::ClientConfig)
      -> Result<Self, crate::error::Error>
    {   let transport = crate::transport::Transport::new(config)?;
        debug!("Creating session against {}", transport.base_url());
        Ok(Session
        {   prompts: PromptClient::with_transport(transport.clone(), config)
          , integrations: IntegrationClient::with_transport(transport)
          , systems: vec![]
          , selected: None
          , last_response: None
        })
    }

    pub fn prompts(&self) -> &PromptClient
    {   &self.prompts
    }

    pub fn integrations(&self) -> &IntegrationClient
    {   &self.integrations
    }

    pub fn systems(&self) -> &[String]
    {   &self.systems
    }

    pub fn selected(&self) -> Option<&str>
    {   self.selected.as_deref()
    }

    pub fn last_response(&self) -> Option<&str>
    {   self.last_response.as_deref()
    }

    /// Fetch detected systems. The list is only replaced on success;
    /// a selection that disappeared from the new list is dropped.
    pub async fn refresh_systems(&mut self)
      -> Result<&[String], crate::error::Error>
    {   let systems = self.integrations.list_detected_systems().await?;
        if let Some(current) = &self.selected
        {   if !systems.contains(current)
            {   info!("Selected system {} no longer detected", current);
                self.selected = None;
            }
        }
        self.systems = systems;
        Ok(&self.systems)
    }

    pub fn select_system(&mut self, name: &str)
      -> Result<(), crate::error::Error>
    {   if !self.systems.iter().any(|s| s == name)
        {   error!("Unknown system selected: {}", name);
            return Err(crate::error::Error::InvalidInput(
              format!("unknown system: {}", name)
            ));
        }
        debug!("Selected system {}", name);
        self.selected = Some(name.to_string());
        Ok(())
    }

    /// Register `api_key` for the selected system
    pub async fn add_integration(&mut self, api_key: &str)
      -> Result<crate::request::IntegrationAdded, crate::error::Error>
    {   let system = self.selected.clone().ok_or_else(|| {
          crate::error::Error::InvalidInput(
            "no system selected".to_string()
          )
        })?;
        self.integrations.add_integration(&system, api_key).await
    }

    /// Submit `prompt`; the answer becomes the displayed response
    pub async fn send(&mut self, prompt: &str)
      -> Result<&str, crate::error::Error>
    {   let answer = self.prompts.prompt(prompt).await?;
        Ok(self.last_response.insert(answer).as_str())
    }

    /// Clear backend memory for the configured session id
    pub async fn forget(&mut self) -> Result<(), crate::error::Error>
    {   let session_id = self.prompts.session_id()
          .ok_or_else(|| {
            crate::error::Error::InvalidInput(
              "no session id configured".to_string()
            )
          })?
          .to_string();
        self.prompts.clear_memory(&session_id).await
    }
}
