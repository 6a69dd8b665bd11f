//! Prompt submission against `POST /prompt`

use log::{debug, error, trace, warn};

use crate::request::{
  MemoryCleared, PromptRequest, PromptResponse, ServerGreeting
};

/// Sends prompts to the backend, one request per call
#[derive(Debug, Clone)]
pub struct PromptClient
{   transport: crate::transport::Transport
  , session_id: Option<String>
  , provider: Option<crate::Provider>
}

impl PromptClient
{   pub fn new(config: &crate::config::ClientConfig)
      -> Result<Self, crate::error::Error>
    {   let transport = crate::transport::Transport::new(config)?;
        Ok(PromptClient::with_transport(transport, config))
    }

    /// Build on an existing transport, taking defaults from `config`
    pub fn with_transport(
      transport: crate::transport::Transport
    , config: &crate::config::ClientConfig
    ) -> Self
    {   PromptClient
        {   transport
          , session_id: config.session_id.clone()
          , provider: config.provider.clone()
        }
    }

    pub fn session_id(&self) -> Option<&str>
    {   self.session_id.as_deref()
    }

    pub fn provider(&self) -> Option<&crate::Provider>
    {   self.provider.as_ref()
    }

    /// Request carrying this client's default session and provider
    pub fn request(&self, prompt: impl Into<String>) -> PromptRequest
    {   PromptRequest
        {   prompt: prompt.into()
          , session_id: self.session_id.clone()
          , provider: self.provider.clone()
          , obfuscate_output: None
        }
    }

    /// Send one prompt. The empty string is rejected without a request.
    pub async fn submit_prompt(
      &self
    , request: PromptRequest
    ) -> Result<PromptResponse, crate::error::Error>
    {   if request.prompt.is_empty()
        {   error!("Refusing to send empty prompt");
            return Err(crate::error::Error::EmptyPrompt);
        }

        if let Some(provider) = &request.provider
        {   if provider.requires_license()
              && !self.transport.has_license_key()
            {   warn!(
                  "Provider {} needs a license key, none configured",
                  provider
                );
            }
        }

        debug!(
          "submit_prompt ({} chars, provider {:?})",
          request.prompt.len(),
          request.provider
        );
        trace!("Prompt request: {:?}", request);

        let response: PromptResponse = self.transport
          .post_json(&["prompt"], &request)
          .await?;

        debug!("Received response ({} chars)", response.response.len());
        Ok(response)
    }

    /// Send `prompt` with the client defaults, returning the answer text
    pub async fn prompt(&self, prompt: impl Into<String>)
      -> Result<String, crate::error::Error>
    {   self.submit_prompt(self.request(prompt))
          .await
          .map(|r| r.response)
    }

    /// Drop the backend's conversation memory for `session_id`
    pub async fn clear_memory(&self, session_id: &str)
      -> Result<(), crate::error::Error>
    {   if session_id.is_empty()
        {   return Err(crate::error::Error::InvalidInput(
              "session id must not be empty".to_string()
            ));
        }
        debug!("Clearing memory for session {}", session_id);
        let cleared: MemoryCleared = self.transport
          .delete_json(&["memory", session_id])
          .await?;
        trace!("Memory cleared: {:?}", cleared);
        Ok(())
    }

    /// Backend greeting from `GET /`, doubles as a reachability check
    pub async fn greeting(&self) -> Result<String, crate::error::Error>
    {   let greeting: ServerGreeting = self.transport
          .get_json(&[])
          .await?;
        Ok(greeting.message)
    }
}
