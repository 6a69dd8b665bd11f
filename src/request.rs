//! Wire types for the Zona backend

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /prompt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest
{   /// The prompt text, forwarded verbatim
    pub prompt: String
  , /// Opaque session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>
  , /// Provider to dispatch to; backend default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<crate::Provider>
  , /// Ask the backend to obfuscate its answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscate_output: Option<bool>
}

impl PromptRequest
{   pub fn new(prompt: impl Into<String>) -> Self
    {   PromptRequest
        {   prompt: prompt.into()
          , session_id: None
          , provider: None
          , obfuscate_output: None
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self
    {   self.session_id = Some(session_id.into());
        self
    }

    pub fn with_provider(mut self, provider: crate::Provider) -> Self
    {   self.provider = Some(provider);
        self
    }

    pub fn with_obfuscated_output(mut self, obfuscate: bool) -> Self
    {   self.obfuscate_output = Some(obfuscate);
        self
    }
}

/// Body returned by `POST /prompt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse
{   pub response: String
}

/// Body of `POST /integrations/add`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationRequest
{   pub system: String
  , pub api_key: String
  , pub base_url: String
}

impl IntegrationRequest
{   /// Base URL is always derived from the system name
    pub fn new(
      system: impl Into<String>
    , api_key: impl Into<String>
    ) -> Self
    {   let system = system.into();
        let base_url = integration_base_url(&system);
        IntegrationRequest
        {   system
          , api_key: api_key.into()
          , base_url
        }
    }
}

impl fmt::Debug for IntegrationRequest
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("IntegrationRequest")
          .field("system", &self.system)
          .field("api_key", &"<redacted>")
          .field("base_url", &self.base_url)
          .finish()
    }
}

/// `https://{system}.com`, byte for byte what the backend expects
pub fn integration_base_url(system: &str) -> String
{   format!("https://{}.com", system)
}

/// Success body of `POST /integrations/add`.
/// The shape is backend-defined, every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationAdded
{   #[serde(default)]
    pub message: Option<String>
  , #[serde(default)]
    pub token: Option<serde_json::Value>
}

/// Body returned by `GET /integrations/scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse
{   pub detected_systems: Vec<String>
}

/// Body returned by `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerGreeting
{   pub message: String
}

/// Body returned by `DELETE /memory/{session_id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryCleared
{   #[serde(default)]
    pub status: Option<String>
}
