pub mod error;
pub mod config;
pub mod request;
pub mod transport;
pub mod prompt;
pub mod integrations;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fmt;

/*

zona-client: one typed client for the Zona prompt backend.

The web UI used to talk to the backend from three copy-pasted snippets;
this crate is the single place that knows the wire contract:

  GET    /                     -> { message }
  POST   /prompt               -> { response }
  DELETE /memory/{session_id}  -> { status }
  GET    /integrations/scan    -> { detected_systems: [..] }
  POST   /integrations/add     -> { message, token }

Every call is exactly one HTTP exchange, no retry. Session keeps the
bits of UI state (systems, selection, last response) in one owned value.

*/

pub use config::ClientConfig;
pub use error::Error;
pub use integrations::IntegrationClient;
pub use prompt::PromptClient;
pub use request::{
  IntegrationAdded, IntegrationRequest, PromptRequest, PromptResponse
};
pub use session::Session;
pub use transport::Transport;

/// Backend-side prompt providers.
/// The backend owns the set; unknown names pass through as `Other`.
/// Always travels as its lowercase name on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Provider
{   /// OpenAI chat (backend default)
    OpenAi
  , /// OpenAI Codex
    Codex
  , /// Google Gemini, needs a license key
    Gemini
  , /// Google Vertex AI, needs a license key
    VertexAi
  , /// Code Llama
    CodeLlama
  , /// Anything else the backend may register
    Other(String)
}

impl Provider
{   pub fn as_str(&self) -> &str
    {   match self
        {   Provider::OpenAi => "openai"
          , Provider::Codex => "codex"
          , Provider::Gemini => "gemini"
          , Provider::VertexAi => "vertexai"
          , Provider::CodeLlama => "codellama"
          , Provider::Other(name) => name.as_str()
        }
    }

    /// Whether the backend refuses this provider without `X-License-Key`
    pub fn requires_license(&self) -> bool
    {   matches!(self, Provider::Gemini | Provider::VertexAi)
    }
}

impl From<&str> for Provider
{   fn from(name: &str) -> Self
    {   let lowered = name.trim().to_lowercase();
        match lowered.as_str()
        {   "openai" => Provider::OpenAi
          , "codex" => Provider::Codex
          , "gemini" => Provider::Gemini
          , "vertexai" => Provider::VertexAi
          , "codellama" => Provider::CodeLlama
          , _ => Provider::Other(lowered)
        }
    }
}

impl From<String> for Provider
{   fn from(name: String) -> Self
    {   Provider::from(name.as_str())
    }
}

impl From<Provider> for String
{   fn from(provider: Provider) -> Self
    {   provider.as_str().to_string()
    }
}

impl fmt::Display for Provider
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.as_str())
    }
}
