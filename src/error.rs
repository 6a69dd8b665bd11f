use std::fmt;

/// Error type for every Zona client operation.
/// Implements Clone so callers can keep the last failure around
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Request could not be sent (connect, DNS, broken pipe)
    Network(String)
  , /// The configured request timeout elapsed
    Timeout
  , /// Backend answered with a non-success status
    Http
    {   status: u16
      , message: String
    }
  , /// Response body was not JSON or lacked the expected field
    Decode(String)
  , /// Prompt was empty, rejected before any request
    EmptyPrompt
  , /// Caller input rejected locally
    InvalidInput(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
}

impl Error
{   /// Map a reqwest failure onto the client's error kinds
    pub fn from_reqwest(e: &reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else if e.is_decode()
        {   Error::Decode(e.to_string())
        } else
        {   Error::Network(e.to_string())
        }
    }

    /// True for failures where no usable response arrived
    pub fn is_network(&self) -> bool
    {   matches!(self, Error::Network(_) | Error::Timeout)
    }

    /// True for errors raised before anything was sent
    pub fn is_local(&self) -> bool
    {   matches!(
          self,
          Error::EmptyPrompt
            | Error::InvalidInput(_)
            | Error::InvalidConfiguration(_)
        )
    }

    /// HTTP status code, if the backend answered
    pub fn status(&self) -> Option<u16>
    {   match self
        {   Error::Http { status, .. } => Some(*status)
          , _ => None
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Network(msg) => {
              write!(f, "Network error: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Http { status, message } => {
              write!(f, "HTTP {}: {}", status, message)
            }
          , Error::Decode(msg) => {
              write!(f, "Could not decode response: {}", msg)
            }
          , Error::EmptyPrompt => {
              write!(f, "Prompt must not be empty")
            }
          , Error::InvalidInput(msg) => {
              write!(f, "Invalid input: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
