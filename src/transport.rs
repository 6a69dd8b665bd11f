//! HTTP plumbing shared by the prompt and integration clients

use std::fmt;

use log::{debug, error, trace};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const LICENSE_KEY_HEADER: &str = "X-License-Key";

/// One backend root plus the headers every call carries.
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct Transport
{   http_client: reqwest::Client
  , base_url: Url
  , api_key: Option<String>
  , license_key: Option<String>
}

impl fmt::Debug for Transport
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("Transport")
          .field("base_url", &self.base_url.as_str())
          .field("api_key", &self.api_key.is_some())
          .field("license_key", &self.license_key.is_some())
          .finish()
    }
}

impl Transport
{   pub fn new(config: &crate::config::ClientConfig)
      -> Result<Self, crate::error::Error>
    {   config.validate()?;
        let base_url = config.parsed_base_url()?;
        debug!(
          "Creating transport for {} (timeout {}s)",
          base_url, config.timeout_secs
        );

        let http_client = reqwest::Client::builder()
          .timeout(config.timeout())
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;

        Ok(Transport
        {   http_client
          , base_url
          , api_key: config.api_key.clone()
          , license_key: config.license_key.clone()
        })
    }

    pub fn base_url(&self) -> &Url
    {   &self.base_url
    }

    pub fn has_license_key(&self) -> bool
    {   self.license_key.is_some()
    }

    /// Append path segments to the base URL.
    /// Each segment is percent-encoded, so `/` inside one stays literal.
    pub fn endpoint(&self, segments: &[&str])
      -> Result<Url, crate::error::Error>
    {   let mut url = self.base_url.clone();
        if segments.is_empty()
        {   return Ok(url);
        }
        url.path_segments_mut()
          .map_err(|_| {
            crate::error::Error::InvalidConfiguration(
              format!("base URL cannot take paths: {}", self.base_url)
            )
          })?
          .pop_if_empty()
          .extend(segments);
        Ok(url)
    }

    pub async fn get_json<R>(&self, segments: &[&str])
      -> Result<R, crate::error::Error>
    where
      R: DeserializeOwned
    {   let text = self.send(Method::GET, segments, None::<&()>).await?;
        decode(&text)
    }

    pub async fn post_json<B, R>(&self, segments: &[&str], body: &B)
      -> Result<R, crate::error::Error>
    where
      B: Serialize + ?Sized
    , R: DeserializeOwned
    {   let text = self.send(Method::POST, segments, Some(body)).await?;
        decode(&text)
    }

    /// POST and hand back the raw body of a successful response
    pub async fn post_text<B>(&self, segments: &[&str], body: &B)
      -> Result<String, crate::error::Error>
    where
      B: Serialize + ?Sized
    {   self.send(Method::POST, segments, Some(body)).await
    }

    pub async fn delete_json<R>(&self, segments: &[&str])
      -> Result<R, crate::error::Error>
    where
      R: DeserializeOwned
    {   let text = self.send(Method::DELETE, segments, None::<&()>).await?;
        decode(&text)
    }

    /// Exactly one request. Non-2xx statuses become `Error::Http`.
    async fn send<B>(
      &self
    , method: Method
    , segments: &[&str]
    , body: Option<&B>
    ) -> Result<String, crate::error::Error>
    where
      B: Serialize + ?Sized
    {   let url = self.endpoint(segments)?;
        debug!("{} {}", method, url.path());

        let mut request = self.http_client.request(method.clone(), url);
        if let Some(key) = &self.api_key
        {   request = request.header(API_KEY_HEADER, key);
        }
        if let Some(key) = &self.license_key
        {   request = request.header(LICENSE_KEY_HEADER, key);
        }
        if let Some(body) = body
        {   request = request
              .header(CONTENT_TYPE, "application/json")
              .json(body);
        }

        let response = request
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error on {} {:?}: {}", method, segments, e);
            crate::error::Error::from_reqwest(&e)
          })?;

        let status = response.status();
        trace!("Response status: {}", status);

        let text = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          crate::error::Error::from_reqwest(&e)
        })?;
        trace!("Response body: {}", text);

        if !status.is_success()
        {   let message = error_message(status, &text);
            error!("Backend error {}: {}", status, message);
            return Err(crate::error::Error::Http
            {   status: status.as_u16()
              , message
            });
        }

        Ok(text)
    }
}

fn decode<R>(text: &str) -> Result<R, crate::error::Error>
where
  R: DeserializeOwned
{   serde_json::from_str(text).map_err(|e| {
      error!("Parse error: {}", e);
      crate::error::Error::Decode(e.to_string())
    })
}

/// Human-readable message for a failed response.
/// Prefers a `{"detail": ...}` body, then the raw text, then the reason.
pub fn error_message(status: StatusCode, body: &str) -> String
{   if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
    {   match value.get("detail")
        {   Some(serde_json::Value::String(detail)) => {
              return detail.clone();
            }
          , Some(serde_json::Value::Null) | None => {}
          , Some(other) => {
              return other.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty()
    {   return trimmed.to_string();
    }

    status.canonical_reason()
      .map(str::to_string)
      .unwrap_or_else(|| status.to_string())
}
