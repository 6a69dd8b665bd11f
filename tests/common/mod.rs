#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;

/// What the mock backend saw
#[derive(Debug, Clone)]
pub struct Recorded
{   pub method: String
  , pub path: String
  , pub headers: HeaderMap
  , pub body: Option<serde_json::Value>
}

impl Recorded
{   pub fn header(&self, name: &str) -> Option<String>
    {   self.headers.get(name)
          .and_then(|v| v.to_str().ok())
          .map(str::to_string)
    }
}

#[derive(Debug, Clone)]
struct Reply
{   status: u16
  , body: String
  , delay: Option<Duration>
}

#[derive(Default)]
struct Inner
{   replies: HashMap<(String, String), Reply>
  , requests: Vec<Recorded>
}

/// In-process stand-in for the Zona backend.
/// Unscripted routes answer 404 `{"detail": "Not Found"}`.
#[derive(Clone, Default)]
pub struct MockBackend
{   inner: Arc<Mutex<Inner>>
}

impl MockBackend
{   pub fn new() -> Self
    {   MockBackend::default()
    }

    pub fn reply(
      &self
    , method: &str
    , path: &str
    , status: u16
    , body: impl Into<String>
    ) -> &Self
    {   self.script(method, path, status, body.into(), None)
    }

    pub fn reply_slowly(
      &self
    , method: &str
    , path: &str
    , delay: Duration
    , body: impl Into<String>
    ) -> &Self
    {   self.script(method, path, 200, body.into(), Some(delay))
    }

    fn script(
      &self
    , method: &str
    , path: &str
    , status: u16
    , body: String
    , delay: Option<Duration>
    ) -> &Self
    {   self.inner.lock().unwrap().replies.insert(
          (method.to_string(), path.to_string()),
          Reply { status, body, delay }
        );
        self
    }

    pub fn requests(&self) -> Vec<Recorded>
    {   self.inner.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded>
    {   self.requests()
          .into_iter()
          .filter(|r| r.path == path)
          .collect()
    }

    /// Bind an ephemeral port and return the base URL
    pub async fn serve(&self) -> String
    {   let app = Router::new()
          .fallback(handle)
          .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
          .await
          .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
          let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }
}

async fn handle(
  State(backend): State<MockBackend>
, method: Method
, uri: Uri
, headers: HeaderMap
, body: Bytes
) -> impl IntoResponse
{   let reply = {
      let mut inner = backend.inner.lock().unwrap();
      inner.requests.push(Recorded
      {   method: method.to_string()
        , path: uri.path().to_string()
        , headers
        , body: serde_json::from_slice(&body).ok()
      });
      inner.replies
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned()
    };

    let reply = reply.unwrap_or(Reply
    {   status: 404
      , body: r#"{"detail": "Not Found"}"#.to_string()
      , delay: None
    });

    if let Some(delay) = reply.delay
    {   tokio::time::sleep(delay).await;
    }

    (
      StatusCode::from_u16(reply.status).unwrap(),
      [(header::CONTENT_TYPE, "application/json")],
      reply.body,
    )
}

/// Config pointing at `base_url` with a short timeout
pub fn config(base_url: &str) -> zona_client::ClientConfig
{   let mut config = zona_client::ClientConfig::new(base_url);
    config.timeout_secs = 5;
    config
}

/// A base URL nothing listens on
pub async fn dead_url() -> String
{   let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
