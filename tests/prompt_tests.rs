mod common;

use std::time::Duration;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use zona_client::{Error, PromptClient, PromptRequest, Provider};

use common::MockBackend;

#[tokio::test]
async fn test_prompt_sends_one_post()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, r#"{"response": "mocked"}"#);
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let answer = assert_ok!(
      client.submit_prompt(PromptRequest::new("Hello Zona!")).await
    );
    assert_eq!(answer.response, "mocked");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/prompt");
    assert_eq!(requests[0].body, Some(json!({ "prompt": "Hello Zona!" })));
    assert_eq!(
      requests[0].header("content-type").as_deref(),
      Some("application/json")
    );
}

#[tokio::test]
async fn test_prompt_carries_session_and_provider()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, r#"{"response": "ok"}"#);
    let base = backend.serve().await;

    let mut config = common::config(&base);
    config.session_id = Some("abc".to_string());
    config.provider = Some(Provider::Codex);
    let client = PromptClient::new(&config).unwrap();

    assert_ok!(client.prompt("hi").await);

    let body = backend.requests()[0].body.clone();
    assert_eq!(
      body,
      Some(json!({ "prompt": "hi", "session_id": "abc", "provider": "codex" }))
    );
}

#[tokio::test]
async fn test_response_text_is_untouched()
{   let backend = MockBackend::new();
    backend.reply(
      "POST", "/prompt", 200,
      r#"{"response": "  spaced\nout ç "}"#
    );
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let answer = assert_ok!(client.prompt("x").await);
    assert_eq!(answer, "  spaced\nout ç ");
}

#[tokio::test]
async fn test_empty_prompt_never_reaches_backend()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, r#"{"response": "nope"}"#);
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let err = assert_err!(client.prompt("").await);
    assert_eq!(err, Error::EmptyPrompt);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_whitespace_prompt_is_forwarded()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, r#"{"response": "?"}"#);
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    assert_ok!(client.prompt("   ").await);
    assert_eq!(
      backend.requests()[0].body,
      Some(json!({ "prompt": "   " }))
    );
}

#[tokio::test]
async fn test_http_error_uses_detail()
{   let backend = MockBackend::new();
    backend.reply(
      "POST", "/prompt", 400,
      r#"{"detail": "Unknown provider: nope"}"#
    );
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let err = assert_err!(client.prompt("hi").await);
    assert_eq!(
      err,
      Error::Http
      {   status: 400
        , message: "Unknown provider: nope".to_string()
      }
    );
}

#[tokio::test]
async fn test_missing_field_is_decode_error()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, r#"{"answer": "x"}"#);
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let err = assert_err!(client.prompt("hi").await);
    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_non_json_is_decode_error()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, "<html>oops</html>");
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let err = assert_err!(client.prompt("hi").await);
    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error()
{   let base = common::dead_url().await;
    let client = PromptClient::new(&common::config(&base)).unwrap();
    let err = assert_err!(client.prompt("hi").await);
    assert!(matches!(err, Error::Network(_)), "got {:?}", err);
    assert!(err.is_network());
}

#[tokio::test]
async fn test_slow_backend_times_out()
{   let backend = MockBackend::new();
    backend.reply_slowly(
      "POST", "/prompt",
      Duration::from_secs(3),
      r#"{"response": "late"}"#
    );
    let base = backend.serve().await;

    let mut config = common::config(&base);
    config.timeout_secs = 1;
    let client = PromptClient::new(&config).unwrap();

    let err = assert_err!(client.prompt("hi").await);
    assert_eq!(err, Error::Timeout);
}

#[tokio::test]
async fn test_keys_sent_only_when_configured()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, r#"{"response": "ok"}"#);
    let base = backend.serve().await;

    let bare = PromptClient::new(&common::config(&base)).unwrap();
    assert_ok!(bare.prompt("one").await);

    let mut config = common::config(&base);
    config.api_key = Some("test-key".to_string());
    config.license_key = Some("lic-1".to_string());
    let keyed = PromptClient::new(&config).unwrap();
    assert_ok!(keyed.prompt("two").await);

    let requests = backend.requests();
    assert_eq!(requests[0].header("x-api-key"), None);
    assert_eq!(requests[0].header("x-license-key"), None);
    assert_eq!(requests[1].header("x-api-key").as_deref(), Some("test-key"));
    assert_eq!(requests[1].header("x-license-key").as_deref(), Some("lic-1"));
}

#[tokio::test]
async fn test_obfuscate_flag_passes_through()
{   let backend = MockBackend::new();
    backend.reply("POST", "/prompt", 200, r#"{"response": "olleH"}"#);
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let request = client.request("Hello").with_obfuscated_output(true);
    let answer = assert_ok!(client.submit_prompt(request).await);
    assert_eq!(answer.response, "olleH");
    assert_eq!(
      backend.requests()[0].body,
      Some(json!({ "prompt": "Hello", "obfuscate_output": true }))
    );
}

#[tokio::test]
async fn test_clear_memory()
{   let backend = MockBackend::new();
    backend.reply("DELETE", "/memory/s-1", 200, r#"{"status": "deleted"}"#);
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    assert_ok!(client.clear_memory("s-1").await);

    let err = assert_err!(client.clear_memory("missing").await);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "HTTP 404: Not Found");

    let err = assert_err!(client.clear_memory("").await);
    assert!(err.is_local());
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn test_greeting()
{   let backend = MockBackend::new();
    backend.reply("GET", "/", 200, r#"{"message": "!anoZ ,olleH"}"#);
    let base = backend.serve().await;

    let client = PromptClient::new(&common::config(&base)).unwrap();
    let message = assert_ok!(client.greeting().await);
    assert_eq!(message, "!anoZ ,olleH");
}
