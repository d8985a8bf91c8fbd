//! Integration tests for the Messages API adapter against a local stub server

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use content_guardrails::classifier::anthropic::{MessagesClassifier, API_VERSION};
use content_guardrails::config::RemoteConfig;
use content_guardrails::moderator::normalize_reply;
use content_guardrails::{
    KeywordPolicy, ModerationResult, Moderator, RemoteClassifier, RemoteReply, RuleEngine, Status,
};

use crate::support::lists;

/// Serve one HTTP response, returning the raw request head and body
fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            let lower = line.to_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
            head.push_str(&line);
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        (head, String::from_utf8(request_body).unwrap())
    });

    (format!("http://{}", addr), handle)
}

fn classifier(base_url: String) -> MessagesClassifier {
    let remote = RemoteConfig {
        base_url,
        timeout_secs: 5,
        ..RemoteConfig::default()
    };
    MessagesClassifier::new("sk-test-key", &remote).unwrap()
}

fn message_body(text: &str) -> String {
    serde_json::json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}]
    })
    .to_string()
}

#[test]
fn test_request_carries_credentials_and_text() {
    let (url, server) = serve_once("200 OK", message_body(r#"{"violation": false}"#));
    let reply = classifier(url).classify("hello world").unwrap();
    let (head, body) = server.join().unwrap();

    assert_eq!(reply, RemoteReply::Text(r#"{"violation": false}"#.to_string()));
    assert!(head.starts_with("POST /v1/messages"));
    let head = head.to_lowercase();
    assert!(head.contains("x-api-key: sk-test-key"));
    assert!(head.contains(&format!("anthropic-version: {}", API_VERSION)));

    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["messages"][0]["content"], "hello world");
}

#[test]
fn test_non_success_status_is_transport_error() {
    let (url, server) = serve_once(
        "529 Site Overloaded",
        r#"{"type": "error", "error": {"type": "overloaded_error"}}"#.to_string(),
    );
    let outcome = classifier(url).classify("hello");
    server.join().unwrap();

    let result = normalize_reply(outcome);
    assert_eq!(result.status(), Some(Status::Error));
    let reason = result.reason().unwrap();
    assert!(reason.contains("529"));
    assert!(reason.contains("overloaded_error"));
}

#[test]
fn test_malformed_envelope_is_error() {
    let (url, server) = serve_once("200 OK", "not json at all".to_string());
    let outcome = classifier(url).classify("hello");
    server.join().unwrap();

    let result = normalize_reply(outcome);
    assert_eq!(result.status(), Some(Status::Error));
    assert!(result.reason().unwrap().contains("Failed to parse"));
}

#[test]
fn test_connection_refused_is_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = normalize_reply(classifier(format!("http://{}", addr)).classify("hello"));
    assert_eq!(result.status(), Some(Status::Error));
}

#[test]
fn test_end_to_end_approval() {
    let (url, server) = serve_once(
        "200 OK",
        message_body(
            r#"{"hate_speech": {"flagged": false, "confidence": 0.01, "evidence": []}, "violation": false, "reason": "polite greeting"}"#,
        ),
    );
    let engine = RuleEngine::new(KeywordPolicy::Evidence, &[]).unwrap();
    let moderator = Moderator::new(engine, lists(), Box::new(classifier(url)));

    let result = moderator.analyze("Hello, I hope you have a nice day!");
    server.join().unwrap();

    match result {
        ModerationResult::Approved { reason, categories } => {
            assert!(reason.contains("passed"));
            assert!(reason.contains("polite greeting"));
            assert_eq!(categories.len(), 1);
        }
        other => panic!("Expected approval, got {:?}", other),
    }
}
