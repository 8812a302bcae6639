#![cfg(feature = "provider-gemini")]

use std::sync::Arc;

use calmprovider::adapters::gemini::{GeminiHttpTransport, GeminiProvider};
use calmprovider::{
    Message, ModelProvider, ModelRequest, ProviderErrorKind, Role, SecureCredentialManager,
    StopReason, StreamEvent,
};
use futures_util::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Accepts one connection, reads the full request, then writes `status` and
/// each body part as a separate write.
async fn serve_once(
    status: &'static str,
    body_parts: Vec<Vec<u8>>,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_request(&mut socket).await;

        let head = format!(
            "HTTP/1.1 {status}\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n"
        );
        socket.write_all(head.as_bytes()).await.expect("write head");
        for part in body_parts {
            socket.write_all(&part).await.expect("write body");
            socket.flush().await.expect("flush");
            tokio::task::yield_now().await;
        }
        socket.shutdown().await.expect("shutdown");

        request
    });

    (format!("http://{addr}/v1beta"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0_u8; 4096];

    loop {
        let read = socket.read(&mut buf).await.expect("read request");
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);

        let Some(head_end) = data.windows(4).position(|window| window == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&data[..head_end]).to_string();
        let body_len = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= head_end + 4 + body_len {
            break;
        }
    }

    String::from_utf8_lossy(&data).to_string()
}

fn provider(base_url: String) -> GeminiProvider {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_gemini_api_key("AIza-local-key")
        .expect("key should set");
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client should build");
    let transport = GeminiHttpTransport::new(client).with_base_url(base_url);
    GeminiProvider::new(credentials, Arc::new(transport))
}

fn request() -> ModelRequest {
    ModelRequest::new(
        "gemini-2.0-flash-exp",
        vec![
            Message::new(Role::System, "You are CalmSpace."),
            Message::new(Role::User, "I can't sleep"),
        ],
    )
    .enable_streaming()
}

#[tokio::test]
async fn http_stream_parses_sse_body_split_across_writes() {
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Breathe \"}]}}]}\n\n",
        ": keep-alive\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"slowly 🌿\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"\"}]},\"finishReason\":\"STOP\"}],",
        "\"usageMetadata\":{\"promptTokenCount\":9,\"candidatesTokenCount\":4,\"totalTokenCount\":13},",
        "\"modelVersion\":\"gemini-2.0-flash-exp-001\"}"
    )
    .as_bytes();
    let split = body
        .windows(4)
        .position(|window| window == "🌿".as_bytes())
        .expect("emoji offset")
        + 2;
    let (base_url, server) =
        serve_once("200 OK", vec![body[..split].to_vec(), body[split..].to_vec()]).await;

    let provider = provider(base_url);
    let events = provider
        .stream(request())
        .await
        .expect("stream should start")
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("events should parse");

    assert_eq!(events.len(), 3);
    assert_eq!(events[0], StreamEvent::TextDelta("Breathe ".to_string()));
    assert_eq!(events[1], StreamEvent::TextDelta("slowly 🌿".to_string()));
    let StreamEvent::ResponseComplete(response) = &events[2] else {
        panic!("expected response completion, got {:?}", events[2]);
    };
    assert_eq!(response.text(), "Breathe slowly 🌿");
    assert_eq!(response.model, "gemini-2.0-flash-exp-001");
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.total_tokens, 13);

    let seen = server.await.expect("server task").to_ascii_lowercase();
    assert!(seen.starts_with(
        "post /v1beta/models/gemini-2.0-flash-exp:streamgeneratecontent?alt=sse http/1.1"
    ));
    assert!(seen.contains("x-goog-api-key: aiza-local-key"));
    assert!(seen.contains("\"systeminstruction\""));
}

#[tokio::test]
async fn http_error_status_is_classified_before_streaming() {
    let body = br#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
    let (base_url, server) = serve_once("429 Too Many Requests", vec![body.to_vec()]).await;

    let provider = provider(base_url);
    let error = match provider.stream(request()).await {
        Ok(_) => panic!("rate limited stream must fail to start"),
        Err(error) => error,
    };

    assert_eq!(error.kind, ProviderErrorKind::RateLimited);
    assert_eq!(error.message, "Quota exceeded");
    server.await.expect("server task");
}
