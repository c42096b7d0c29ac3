//! End-to-end tests against an in-process HTTP responder.

use std::time::Duration;

use chrono::NaiveDate;
use hts_encode::encode;
use hts_model::{Feature, NO_RESULTS_MESSAGE, RawInput, RiskOutcome, RiskTier};
use hts_scoring::{CancellationToken, ScoringClient, ScoringError, ScoringSettings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A captured HTTP request.
struct Captured {
    head: String,
    body: serde_json::Value,
}

fn encounter_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn sample_input() -> RawInput {
    serde_json::from_str(r#"[32, "159940", "1066", "M", "1066", "5555", 0, "164929"]"#).unwrap()
}

fn client_for(addr: std::net::SocketAddr) -> ScoringClient {
    let settings =
        ScoringSettings::new(format!("http://{addr}/api/hts")).with_facility_id("13939");
    ScoringClient::new(settings).expect("create client")
}

/// Reads one request (headers plus `Content-Length` body) from the stream.
async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.expect("read request");
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.expect("read body");
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = serde_json::from_slice(&buf[header_end..header_end + content_length])
        .expect("request body is JSON");
    Captured { head, body }
}

/// Serves a single canned response and returns the captured request.
async fn spawn_responder(
    status_line: &'static str,
    body: &'static str,
) -> (std::net::SocketAddr, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let captured = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        stream.shutdown().await.ok();
        captured
    });
    (addr, handle)
}

/// Accepts a connection and never answers.
async fn spawn_silent() -> (std::net::SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(60)).await;
    });
    (addr, handle)
}

#[tokio::test]
async fn posts_computed_vector_and_classifies() {
    let (addr, server) = spawn_responder(
        "200 OK",
        r#"{"result":{"predictions":{"probability(0)":0.97,"probability(1)":0.03}}}"#,
    )
    .await;
    let client = client_for(addr);
    let vector = encode(&sample_input());

    let outcome = client.assess(&vector, encounter_date()).await.unwrap();
    assert_eq!(outcome.tier(), Some(RiskTier::VeryHigh));
    assert!(outcome.message().contains("very high probability"));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /api/hts HTTP/1.1"));
    let head = captured.head.to_ascii_lowercase();
    assert!(head.contains("accept: application/json"));
    assert!(head.contains("content-type: application/json"));
    assert!(!head.contains("authorization"));

    let configs = &captured.body["modelConfigs"];
    assert_eq!(configs["encounterDate"], "2024-06-14");
    assert_eq!(configs["facilityId"], "13939");
    assert_eq!(configs["modelId"], "hts_risk");

    let values = captured.body["variableValues"].as_object().unwrap();
    assert_eq!(values.len(), Feature::ALL.len());
    assert_eq!(values["EntryPointVCT"], 1);
    assert_eq!(values["GenderMale"], 1);
    assert_eq!(values["MaritalStatusMarried"], 1);
    assert_eq!(values["KeyPopulationTypeKP"], 1);
    assert_eq!(values["AgeGroup25To34"], 1);
    assert_eq!(values["EntryPointOPD"], 0);
}

#[tokio::test]
async fn empty_body_yields_no_result() {
    let (addr, server) = spawn_responder("200 OK", "{}").await;
    let outcome = client_for(addr)
        .assess(&encode(&sample_input()), encounter_date())
        .await
        .unwrap();
    assert_eq!(outcome, RiskOutcome::NoResult);
    assert_eq!(outcome.message(), NO_RESULTS_MESSAGE);
    server.await.unwrap();
}

#[tokio::test]
async fn non_json_body_is_parse_error() {
    let (addr, server) = spawn_responder("200 OK", "<html>bad gateway</html>").await;
    let err = client_for(addr)
        .assess(&encode(&sample_input()), encounter_date())
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::Parse(_)), "{err:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn error_status_is_reported() {
    let (addr, server) =
        spawn_responder("500 Internal Server Error", r#"{"error":"model not loaded"}"#).await;
    let err = client_for(addr)
        .assess(&encode(&sample_input()), encounter_date())
        .await
        .unwrap_err();
    match err {
        ScoringError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("model not loaded"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn truncated_error_body_still_reports_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let _ = read_request(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\n\r\npartial")
            .await
            .expect("write response");
        stream.shutdown().await.ok();
    });
    let err = client_for(addr)
        .assess(&encode(&sample_input()), encounter_date())
        .await
        .unwrap_err();
    match err {
        ScoringError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.is_empty(), "{body:?}");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr)
        .assess(&encode(&sample_input()), encounter_date())
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::Transport(_)), "{err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn deadline_bounds_a_hung_endpoint() {
    let (addr, server) = spawn_silent().await;
    let deadline = Duration::from_millis(200);
    let err = client_for(addr)
        .assess_with(
            &encode(&sample_input()),
            encounter_date(),
            deadline,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::Timeout(d) if d == deadline), "{err:?}");
    server.abort();
}

#[tokio::test]
async fn cancellation_aborts_pending_call() {
    let (addr, server) = spawn_silent().await;
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = client_for(addr)
        .assess_with(
            &encode(&sample_input()),
            encounter_date(),
            Duration::from_secs(30),
            &token,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::Cancelled), "{err:?}");
    server.abort();
}

#[tokio::test]
async fn already_cancelled_token_skips_the_call() {
    let token = CancellationToken::new();
    token.cancel();
    // Nothing listens on port 9 of a fresh client; the call must not even try.
    let client = ScoringClient::new(ScoringSettings::new("http://127.0.0.1:9/score")).unwrap();
    let err = client
        .assess_with(
            &encode(&RawInput::default()),
            encounter_date(),
            Duration::from_secs(1),
            &token,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::Cancelled));
}
