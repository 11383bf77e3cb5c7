//! HttpEndpoint against a local server speaking just enough HTTP/1.1
#![cfg(feature = "http")]


use carwise_core::catalog::{CatalogEndpoint, HttpEndpoint};
use carwise_core::{CatalogClient, CatalogConfig, CatalogError, CatalogSource};
use std::net::SocketAddr;
use test_helpers::{init_test_logging, live_body};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned response per accepted connection, in order
async fn serve(responses: Vec<(u16, &'static str, String)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for (status, content_type, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let response = format!(
                "HTTP/1.1 {status} Status\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    addr
}

#[tokio::test]
async fn test_http_endpoint_reports_status_and_body() {
    init_test_logging();

    let body = live_body(&[("Hyundai", "Tucson", 2024)]);
    let addr = serve(vec![(200, "application/json", body.clone())]).await;

    let client = HttpEndpoint::build_client("carwise-test").unwrap();
    let endpoint = HttpEndpoint::new(client, format!("http://{addr}/vehicles"));
    assert_eq!(endpoint.name(), format!("http://{addr}/vehicles"));

    let fetched = endpoint.fetch().await.unwrap();
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.text, body);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = HttpEndpoint::build_client("carwise-test").unwrap();
    let endpoint = HttpEndpoint::new(client, format!("http://{addr}/vehicles"));

    let err = endpoint.fetch().await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)));
}

#[tokio::test]
async fn test_client_from_config_falls_back_over_http() {
    init_test_logging();

    let error_page = "<!DOCTYPE html><html><body>Bad gateway</body></html>".to_string();
    let primary = serve(vec![(404, "text/plain", "not found".to_string())]).await;
    let mirror = serve(vec![(200, "text/html", error_page)]).await;
    let good = serve(vec![(
        200,
        "application/json",
        live_body(&[("Chevrolet", "Tahoe", 2023), ("Chevrolet", "Malibu", 2022)]),
    )])
    .await;

    let config = CatalogConfig {
        primary_url: format!("http://{primary}/v1/vehicles"),
        fallback_urls: vec![
            format!("http://{mirror}/v1/vehicles"),
            format!("http://{good}/vehicles.json"),
        ],
        ..CatalogConfig::default()
    };
    config.validate().unwrap();

    let client = CatalogClient::from_config(&config).unwrap();
    assert_eq!(client.endpoint_count(), 3);

    let snapshot = client.load_catalog().await;
    assert!(!snapshot.degraded);
    assert_eq!(
        snapshot.source,
        CatalogSource::Endpoint(format!("http://{good}/vehicles.json"))
    );
    assert_eq!(snapshot.records.len(), 2);
    assert_eq!(snapshot.records[1].model_name, "Malibu");
}
