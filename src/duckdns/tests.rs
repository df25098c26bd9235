//! Client tests with HTTP mocking.

use super::{DuckDnsApi, DuckDnsClient, Outcome, TxtResolver, USER_AGENT};
use crate::config::ClientConfig;
use crate::error::{DuckDnsError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORD: &str = "docusign=1b0a6754-49b1-4db5-8540-d2c12664b289";

fn config() -> ClientConfig {
    ClientConfig {
        token: "example-token".to_string(),
        domains: vec!["example".to_string()],
        ..ClientConfig::default()
    }
}

fn client(config: &ClientConfig, server: &MockServer) -> DuckDnsClient {
    DuckDnsClient::with_base_url(config, server.uri()).unwrap()
}

struct StaticResolver(HashMap<String, Vec<String>>);

#[async_trait]
impl TxtResolver for StaticResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.0.get(name).cloned().unwrap_or_default())
    }
}

struct BrokenResolver;

#[async_trait]
impl TxtResolver for BrokenResolver {
    async fn lookup_txt(&self, _name: &str) -> Result<Vec<String>> {
        Err(DuckDnsError::Dns("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_update_ip_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .and(header("User-Agent", USER_AGENT))
        .and(query_param("domains", "example"))
        .and(query_param("token", "example-token"))
        .and(query_param("ip", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&config(), &mock_server).update_ip().await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.body(), "OK");
}

#[tokio::test]
async fn test_update_ip_verbose() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .and(query_param("ip", ""))
        .and(query_param("verbose", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("OK\n10.10.10.253\n\nUPDATED"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config();
    config.verbose = true;
    let response = client(&config, &mock_server).update_ip().await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.summary(), "OK, 10.10.10.253, UPDATED");
}

#[tokio::test]
async fn test_update_ip_with_values() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .and(query_param("domains", "example,other"))
        .and(query_param("ip", "10.10.10.253"))
        .and(query_param("ipv6", "0:0:0:0:0:ffff:a0a:afd"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config();
    config.domains.push("other".to_string());
    let response = client(&config, &mock_server)
        .update_ip_with_values("10.10.10.253", "0:0:0:0:0:ffff:a0a:afd")
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test]
async fn test_clear_ip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .and(query_param("clear", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&config(), &mock_server).clear_ip().await.unwrap();
    assert!(response.is_success());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests[0].url.query_pairs().any(|(key, _)| key == "ip"));
}

#[tokio::test]
async fn test_update_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .and(query_param("token", "example-token"))
        .and(query_param("txt", RECORD))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&config(), &mock_server)
        .update_record(RECORD)
        .await
        .unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_clear_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .and(query_param("txt", RECORD))
        .and(query_param("clear", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&config(), &mock_server)
        .clear_record(RECORD)
        .await
        .unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_update_ip_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .respond_with(ResponseTemplate::new(200).set_body_string("KO"))
        .mount(&mock_server)
        .await;

    let response = client(&config(), &mock_server).update_ip().await.unwrap();
    assert_eq!(response.outcome(), Outcome::Rejected);
}

#[tokio::test]
async fn test_server_error_is_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/update"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let response = client(&config(), &mock_server).update_ip().await.unwrap();
    assert_eq!(response.outcome(), Outcome::Failed);
    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = config();
    let client = DuckDnsClient::with_base_url(&config, "http://127.0.0.1:1".to_string()).unwrap();

    let result = client.update_ip().await;
    assert!(matches!(result, Err(DuckDnsError::Network(_))));
}

#[tokio::test]
async fn test_new_rejects_invalid_config() {
    let mut no_token = config();
    no_token.token = String::new();
    assert!(DuckDnsClient::new(&no_token).is_err());

    let mut no_domains = config();
    no_domains.domains.clear();
    assert!(DuckDnsClient::new(&no_domains).is_err());
}

#[tokio::test]
async fn test_get_record_first_value() {
    let records = HashMap::from([(
        "example.duckdns.org".to_string(),
        vec![RECORD.to_string(), "second".to_string()],
    )]);

    let client = DuckDnsClient::new(&config())
        .unwrap()
        .with_resolver(StaticResolver(records));

    assert_eq!(client.get_record().await.unwrap(), RECORD);
}

#[tokio::test]
async fn test_get_record_missing_is_empty() {
    let client = DuckDnsClient::new(&config())
        .unwrap()
        .with_resolver(StaticResolver(HashMap::new()));

    assert_eq!(client.get_record().await.unwrap(), "");
}

#[tokio::test]
async fn test_get_record_lookup_failure() {
    let client = DuckDnsClient::new(&config())
        .unwrap()
        .with_resolver(BrokenResolver);

    assert!(matches!(client.get_record().await, Err(DuckDnsError::Dns(_))));
}
