//! End-to-end lookups through the real server and reqwest upstream client.

use reqwest::{header, Method, StatusCode};
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_json_lookup_forwards_parameters() {
    let (provider, seen) = common::start_mock_provider(200, r#"{"WhoisRecord":{"domainName":"example.com"}}"#).await;
    let service = common::start_service(provider).await;

    let res = common::client()
        .get(service.url("/?domain=example.com&format=json"))
        .send()
        .await
        .expect("service unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["WhoisRecord"]["domainName"], "example.com");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec!["/whoisserver/WhoisService?apiKey=integration-key&domainName=example.com&outputFormat=json".to_string()]
    );

    service.stop();
}

#[tokio::test]
async fn test_xml_lookup_is_verbatim() {
    let (provider, _) = common::start_mock_provider(200, "<a>1</a>").await;
    let service = common::start_service(provider).await;

    let res = common::client()
        .get(service.url("/lookup?domain=example.org&format=xml"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/xml");
    assert_eq!(res.text().await.unwrap(), "<a>1</a>");

    service.stop();
}

#[tokio::test]
async fn test_provider_error_status_is_400() {
    let (provider, _) = common::start_mock_provider(401, r#"{"ErrorMessage":"bad key"}"#).await;
    let service = common::start_service(provider).await;

    let res = common::client()
        .get(service.url("/?domain=example.com"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], 400);
    assert_eq!(body["msg"], "unable to retrieve WHOIS info for domain");
    assert!(body["timestamp"].as_i64().unwrap() > 0);

    service.stop();
}

#[tokio::test]
async fn test_unreachable_provider_is_500() {
    let provider = common::closed_port().await;
    let service = common::start_service(provider).await;

    let res = common::client()
        .get(service.url("/?domain=example.com"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], 500);
    let msg = body["msg"].as_str().unwrap();
    assert!(msg.starts_with("Error: "), "unexpected msg {}", msg);
    assert!(msg.len() > "Error: ".len());

    service.stop();
}

#[tokio::test]
async fn test_invalid_domain_never_reaches_provider() {
    let (provider, seen) = common::start_mock_provider(200, "{}").await;
    let service = common::start_service(provider).await;

    let res = common::client()
        .get(service.url("/?domain=foo"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "domain parameter invalid");
    assert!(seen.lock().unwrap().is_empty());

    service.stop();
}

#[tokio::test]
async fn test_preflight() {
    let (provider, seen) = common::start_mock_provider(200, "{}").await;
    let service = common::start_service(provider).await;

    let res = common::client()
        .request(Method::OPTIONS, service.url("/?domain=example.com"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers().clone();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, PUT, DELETE, OPTIONS");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    assert!(res.text().await.unwrap().is_empty());
    assert!(seen.lock().unwrap().is_empty());

    service.stop();
}
