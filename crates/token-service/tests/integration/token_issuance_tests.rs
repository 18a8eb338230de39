//! End-to-end token issuance against a real RS256 key.

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use token_test_utils::{
    bogus_key_material_base64, decode_header_json, decode_payload_json,
    escaped_key_material_base64, test_config, test_key_material_base64, verify_with_test_key,
    CountingSigner, TestTokenServer,
};

async fn post_token(
    server: &TestTokenServer,
    body: Value,
) -> Result<(StatusCode, Value), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(server.token_url())
        .json(&body)
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await?;
    Ok((status, body))
}

fn token_of(body: &Value) -> Result<String, anyhow::Error> {
    body["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("response has no token: {body}"))
}

#[tokio::test]
async fn test_issue_with_defaults() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config(Some(test_key_material_base64()))).await?;

    let response = reqwest::Client::new()
        .post(server.token_url())
        .json(&json!({"cozeAppId": "app123", "keyId": "key456"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let body: Value = response.json().await?;
    assert_eq!(body["message"], "JWT generated successfully");

    let token = token_of(&body)?;
    assert_eq!(token.split('.').count(), 3, "token should have three segments");

    let payload = decode_payload_json(&token)?;
    assert_eq!(payload["aud"], "api.coze.cn");
    assert_eq!(payload["iss"], "app123");
    let iat = payload["iat"].as_i64().unwrap_or_default();
    let exp = payload["exp"].as_i64().unwrap_or_default();
    assert_eq!(exp - iat, 600);

    let header = decode_header_json(&token)?;
    assert_eq!(header["alg"], "RS256");
    assert_eq!(header["typ"], "JWT");
    assert_eq!(header["kid"], "key456");

    Ok(())
}

#[tokio::test]
async fn test_issued_token_verifies_with_public_key() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config(Some(test_key_material_base64()))).await?;

    let (status, body) = post_token(
        &server,
        json!({"cozeAppId": "app123", "keyId": "key456", "audience": "api.coze.com"}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let claims = verify_with_test_key(&token_of(&body)?, "api.coze.com")?;
    assert_eq!(claims.iss, "app123");
    assert_eq!(claims.aud, "api.coze.com");

    Ok(())
}

#[tokio::test]
async fn test_custom_expiry() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config(Some(test_key_material_base64()))).await?;

    let (status, body) = post_token(
        &server,
        json!({"cozeAppId": "app123", "keyId": "key456", "expiresIn": 30}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let payload = decode_payload_json(&token_of(&body)?)?;
    let iat = payload["iat"].as_i64().unwrap_or_default();
    let exp = payload["exp"].as_i64().unwrap_or_default();
    assert_eq!(exp - iat, 30);

    Ok(())
}

#[tokio::test]
async fn test_successive_tokens_are_distinct() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config(Some(test_key_material_base64()))).await?;
    let request = json!({"cozeAppId": "app123", "keyId": "key456"});

    let (_, first) = post_token(&server, request.clone()).await?;
    let (_, second) = post_token(&server, request).await?;

    let first = token_of(&first)?;
    let second = token_of(&second)?;

    assert_ne!(
        decode_payload_json(&first)?["jti"],
        decode_payload_json(&second)?["jti"]
    );
    assert_ne!(first.rsplit('.').next(), second.rsplit('.').next());

    Ok(())
}

#[tokio::test]
async fn test_escaped_newline_key_secret_is_accepted() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config(Some(escaped_key_material_base64()))).await?;

    let (status, body) =
        post_token(&server, json!({"cozeAppId": "app123", "keyId": "key456"})).await?;

    assert_eq!(status, StatusCode::OK);
    verify_with_test_key(&token_of(&body)?, "api.coze.cn")?;

    Ok(())
}

#[tokio::test]
async fn test_invalid_key_secret_returns_generic_500() -> Result<(), anyhow::Error> {
    let signer = Arc::new(CountingSigner::new());
    let server = TestTokenServer::spawn_with_signer(
        test_config(Some(bogus_key_material_base64())),
        signer.clone(),
    )
    .await?;

    let (status, body) =
        post_token(&server, json!({"cozeAppId": "app123", "keyId": "key456"})).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to generate JWT");
    assert!(body.get("token").is_none());

    let raw = body.to_string();
    assert!(!raw.contains("PRIVATE KEY"));
    assert!(!raw.contains("not a key"));
    assert_eq!(signer.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_undecodable_key_secret_returns_500_without_signing() -> Result<(), anyhow::Error> {
    let signer = Arc::new(CountingSigner::new());
    let server = TestTokenServer::spawn_with_signer(
        test_config(Some("%%% definitely not base64 %%%".to_string())),
        signer.clone(),
    )
    .await?;

    let (status, body) =
        post_token(&server, json!({"cozeAppId": "app123", "keyId": "key456"})).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to generate JWT");
    assert_eq!(signer.calls(), 0);

    Ok(())
}
