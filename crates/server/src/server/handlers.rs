//! Axum request handlers for all service endpoints.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse,
};
use common::ServiceError;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::crypto::{load_private_key, load_public_key, KeyError, KeyKind};
use crate::document::{decrypt_fields, encrypt_fields, parse_field_paths, TransformError};

/// Failure after validation: key loading or the per-field transform.
#[derive(Debug, Error)]
enum OperationError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// `POST /encrypt` — encrypt the listed fields of `payload` under `llavePublica`.
pub async fn encrypt(body: Result<Json<EncryptRequest>, JsonRejection>) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return reject_body(rejection),
    };
    let (payload, key, campos) = match required(&req.payload, &req.llave_publica, &req.campos) {
        Ok(fields) => fields,
        Err(e) => return error_response(e),
    };

    match encrypt_payload(payload, key, campos) {
        Ok(encrypted_payload) => {
            (StatusCode::OK, Json(EncryptResponse { encrypted_payload })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "encryption failed");
            error_response(ServiceError::EncryptionFailure(e.to_string()))
        }
    }
}

/// `POST /decrypt` — decrypt the listed fields of `payload` under `llavePrivada`.
pub async fn decrypt(body: Result<Json<DecryptRequest>, JsonRejection>) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return reject_body(rejection),
    };
    let (payload, key, campos) = match required(&req.payload, &req.llave_privada, &req.campos) {
        Ok(fields) => fields,
        Err(e) => return error_response(e),
    };

    match decrypt_payload(payload, key, campos) {
        Ok(decrypted_payload) => {
            (StatusCode::OK, Json(DecryptResponse { decrypted_payload })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "decryption failed");
            error_response(ServiceError::DecryptionFailure(e.to_string()))
        }
    }
}

/// `GET /health` — liveness check.
pub async fn health() -> impl IntoResponse {
    let body = HealthResponse {
        status: "ok".into(),
    };
    (StatusCode::OK, Json(body))
}

/// Catch-all 404 handler.
pub async fn not_found() -> Response {
    error_response(ServiceError::NotFound)
}

fn encrypt_payload(payload: &Value, key: &Value, campos: &[Value]) -> Result<Value, OperationError> {
    let key = load_public_key(key_text(KeyKind::Public, key)?)?;
    let paths = parse_field_paths(campos)?;
    Ok(encrypt_fields(payload, &key, &paths)?)
}

fn decrypt_payload(payload: &Value, key: &Value, campos: &[Value]) -> Result<Value, OperationError> {
    let key = load_private_key(key_text(KeyKind::Private, key)?)?;
    let paths = parse_field_paths(campos)?;
    Ok(decrypt_fields(payload, &key, &paths)?)
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Check the three required request fields and borrow them in usable form.
///
/// A field is missing when it is absent or falsy (`null`, `false`, `0`, `""`),
/// and `campos` must be an array. A present key of the wrong type is not a
/// validation error; it fails later, at key loading.
fn required<'a>(
    payload: &'a Value,
    key: &'a Value,
    campos: &'a Value,
) -> Result<(&'a Value, &'a Value, &'a [Value]), ServiceError> {
    if !is_present(payload) || !is_present(key) {
        return Err(ServiceError::MissingFields);
    }
    let campos = campos.as_array().ok_or(ServiceError::MissingFields)?;
    Ok((payload, key, campos))
}

fn key_text(kind: KeyKind, key: &Value) -> Result<&str, KeyError> {
    key.as_str().ok_or(KeyError::NotAString { kind })
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        _ => true,
    }
}

/// Map a body extraction failure to a response.
///
/// Oversized or unreadable bodies keep axum's status; anything else (bad JSON,
/// wrong content type, non-object body) is a missing-fields error.
fn reject_body(rejection: JsonRejection) -> Response {
    if let JsonRejection::BytesRejection(_) = rejection {
        let err = ErrorResponse::new(rejection.body_text());
        return (rejection.status(), Json(err)).into_response();
    }
    debug!(reason = %rejection.body_text(), "unusable request body");
    error_response(ServiceError::MissingFields)
}

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.to_response())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::crypto::test_keys;
    use crate::server::router;
    use axum::{body::Body, http::Request};
    use axum_test::TestServer;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_server() -> TestServer {
        TestServer::new(router::build(&Config::default())).unwrap()
    }

    async fn post_raw(uri: &str, content_type: &str, body: &'static str) -> (StatusCode, Value) {
        let app = router::build(&Config::default());
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn presence_follows_falsiness() {
        for absent in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_present(&absent), "{absent} should be missing");
        }
        for present in [json!({}), json!([]), json!(true), json!(1), json!("x")] {
            assert!(is_present(&present), "{present} should be present");
        }
    }

    #[tokio::test]
    async fn encrypt_then_decrypt_round_trip() {
        let server = test_server();
        let original = json!({"user": {"ssn": "123-45-6789", "age": 30}});

        let resp = server
            .post("/encrypt")
            .json(&json!({
                "payload": original,
                "llavePublica": test_keys::public_key_b64(),
                "campos": ["user.ssn"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        let body: Value = resp.json();
        let encrypted = &body["encryptedPayload"];
        assert_ne!(encrypted["user"]["ssn"], original["user"]["ssn"]);
        assert_eq!(encrypted["user"]["age"], json!(30));

        let resp = server
            .post("/decrypt")
            .json(&json!({
                "payload": encrypted,
                "llavePrivada": test_keys::private_key_b64(),
                "campos": ["user.ssn"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        let body: Value = resp.json();
        assert_eq!(body["decryptedPayload"], original);
    }

    #[tokio::test]
    async fn absent_and_ineligible_fields_are_skipped() {
        let server = test_server();
        let payload = json!({"flag": true, "nested": {"a": 1}});

        let resp = server
            .post("/encrypt")
            .json(&json!({
                "payload": payload,
                "llavePublica": test_keys::public_key_b64(),
                "campos": ["flag", "nested", "missing.deep"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.json::<Value>()["encryptedPayload"], payload);

        let resp = server
            .post("/decrypt")
            .json(&json!({
                "payload": payload,
                "llavePrivada": test_keys::private_key_b64(),
                "campos": ["missing", "nested.a"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.json::<Value>()["decryptedPayload"], payload);
    }

    #[tokio::test]
    async fn encrypt_rejects_missing_fields() {
        let server = test_server();
        let key = test_keys::public_key_b64();
        let bodies = [
            json!({"llavePublica": key, "campos": ["a"]}),
            json!({"payload": {"a": "x"}, "campos": ["a"]}),
            json!({"payload": {"a": "x"}, "llavePublica": key}),
            json!({"payload": {"a": "x"}, "llavePublica": key, "campos": "a"}),
            json!({"payload": null, "llavePublica": key, "campos": ["a"]}),
            json!({"payload": {"a": "x"}, "llavePublica": "", "campos": ["a"]}),
        ];
        for body in bodies {
            let resp = server.post("/encrypt").json(&body).await;
            assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(
                resp.json::<Value>(),
                json!({"error": "Faltan campos requeridos"})
            );
        }
    }

    #[tokio::test]
    async fn decrypt_rejects_missing_fields() {
        let server = test_server();
        let key = test_keys::private_key_b64();
        let bodies = [
            json!({"llavePrivada": key, "campos": ["a"]}),
            json!({"payload": {"a": "x"}, "campos": ["a"]}),
            json!({"payload": {"a": "x"}, "llavePrivada": key, "campos": {"a": 1}}),
            // The public-key field name is not accepted by /decrypt.
            json!({"payload": {"a": "x"}, "llavePublica": key, "campos": ["a"]}),
        ];
        for body in bodies {
            let resp = server.post("/decrypt").json(&body).await;
            assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(
                resp.json::<Value>(),
                json!({"error": "Faltan campos requeridos"})
            );
        }
    }

    #[tokio::test]
    async fn malformed_public_key_is_500_with_detail() {
        let resp = test_server()
            .post("/encrypt")
            .json(&json!({
                "payload": {"a": "x"},
                "llavePublica": "%%% not base64 %%%",
                "campos": ["a"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json();
        assert_eq!(body["error"], "Error encriptando");
        assert!(!body["detalle"].as_str().unwrap().is_empty());
        assert!(body.get("encryptedPayload").is_none());
    }

    #[tokio::test]
    async fn malformed_private_key_is_500_with_detail() {
        let resp = test_server()
            .post("/decrypt")
            .json(&json!({
                "payload": {"a": "x"},
                "llavePrivada": "aGVsbG8gd29ybGQ=",
                "campos": ["a"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json();
        assert_eq!(body["error"], "Error desencriptando");
        assert!(!body["detalle"].as_str().unwrap().is_empty());
        assert!(body.get("decryptedPayload").is_none());
    }

    #[tokio::test]
    async fn non_string_key_is_500_with_detail() {
        let server = test_server();
        for key in [json!(true), json!({"k": 1}), json!([1, 2, 3]), json!(42)] {
            let resp = server
                .post("/encrypt")
                .json(&json!({"payload": {"a": "x"}, "llavePublica": key, "campos": ["a"]}))
                .await;
            assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{key}");
            let body: Value = resp.json();
            assert_eq!(body["error"], "Error encriptando");
            assert_eq!(body["detalle"], "public key must be a base64 string");
            assert!(body.get("encryptedPayload").is_none());

            let resp = server
                .post("/decrypt")
                .json(&json!({"payload": {"a": "x"}, "llavePrivada": key, "campos": ["a"]}))
                .await;
            assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{key}");
            let body: Value = resp.json();
            assert_eq!(body["error"], "Error desencriptando");
            assert_eq!(body["detalle"], "private key must be a base64 string");
        }
    }

    #[tokio::test]
    async fn unpadded_ciphertext_still_decrypts() {
        let server = test_server();
        let resp = server
            .post("/encrypt")
            .json(&json!({
                "payload": {"ssn": "123-45-6789"},
                "llavePublica": test_keys::public_key_b64(),
                "campos": ["ssn"]
            }))
            .await;
        let body: Value = resp.json();
        let stripped = body["encryptedPayload"]["ssn"]
            .as_str()
            .unwrap()
            .trim_end_matches('=')
            .replace('+', "-")
            .replace('/', "_");

        let resp = server
            .post("/decrypt")
            .json(&json!({
                "payload": {"ssn": stripped},
                "llavePrivada": test_keys::private_key_b64(),
                "campos": ["ssn"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(
            resp.json::<Value>()["decryptedPayload"],
            json!({"ssn": "123-45-6789"})
        );
    }

    #[tokio::test]
    async fn undecryptable_field_fails_whole_request() {
        let resp = test_server()
            .post("/decrypt")
            .json(&json!({
                "payload": {"a": "plain text", "b": 1},
                "llavePrivada": test_keys::private_key_b64(),
                "campos": ["b", "a"]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json();
        assert!(body["detalle"].as_str().unwrap().contains("\"a\""));
        assert!(body.get("decryptedPayload").is_none());
    }

    #[tokio::test]
    async fn non_string_field_path_is_500() {
        let resp = test_server()
            .post("/encrypt")
            .json(&json!({
                "payload": {"a": "x"},
                "llavePublica": test_keys::public_key_b64(),
                "campos": ["a", 42]
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.json::<Value>()["error"], "Error encriptando");
    }

    #[tokio::test]
    async fn invalid_json_body_is_400() {
        let (status, body) = post_raw("/encrypt", "application/json", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Faltan campos requeridos"}));
    }

    #[tokio::test]
    async fn non_json_content_type_is_400() {
        let (status, body) = post_raw("/decrypt", "text/plain", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Faltan campos requeridos"}));
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let resp = test_server().get("/health").await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.json::<Value>(), json!({"status": "ok"}));
    }
}
