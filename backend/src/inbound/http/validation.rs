//! Extractors running request input through validation schemas.
//!
//! [`ValidJson`], [`ValidQuery`] and [`ValidPath`] turn the body, query
//! string and path segments into raw input, then hand it to the target
//! type's [`FromInput`] implementation. Every rejection is a [`Failure`], so
//! malformed payloads share the central error envelope.

use actix_web::dev::Payload;
use actix_web::error::JsonPayloadError;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::Value;

use crate::domain::validation::{FromInput, RawInput, ValidationFailure, raw_from_pairs};
use crate::domain::{AppError, Failure, codes};

/// Largest accepted JSON body.
pub const JSON_LIMIT_BYTES: usize = 256 * 1024;

/// JSON extractor configuration shared by every resource scope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(JSON_LIMIT_BYTES)
}

fn payload_failure(error: &JsonPayloadError) -> Failure {
    match error {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            AppError::new(413, codes::PAYLOAD_TOO_LARGE, "Payload too large").into()
        }
        JsonPayloadError::ContentType => AppError::new(
            415,
            codes::UNSUPPORTED_MEDIA_TYPE,
            "Content type must be application/json",
        )
        .into(),
        _ => AppError::new(400, codes::INVALID_JSON, "Invalid JSON format").into(),
    }
}

fn validate<T: FromInput>(input: &RawInput) -> Result<T, actix_web::Error> {
    T::from_input(input).map_err(|failure| Failure::from(failure).into())
}

/// Body validated by `T`'s schema.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<T: FromInput + 'static> FromRequest for ValidJson<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);
        async move {
            let value = match body.await {
                Ok(web::Json(value)) => value,
                Err(err) => {
                    if let Some(rejected) = err.as_error::<JsonPayloadError>() {
                        return Err(payload_failure(rejected).into());
                    }
                    return Err(err);
                }
            };
            let Value::Object(input) = value else {
                let failure = ValidationFailure::single("", "must be an object");
                return Err(Failure::from(failure).into());
            };
            validate(&input).map(Self)
        }
        .boxed_local()
    }
}

/// Query string validated by `T`'s schema.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<T: FromInput> FromRequest for ValidQuery<T> {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
            .map_err(|_| Failure::from(AppError::bad_request("Invalid query string")).into())
            .and_then(|web::Query(pairs)| validate(&raw_from_pairs(pairs)))
            .map(Self);
        ready(result)
    }
}

/// Path segments validated by `T`'s schema.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<T: FromInput> FromRequest for ValidPath<T> {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let input = raw_from_pairs(req.match_info().iter());
        ready(validate(&input).map(Self))
    }
}

#[cfg(test)]
mod tests {
    //! Extractor behaviour against hand-built requests.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::ContentType;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    use crate::domain::resources::departamento::CreateDepartamento;
    use crate::domain::validation::IdParam;

    fn status_of(error: &actix_web::Error) -> StatusCode {
        error.as_response_error().status_code()
    }

    #[rstest]
    #[actix_web::test]
    async fn json_bodies_are_validated() {
        let (req, mut payload) = TestRequest::post()
            .insert_header(ContentType::json())
            .set_payload(r#"{"nombre":"  Física  "}"#)
            .to_http_parts();

        let ValidJson(parsed) = ValidJson::<CreateDepartamento>::from_request(&req, &mut payload)
            .await
            .expect("valid body");
        assert_eq!(parsed.nombre, "Física");
    }

    #[rstest]
    #[case(r#"{"nombre": "#, StatusCode::BAD_REQUEST)]
    #[case("[1, 2]", StatusCode::BAD_REQUEST)]
    #[case(r#"{"nombre": ""}"#, StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn malformed_bodies_are_rejected(#[case] body: &'static str, #[case] status: StatusCode) {
        let (req, mut payload) = TestRequest::post()
            .insert_header(ContentType::json())
            .set_payload(body)
            .to_http_parts();

        let err = ValidJson::<CreateDepartamento>::from_request(&req, &mut payload)
            .await
            .expect_err("rejected body");
        assert_eq!(status_of(&err), status);
    }

    #[rstest]
    #[actix_web::test]
    async fn non_json_content_types_are_unsupported() {
        let (req, mut payload) = TestRequest::post()
            .insert_header(ContentType::plaintext())
            .set_payload(r#"{"nombre":"Física"}"#)
            .to_http_parts();

        let err = ValidJson::<CreateDepartamento>::from_request(&req, &mut payload)
            .await
            .expect_err("wrong content type");
        assert_eq!(status_of(&err), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[rstest]
    #[actix_web::test]
    async fn path_identifiers_are_coerced() {
        let req = TestRequest::default().param("id", "42").to_http_request();

        let ValidPath(id) = ValidPath::<IdParam>::extract(&req).await.expect("valid id");
        assert_eq!(id.get(), 42);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("abc")]
    #[actix_web::test]
    async fn non_positive_identifiers_are_rejected(#[case] raw: &'static str) {
        let req = TestRequest::default().param("id", raw).to_http_request();

        let err = ValidPath::<IdParam>::extract(&req)
            .await
            .expect_err("invalid id");
        assert_eq!(status_of(&err), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    fn payload_failures_carry_stable_codes() {
        let overflow = payload_failure(&JsonPayloadError::Overflow { limit: 1 });
        let content_type = payload_failure(&JsonPayloadError::ContentType);
        match (overflow, content_type) {
            (Failure::App(big), Failure::App(media)) => {
                assert_eq!((big.status(), big.code()), (413, "PAYLOAD_TOO_LARGE"));
                assert_eq!((media.status(), media.code()), (415, "UNSUPPORTED_MEDIA_TYPE"));
            }
            other => panic!("expected application errors, got {other:?}"),
        }
    }
}
