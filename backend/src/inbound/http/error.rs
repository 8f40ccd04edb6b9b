//! Central error responder.
//!
//! Every handler returns [`ApiResult`], so every failure reaches
//! [`Failure::error_response`]. Classification runs in a fixed order:
//! validation, storage (after unwrapping at most one level of cause),
//! application, then anything else. Each branch emits exactly one structured
//! event before the JSON envelope is written. Diagnostics for storage and
//! unexpected failures are only attached when the request context allows it.

use std::error::Error as StdError;

use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::domain::validation::ValidationFailure;
use crate::domain::{
    AppError, DatabaseError, Failure, StorageDiagnostics, StorageErrorMapping, codes,
    find_database_error, map_database_error,
};
use crate::middleware::{RequestContext, TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Failure>;

const VALIDATION_MESSAGE: &str = "Invalid data";
const DATABASE_MESSAGE: &str = "Database error";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Failure description.
    pub error: ErrorBody,
}

/// Code, message and optional diagnostics of a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    /// Human-readable message.
    #[schema(example = "Departamento 999 not found")]
    pub message: String,
    /// Validation issues, or storage diagnostics in development.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

enum Outcome<'a> {
    Validation(&'a ValidationFailure),
    Mapped {
        source: &'a DatabaseError,
        mapping: StorageErrorMapping,
    },
    Unmapped(&'a DatabaseError),
    App(&'a AppError),
    Unknown(&'a (dyn StdError + 'static)),
}

fn storage_outcome<'a>(
    error: &'a (dyn StdError + 'static),
    context: &RequestContext,
) -> Option<Outcome<'a>> {
    let source = find_database_error(error)?;
    Some(match map_database_error(source, context.method()) {
        Some(mapping) => Outcome::Mapped { source, mapping },
        None => Outcome::Unmapped(source),
    })
}

fn classify<'a>(failure: &'a Failure, context: &RequestContext) -> Outcome<'a> {
    match failure {
        Failure::Validation(validation) => Outcome::Validation(validation),
        Failure::Storage(storage) => {
            storage_outcome(storage, context).unwrap_or(Outcome::Unknown(storage))
        }
        Failure::App(app) => Outcome::App(app),
        Failure::Unexpected(other) => {
            let inner: &(dyn StdError + 'static) = &**other;
            storage_outcome(inner, context).unwrap_or(Outcome::Unknown(inner))
        }
    }
}

#[derive(Debug)]
struct Rendered {
    status: u16,
    retry_after: Option<u32>,
    body: ErrorBody,
}

impl Rendered {
    fn new(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: ErrorBody {
                code: code.to_owned(),
                message: message.into(),
                details: None,
            },
        }
    }

    fn with_details(mut self, details: Option<Value>) -> Self {
        self.body.details = details;
        self
    }

    const fn with_retry_after(mut self, seconds: Option<u32>) -> Self {
        self.retry_after = seconds;
        self
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn storage_details(diagnostics: &StorageDiagnostics, context: &RequestContext) -> Option<Value> {
    context
        .expose_details()
        .then(|| serde_json::to_value(diagnostics).ok())
        .flatten()
}

fn render(outcome: &Outcome<'_>, context: &RequestContext) -> Rendered {
    match outcome {
        Outcome::Validation(validation) => {
            Rendered::new(400, codes::VALIDATION_ERROR, VALIDATION_MESSAGE)
                .with_details(Some(json!({ "issues": validation.issues() })))
        }
        Outcome::Mapped { mapping, .. } => {
            Rendered::new(mapping.status, mapping.code, mapping.message)
                .with_retry_after(mapping.retry_after)
                .with_details(storage_details(&mapping.details, context))
        }
        Outcome::Unmapped(source) => Rendered::new(500, codes::DATABASE_ERROR, DATABASE_MESSAGE)
            .with_details(storage_details(&StorageDiagnostics::from(*source), context)),
        Outcome::App(app) => Rendered::new(app.status(), app.code(), app.message()),
        Outcome::Unknown(other) => {
            if context.expose_details() {
                let reason = other.to_string();
                Rendered::new(500, codes::INTERNAL_ERROR, reason.clone())
                    .with_details(Some(json!({ "reason": reason })))
            } else {
                Rendered::new(500, codes::INTERNAL_ERROR, INTERNAL_MESSAGE)
            }
        }
    }
}

fn cause_chain(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain
}

fn log_outcome(outcome: &Outcome<'_>, rendered: &Rendered, context: &RequestContext) {
    let trace_id = TraceId::current().map(|id| id.to_string()).unwrap_or_default();
    let method = context.method().as_str();
    let path = context.path();
    let status = rendered.status;
    match outcome {
        Outcome::Validation(validation) => info!(
            kind = "validation_error",
            trace_id,
            method,
            path,
            issues = ?validation.issues(),
            "request rejected by validation"
        ),
        Outcome::Mapped { source, mapping } => warn!(
            kind = "database_error",
            trace_id,
            method,
            path,
            status,
            code = mapping.code,
            sqlstate = source.code(),
            schema = source.schema(),
            table = source.table(),
            constraint = source.constraint(),
            column = source.column(),
            detail = source.detail(),
            "storage failure mapped to client error"
        ),
        Outcome::Unmapped(source) => error!(
            kind = "unmapped_database_error",
            trace_id,
            method,
            path,
            sqlstate = source.code(),
            table = source.table(),
            constraint = source.constraint(),
            error = source.message(),
            "unrecognised storage failure"
        ),
        Outcome::App(app) if app.status() >= 500 => error!(
            kind = "app_error",
            trace_id,
            method,
            path,
            status,
            code = app.code(),
            reason = app.message(),
            "application error"
        ),
        Outcome::App(app) => info!(
            kind = "app_error",
            trace_id,
            method,
            path,
            status,
            code = app.code(),
            reason = app.message(),
            "application error"
        ),
        Outcome::Unknown(other) => error!(
            kind = "unhandled_error",
            trace_id,
            method,
            path,
            error = %other,
            causes = ?cause_chain(*other),
            "unhandled error"
        ),
    }
}

impl ResponseError for Failure {
    fn status_code(&self) -> StatusCode {
        let context = RequestContext::current();
        render(&classify(self, &context), &context).status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let context = RequestContext::current();
        let outcome = classify(self, &context);
        let rendered = render(&outcome, &context);
        log_outcome(&outcome, &rendered, &context);

        let mut builder = HttpResponse::build(rendered.status_code());
        if let Some(seconds) = rendered.retry_after {
            builder.insert_header((header::RETRY_AFTER, HeaderValue::from(seconds)));
        }
        if let Some(id) = TraceId::current() {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(ErrorEnvelope {
            error: rendered.body,
        })
    }
}

#[cfg(test)]
mod tests;
