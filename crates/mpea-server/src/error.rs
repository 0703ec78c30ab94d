// Error handling for the HTTP layer
// Maps CmsError values carried inside anyhow::Error onto status codes and
// the response envelope

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;

pub use mpea_common::error::{
    ACCESS_DENIED, DATA_ACCESS_ERROR, IMPORT_DATA_INVALID, PARAMETER_MISSING,
    PARAMETER_VALIDATE_ERROR, RESOURCE_CONFLICT, RESOURCE_NOT_FOUND, SERVER_ERROR, SUCCESS,
    TOO_MANY_REQUESTS, UNSUPPORTED_LOCALE,
};
pub use mpea_common::{CmsError, ErrorCode};

use crate::model::response as common;

// Local wrapper so actix-web's ResponseError can be implemented for it
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<CmsError> for AppError {
    fn from(value: CmsError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self.downcast_ref::<CmsError>() {
            Some(e) => {
                let status = match e {
                    CmsError::IllegalArgument(_) => 400,
                    CmsError::AuthError(_) => 401,
                    CmsError::ResourceNotFound(_) => 404,
                    CmsError::ResourceConflict(_) => 409,
                    CmsError::TooManyRequests(_) => 429,
                    CmsError::DatabaseError(_) | CmsError::InternalError(_) => {
                        tracing::error!(error = %e, "request failed");
                        return common::Result::<()>::http_response(
                            500,
                            e.error_code().code,
                            SERVER_ERROR.message.to_string(),
                            (),
                        );
                    }
                };
                common::Result::<()>::http_response(status, e.error_code().code, e.to_string(), ())
            }
            None => {
                tracing::error!(error = ?self.inner, "request failed");
                common::Result::<()>::http_response(
                    500,
                    SERVER_ERROR.code,
                    SERVER_ERROR.message.to_string(),
                    (),
                )
            }
        }
    }
}

/// Build an `IllegalArgument` error from validator failures.
pub fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{} {}", field, detail)
        })
        .collect::<Vec<String>>()
        .join("; ");

    CmsError::IllegalArgument(message).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn test_status_mapping() {
        let cases = [
            (CmsError::IllegalArgument("bad".into()), 400, PARAMETER_VALIDATE_ERROR.code),
            (CmsError::AuthError("no".into()), 401, ACCESS_DENIED.code),
            (CmsError::ResourceNotFound("gone".into()), 404, RESOURCE_NOT_FOUND.code),
            (CmsError::ResourceConflict("dup".into()), 409, RESOURCE_CONFLICT.code),
            (CmsError::TooManyRequests("slow".into()), 429, TOO_MANY_REQUESTS.code),
        ];

        for (err, status, code) in cases {
            let message = err.to_string();
            let (actual, json) = body_json(AppError::from(err)).await;
            assert_eq!(actual.as_u16(), status);
            assert_eq!(json["code"], code);
            assert_eq!(json["message"], message);
        }
    }

    #[actix_web::test]
    async fn test_internal_errors_are_not_leaked() {
        let (status, json) =
            body_json(AppError::from(anyhow::anyhow!("connection refused at 10.0.0.1"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], SERVER_ERROR.code);
        assert_eq!(json["message"], "server error");

        let (status, json) =
            body_json(AppError::from(CmsError::DatabaseError("deadlock".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], DATA_ACCESS_ERROR.code);
    }

    #[test]
    fn test_app_error_downcast() {
        let err = AppError::from(CmsError::ResourceNotFound("missing".to_string()));
        assert_eq!(
            err.downcast_ref::<CmsError>(),
            Some(&CmsError::ResourceNotFound("missing".to_string()))
        );
        assert_eq!(err.to_string(), "missing");
    }
}
