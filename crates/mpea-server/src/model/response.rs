//! HTTP response envelope
//!
//! Every JSON response is `{code, message, data}`; `code` is 0 on success and
//! one of the `mpea_common::error` codes otherwise.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

use mpea_common::error::SUCCESS;

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> Result<T> {
    pub fn new(code: i32, message: String, data: T) -> Self {
        Result::<T> {
            code,
            message,
            data,
        }
    }

    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            code: SUCCESS.code,
            message: SUCCESS.message.to_string(),
            data,
        }
    }

    pub fn http_success(data: impl Serialize) -> HttpResponse {
        HttpResponse::Ok().json(Result::success(data))
    }

    /// Success envelope with a caller-chosen message, e.g. a localized one.
    pub fn http_success_with_message(message: String, data: impl Serialize) -> HttpResponse {
        HttpResponse::Ok().json(Result::new(SUCCESS.code, message, data))
    }

    pub fn http_response(
        status: u16,
        code: i32,
        message: String,
        data: impl Serialize,
    ) -> HttpResponse {
        HttpResponseBuilder::new(StatusCode::from_u16(status).unwrap_or_default())
            .json(Result::new(code, message, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_success() {
        let result = Result::success(42);
        assert_eq!(result.code, 0);
        assert_eq!(result.message, "success");
        assert_eq!(result.data, 42);
    }

    #[actix_web::test]
    async fn test_http_response() {
        let resp = Result::<()>::http_response(409, 20005, "dup".to_string(), ());
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 20005);
        assert_eq!(json["message"], "dup");
        assert!(json["data"].is_null());
    }
}
