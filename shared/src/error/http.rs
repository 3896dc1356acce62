//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found (a page overrun is reported as a missing page)
            Self::NotFound | Self::OrderNotFound | Self::PriceNotFound | Self::NoMoreItems => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError | Self::UpstreamUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::PriceFetchFailed
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::PriceNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::NoMoreItems.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidGroupBy.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidPage.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidLimit.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::UnsupportedContentType.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::MalformedOrderXml.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::RequiredField.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::PriceFetchFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::UpstreamUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
