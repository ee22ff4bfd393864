//! Conversions from external infrastructure errors into domain errors.

use kube_eventbridge_domain::BridgeError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BridgeError);

impl From<InfraError> for BridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BridgeError> for InfraError {
    fn from(value: BridgeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBridgeError {
    fn into_bridge(self) -> BridgeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for HttpError {
    fn into_bridge(self) -> BridgeError {
        if self.is_timeout() {
            return BridgeError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return BridgeError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status);
        }

        BridgeError::Network(self.to_string())
    }
}

/// Map a non-success HTTP status onto the error taxonomy.
pub(crate) fn status_error(status: reqwest::StatusCode) -> BridgeError {
    let code = status.as_u16();
    let message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

    match code {
        401 | 403 => BridgeError::Auth(message),
        429 | 500..=599 => BridgeError::Network(message),
        _ => BridgeError::Dispatch(message),
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for std::io::Error {
    fn into_bridge(self) -> BridgeError {
        match self.kind() {
            std::io::ErrorKind::NotFound => BridgeError::Configuration(format!("file not found: {self}")),
            std::io::ErrorKind::PermissionDenied => {
                BridgeError::Configuration(format!("permission denied: {self}"))
            }
            _ => BridgeError::Internal(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for url::ParseError {
    fn into_bridge(self) -> BridgeError {
        BridgeError::Configuration(format!("invalid URL: {self}"))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
