use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Envelope code for success
pub const CODE_OK: i64 = 0;
/// Envelope code for an expired/invalid session
pub const CODE_AUTH_EXPIRED: i64 = 401;

/// Uniform wrapper around every backend response body
///
/// `code == 0` is success; `code == 401` means the session is no longer
/// valid; any other non-zero code is a business error whose text is
/// `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == CODE_OK
    }

    /// Unwrap the payload of a successful envelope.
    ///
    /// A success envelope without a body is a protocol violation and is
    /// classified like any other malformed transport response.
    pub fn require_data(self) -> Result<T, ClientError> {
        self.data
            .ok_or_else(|| ClientError::network("envelope missing data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_envelope() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code":0,"message":"ok","data":{"problemId":"p1"}}"#)
                .unwrap();

        assert!(envelope.is_success());
        assert_eq!(envelope.data.unwrap()["problemId"], "p1");
    }

    #[test]
    fn null_and_missing_data_are_equivalent() {
        let with_null: Envelope<String> =
            serde_json::from_str(r#"{"code":0,"message":"","data":null}"#).unwrap();
        let without: Envelope<String> = serde_json::from_str(r#"{"code":0}"#).unwrap();

        assert!(with_null.data.is_none());
        assert!(without.data.is_none());
        assert_eq!(without.message, "");
    }

    #[test]
    fn require_data_rejects_empty_success() {
        let envelope: Envelope<String> = serde_json::from_str(r#"{"code":0}"#).unwrap();

        assert!(matches!(
            envelope.require_data(),
            Err(ClientError::Network(_))
        ));
    }
}
