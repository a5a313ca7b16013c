use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::FolioError;

/// JSON body extractor whose rejections use the v1 error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(FolioError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for FolioError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

fn map_json_rejection(rejection: JsonRejection) -> FolioError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            if let Some(field) = extract_missing_field(&message) {
                FolioError::Validation(format!("Missing required field: {field}"))
            } else {
                FolioError::Validation(format!("Invalid JSON: {message}"))
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            FolioError::Validation(format!("JSON syntax error: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            FolioError::Validation("Missing `Content-Type: application/json` header".to_string())
        }
        JsonRejection::BytesRejection(_) => {
            FolioError::Internal("Failed to read request body".to_string())
        }
        _ => FolioError::Validation(rejection.to_string()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_named() {
        let message = "Failed to deserialize the JSON body into the target type: missing field `message` at line 1 column 2";
        assert_eq!(extract_missing_field(message), Some("message"));
    }

    #[test]
    fn other_messages_have_no_field() {
        assert_eq!(extract_missing_field("invalid type: integer"), None);
    }
}
