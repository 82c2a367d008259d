use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Success envelope carrying a payload: `{"result": ..., "data": ...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SuccessResponse<T> {
    pub result: String,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(result: impl Into<String>, data: T) -> Self {
        Self { result: result.into(), data }
    }
}

/// Success envelope without payload: `{"result": ...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultResponse {
    pub result: String,
}

impl ResultResponse {
    pub fn new(result: impl Into<String>) -> Self {
        Self { result: result.into() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorData {
    pub message: String,
}

/// Error envelope: `{"error": {"message": ...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: ErrorData,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: ErrorData { message: message.into() } }
    }
}
