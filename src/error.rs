use std::fmt;

use brickwall_shared::ErrorBody;

use crate::request::TransportError;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
///
/// 排列顺序即处理优先级：`Unauthorized` 永远最先被处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorStatus {
    /// 401: 会话失效，必须清除会话并跳转登录
    Unauthorized,
    /// 404: 资源未找到
    NotFound,
    /// 其他 4xx/5xx: 服务端拒绝（通常带 detail 消息）
    Rejected,
    /// 没有收到 HTTP 响应
    Transport,
    /// 响应体无法解析
    Decode,
}

impl ApiErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorStatus::Unauthorized => "UNAUTHORIZED",
            ApiErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            ApiErrorStatus::Rejected => "REQUEST_REJECTED",
            ApiErrorStatus::Transport => "NETWORK_ERROR",
            ApiErrorStatus::Decode => "RESPONSE_PARSE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 网关返回给调用方的错误
///
/// - status: 错误语义
/// - status_code: 原始 HTTP 状态码（传输层错误没有）
/// - message: 服务端提供的消息（可选）
/// - spans: 发生错误时的操作追踪
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: ApiErrorStatus,
    pub status_code: Option<u16>,
    message: Option<String>,
    spans: Vec<String>,
}

impl ApiError {
    pub fn new(status: ApiErrorStatus, status_code: Option<u16>, message: Option<String>) -> Self {
        Self {
            status,
            status_code,
            message,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn unauthorized() -> Self {
        Self::new(ApiErrorStatus::Unauthorized, Some(401), None)
    }

    pub fn not_found(message: Option<String>) -> Self {
        Self::new(ApiErrorStatus::NotFound, Some(404), message)
    }

    pub fn rejected(status_code: u16, message: Option<String>) -> Self {
        Self::new(ApiErrorStatus::Rejected, Some(status_code), message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Transport, None, Some(message.into()))
    }

    pub fn decode(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorStatus::Decode, Some(status_code), Some(message.into()))
    }

    /// 根据非 2xx 响应构造错误
    ///
    /// `protected` 为 false 时（登录、注册），401 只是凭据错误，按普通拒绝处理。
    pub fn from_response(status_code: u16, body: &str, protected: bool) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message());
        match status_code {
            401 if protected => Self::unauthorized(),
            404 => Self::not_found(message),
            code => Self::rejected(code, message),
        }
    }

    // --- Context builders ---

    /// 添加操作追踪
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(operation.into());
        self
    }

    // --- Accessors ---

    pub fn is_unauthorized(&self) -> bool {
        self.status == ApiErrorStatus::Unauthorized
    }

    pub fn is_not_found(&self) -> bool {
        self.status == ApiErrorStatus::NotFound
    }

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    /// 服务端提供的消息
    ///
    /// 传输层和解析错误的消息是内部诊断信息，不属于服务端消息。
    pub fn server_message(&self) -> Option<&str> {
        match self.status {
            ApiErrorStatus::NotFound | ApiErrorStatus::Rejected => self.message.as_deref(),
            _ => None,
        }
    }

    /// 界面内联展示的消息：优先服务端消息，否则使用调用点给出的兜底文案
    pub fn display_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn spans(&self) -> &[String] {
        &self.spans
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.error_code())?;
        if let Some(code) = self.status_code {
            write!(f, " {}", code)?;
        }
        if let Some(message) = &self.message {
            write!(f, " {}", message)?;
        }
        if !self.spans.is_empty() {
            write!(f, " | trace: {}", self.spans.join(" -> "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::transport(e.0)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_401_is_unauthorized() {
        let err = ApiError::from_response(401, r#"{"detail":"Could not validate credentials"}"#, true);
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_public_401_keeps_server_message() {
        let err = ApiError::from_response(401, r#"{"detail":"Invalid email or password"}"#, false);
        assert!(!err.is_unauthorized());
        assert_eq!(err.display_message("An error occurred"), "Invalid email or password");
    }

    #[test]
    fn test_not_found_and_rejected() {
        let err = ApiError::from_response(404, r#"{"detail":"Course not found"}"#, true);
        assert!(err.is_not_found());

        let err = ApiError::from_response(400, r#"{"detail":"Invalid SQL syntax"}"#, true);
        assert_eq!(err.status, ApiErrorStatus::Rejected);
        assert_eq!(err.display_message("Error occurred"), "Invalid SQL syntax");
    }

    #[test]
    fn test_fallback_when_body_has_no_detail() {
        let err = ApiError::from_response(500, "Internal Server Error", true);
        assert_eq!(err.display_message("Failed to load challenges."), "Failed to load challenges.");

        let err = ApiError::transport("connection refused");
        assert_eq!(err.display_message("An error occurred"), "An error occurred");
    }

    #[test]
    fn test_display_includes_trace() {
        let err = ApiError::rejected(400, Some("bad".into()))
            .in_op("gateway.send")
            .in_op("POST /challenges/1/submit");
        assert_eq!(
            err.to_string(),
            "[REQUEST_REJECTED] 400 bad | trace: gateway.send -> POST /challenges/1/submit"
        );
    }
}
