//! 认证流程
//!
//! 表单状态与请求分离：`AuthForm` 只负责输入、校验与 loading 标志，
//! `AuthFlow` 负责发请求、保存会话并解析跳转目标。

use std::fmt;
use std::sync::LazyLock;

use brickwall_shared::protocol::{LoginRequest, SignupRequest};
use brickwall_shared::{AuthResponse, Credentials};
use regex::Regex;

use crate::error::ApiResult;
use crate::gateway::Gateway;
use crate::redirect::resolve_redirect;
use crate::request::HttpClient;
use crate::session::KeyValueStore;

/// 非 HTTP 失败时的兜底文案
pub const AUTH_FALLBACK_MESSAGE: &str = "An error occurred";

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// 粗略的邮箱格式检查：`x@y.z`
pub fn is_plausible_email(email: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

// =========================================================
// 模式 & 校验
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn tab_label(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Signup => "Sign Up",
        }
    }

    pub fn submit_label(&self, loading: bool) -> &'static str {
        match (self, loading) {
            (AuthMode::Login, false) => "Sign In",
            (AuthMode::Login, true) => "Signing In...",
            (AuthMode::Signup, false) => "Create Account",
            (AuthMode::Signup, true) => "Creating Account...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthValidationError {
    InvalidEmail,
    EmptyPassword,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthValidationError::InvalidEmail => write!(f, "Please enter a valid email address."),
            AuthValidationError::EmptyPassword => write!(f, "Please enter your password."),
        }
    }
}

impl std::error::Error for AuthValidationError {}

pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, AuthValidationError> {
    if !is_plausible_email(email) {
        return Err(AuthValidationError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(AuthValidationError::EmptyPassword);
    }
    Ok(Credentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

// =========================================================
// 表单状态
// =========================================================

/// 认证请求的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// 会话已保存，携带跳转目标
    Success { target: String },
    Failed(String),
}

/// 登录 / 注册表单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthForm {
    /// 切换 Tab：清掉错误，保留输入
    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.error = None;
    }

    /// 开始一次提交
    ///
    /// 正在提交或输入不合法时返回 None，此时不应发出任何请求。
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.loading {
            return None;
        }
        match validate_credentials(&self.email, &self.password) {
            Ok(credentials) => {
                self.loading = true;
                self.error = None;
                Some(credentials)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// 结束提交；失败时保留输入并展示错误
    pub fn finish(&mut self, outcome: &AuthOutcome) {
        self.loading = false;
        match outcome {
            AuthOutcome::Success { .. } => self.error = None,
            AuthOutcome::Failed(message) => self.error = Some(message.clone()),
        }
    }

    pub fn submit_label(&self) -> &'static str {
        self.mode.submit_label(self.loading)
    }
}

// =========================================================
// 认证请求
// =========================================================

pub struct AuthFlow<'a, C, S> {
    gateway: &'a Gateway<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStore> AuthFlow<'a, C, S> {
    pub fn new(gateway: &'a Gateway<C, S>) -> Self {
        Self { gateway }
    }

    /// 调用模式对应的端点，成功后保存会话
    pub async fn authenticate(&self, mode: AuthMode, credentials: Credentials) -> ApiResult<AuthResponse> {
        let resp = match mode {
            AuthMode::Login => self.gateway.send(&LoginRequest(credentials)).await?,
            AuthMode::Signup => self.gateway.send(&SignupRequest(credentials)).await?,
        };
        self.gateway.session().save(&resp.access_token, &resp.email);
        Ok(resp)
    }

    /// 完整的一次提交：认证 + 解析跳转目标
    ///
    /// `search` 为认证入口页当前的查询字符串。
    pub async fn submit(&self, mode: AuthMode, credentials: Credentials, search: &str) -> AuthOutcome {
        match self.authenticate(mode, credentials).await {
            Ok(_) => {
                let target = resolve_redirect(search, &self.gateway.config().home_route);
                log_info!("[Auth] Authenticated, navigating to {}", target);
                AuthOutcome::Success { target }
            }
            Err(e) => AuthOutcome::Failed(e.display_message(AUTH_FALLBACK_MESSAGE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::request::MockHttpClient;
    use crate::session::MemoryStore;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn create_gateway(storage: MemoryStore) -> Gateway<MockHttpClient, MemoryStore> {
        Gateway::new(MockHttpClient::new(), storage, ClientConfig::new(BASE))
    }

    fn filled_form(email: &str, password: &str) -> AuthForm {
        AuthForm {
            email: email.into(),
            password: password.into(),
            ..AuthForm::default()
        }
    }

    #[test]
    fn test_email_check() {
        assert!(is_plausible_email("e@x.com"));
        assert!(is_plausible_email("  first.last@sub.example.org "));
        assert!(!is_plausible_email("invalid-email"));
        assert!(!is_plausible_email(""));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a b@x.com"));
    }

    #[test]
    fn test_invalid_input_blocks_submit() {
        let mut form = filled_form("invalid-email", "secret");
        assert!(form.begin_submit().is_none());
        assert!(!form.loading);
        assert_eq!(form.error.as_deref(), Some("Please enter a valid email address."));

        let mut form = filled_form("", "secret");
        assert!(form.begin_submit().is_none());

        let mut form = filled_form("e@x.com", "");
        assert!(form.begin_submit().is_none());
        assert_eq!(form.error.as_deref(), Some("Please enter your password."));
    }

    #[test]
    fn test_duplicate_submit_rejected_while_loading() {
        let mut form = filled_form("e@x.com", "secret");
        assert!(form.begin_submit().is_some());
        assert_eq!(form.submit_label(), "Signing In...");
        assert!(form.begin_submit().is_none());

        form.finish(&AuthOutcome::Failed("Invalid email or password".into()));
        assert!(!form.loading);
        assert_eq!(form.email, "e@x.com");
        assert!(form.begin_submit().is_some());
    }

    #[test]
    fn test_switch_mode_clears_error_keeps_input() {
        let mut form = filled_form("e@x.com", "secret");
        form.error = Some("Email already registered".into());
        form.switch_mode(AuthMode::Signup);

        assert_eq!(form.error, None);
        assert_eq!(form.email, "e@x.com");
        assert_eq!(form.password, "secret");
        form.loading = true;
        assert_eq!(form.submit_label(), "Creating Account...");
    }

    #[tokio::test]
    async fn test_login_saves_session_and_follows_redirect() {
        let storage = MemoryStore::new();
        let gateway = create_gateway(storage.clone());
        gateway.client().mock_response(
            &format!("{}/auth/login", BASE),
            200,
            json!({"access_token": "t", "token_type": "bearer", "email": "e@x.com"}),
        );

        let mut form = filled_form("e@x.com", "secret");
        let credentials = form.begin_submit().unwrap();
        let outcome = AuthFlow::new(&gateway)
            .submit(form.mode, credentials, "?redirect=/courses/abc")
            .await;
        form.finish(&outcome);

        assert_eq!(outcome, AuthOutcome::Success { target: "/courses/abc".into() });
        assert_eq!(storage.get("token").as_deref(), Some("t"));
        assert_eq!(storage.get("userEmail").as_deref(), Some("e@x.com"));
        assert_eq!(gateway.client().request_count(), 1);
    }

    #[tokio::test]
    async fn test_signup_without_redirect_goes_home() {
        let gateway = create_gateway(MemoryStore::new());
        gateway.client().mock_response(
            &format!("{}/auth/signup", BASE),
            200,
            json!({"access_token": "t2", "email": "new@x.com"}),
        );

        let outcome = AuthFlow::new(&gateway)
            .submit(
                AuthMode::Signup,
                validate_credentials("new@x.com", "pw").unwrap(),
                "",
            )
            .await;

        assert_eq!(outcome, AuthOutcome::Success { target: "/".into() });
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let storage = MemoryStore::new();
        let gateway = create_gateway(storage.clone());
        gateway.client().mock_response(
            &format!("{}/auth/signup", BASE),
            400,
            json!({"detail": "Email already registered"}),
        );
        gateway.client().mock_failure(&format!("{}/auth/login", BASE));

        let flow = AuthFlow::new(&gateway);
        let creds = validate_credentials("e@x.com", "pw").unwrap();

        let outcome = flow.submit(AuthMode::Signup, creds.clone(), "").await;
        assert_eq!(outcome, AuthOutcome::Failed("Email already registered".into()));

        let outcome = flow.submit(AuthMode::Login, creds, "").await;
        assert_eq!(outcome, AuthOutcome::Failed("An error occurred".into()));
        assert!(storage.is_empty());
    }
}
