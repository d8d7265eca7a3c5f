//! 认证模块
//!
//! 持久化的会话才是唯一事实来源，这里的信号只是它的响应式镜像：
//! 登录、登出、网关清除会话之后都需要调用 `refresh` 重新同步。

use brickwall::config::BuildEnv;
use brickwall::{ClientConfig, Gateway, Session, SessionStore};
use leptos::prelude::*;

use crate::web::{BrowserStorage, FetchHttpClient};

/// 前端使用的网关类型
pub type AppGateway = Gateway<FetchHttpClient, BrowserStorage>;

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<Session>,
    config: StoredValue<ClientConfig>,
}

impl AuthContext {
    /// 创建认证上下文，并从 LocalStorage 读取会话
    pub fn new() -> Self {
        let config = ClientConfig::from_env(&BuildEnv);
        let session = SessionStore::new(BrowserStorage).load();
        Self {
            session: RwSignal::new(session),
            config: StoredValue::new(config),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Session::is_active))
    }

    pub fn email(&self) -> Signal<Option<String>> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.email.clone()))
    }

    pub fn config(&self) -> ClientConfig {
        self.config.get_value()
    }

    /// 为一次调用构造网关
    pub fn gateway(&self) -> AppGateway {
        Gateway::new(FetchHttpClient, BrowserStorage, self.config())
    }

    /// 从存储重新同步会话信号
    pub fn refresh(&self) {
        let stored = SessionStore::new(BrowserStorage).load();
        if self.session.with_untracked(|s| *s != stored) {
            self.session.set(stored);
        }
    }

    /// 注销：清除会话，不负责导航
    pub fn logout(&self) {
        SessionStore::new(BrowserStorage).clear();
        self.refresh();
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
