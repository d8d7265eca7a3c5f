//! Brickwall 客户端核心
//!
//! 不依赖任何 UI 框架：会话、认证网关、重定向、页面守卫、
//! 目录 Reducer 都在这里实现，浏览器前端只负责渲染与注入平台实现。

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys as __web_sys;

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::__web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::__web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::__web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

// =========================================================
// 模块
// =========================================================

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod redirect;
pub mod request;
pub mod session;
pub mod stats;

pub use api::BrickwallApi;
pub use auth::{AuthFlow, AuthForm, AuthMode, AuthOutcome};
pub use catalog::{Catalog, ProgressSummary};
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorStatus, ApiResult};
pub use gateway::Gateway;
pub use guard::{Loadable, Navigator, PageEvent, PageGuard, PageState};
pub use request::{HttpClient, HttpRequest, HttpResponse, TransportError};
pub use session::{KeyValueStore, MemoryStore, Session, SessionStore};
