//! 页面守卫
//!
//! 每个受保护页面都遵循同一个流程：
//! 检查会话 -> 拉取数据 -> 渲染；任一请求 401 时跳转认证入口。
//! 这里把这个流程收敛成一个可复用的守卫，页面只需处理 `Loadable` 结果。

use std::future::Future;

use crate::error::{ApiError, ApiResult};
use crate::redirect::auth_entry_path;
use crate::session::{KeyValueStore, Session, SessionStore};

// =========================================================
// 导航抽象
// =========================================================

/// 导航能力，由前端路由服务实现
pub trait Navigator {
    fn navigate(&self, path: &str);
}

// =========================================================
// 请求结果
// =========================================================

/// 一次受保护请求的结果标签
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    /// 会话已被清除，导航已经发出
    Unauthorized,
    Error(ApiError),
}

impl<T> Loadable<T> {
    pub fn from_result(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(e) if e.is_unauthorized() => Loadable::Unauthorized,
            Err(e) => Loadable::Error(e),
        }
    }
}

// =========================================================
// 页面状态机
// =========================================================

/// 一次导航内的页面阶段
///
/// `Redirecting` 与首次加载失败的 `Error` 是终态，只有重新导航才会回到 `Unchecked`。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Unchecked,
    /// 首屏加载
    Loading,
    Ready,
    /// Ready 之后的用户操作，`pending` 为在途请求数
    Busy {
        pending: u32,
    },
    Error(String),
    Redirecting(String),
}

/// 驱动页面状态机的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// 没有会话，携带跳转目标
    NoSession(String),
    SessionFound,
    /// 用户在 Ready 状态下触发了新的请求
    RequestStarted,
    Loaded,
    /// 任意请求返回 401，携带跳转目标
    Unauthorized(String),
    /// 请求失败（非 401），携带展示消息
    Failed(String),
}

impl PageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PageState::Redirecting(_) | PageState::Error(_))
    }

    /// 首屏加载完成之后（包括后续操作进行中）页面内容可交互
    pub fn is_interactive(&self) -> bool {
        matches!(self, PageState::Ready | PageState::Busy { .. })
    }

    /// 状态转移；非法事件保持当前状态
    pub fn on(self, event: PageEvent) -> PageState {
        use PageEvent as E;
        use PageState as S;

        if self.is_terminal() {
            return self;
        }

        match (self, event) {
            // 401 优先级最高，任何非终态都直接跳转
            (_, E::Unauthorized(to)) => S::Redirecting(to),
            (S::Unchecked, E::NoSession(to)) => S::Redirecting(to),
            (S::Unchecked, E::SessionFound) => S::Loading,
            (S::Loading, E::Loaded) => S::Ready,
            (S::Loading, E::Failed(msg)) => S::Error(msg),
            (S::Ready, E::RequestStarted) => S::Busy { pending: 1 },
            (S::Busy { pending }, E::RequestStarted) => S::Busy { pending: pending + 1 },
            // 后续操作失败以内联方式展示；最后一个在途请求结束才回到 Ready
            (S::Busy { pending }, E::Loaded | E::Failed(_)) => match pending {
                0 | 1 => S::Ready,
                n => S::Busy { pending: n - 1 },
            },
            (state, _) => state,
        }
    }
}

// =========================================================
// 页面守卫
// =========================================================

/// 页面守卫：会话检查 + 401 统一处理
pub struct PageGuard<'a, N> {
    navigator: &'a N,
    auth_route: &'a str,
    current_path: &'a str,
}

impl<'a, N: Navigator> PageGuard<'a, N> {
    pub fn new(navigator: &'a N, auth_route: &'a str, current_path: &'a str) -> Self {
        Self {
            navigator,
            auth_route,
            current_path,
        }
    }

    /// 认证入口地址（带回跳参数）
    pub fn auth_entry(&self) -> String {
        auth_entry_path(self.auth_route, Some(self.current_path))
    }

    /// 检查会话；没有会话时立即导航并返回 None
    pub fn check<S: KeyValueStore>(&self, store: &SessionStore<S>) -> Option<Session> {
        let session = store.load();
        if session.is_active() {
            Some(session)
        } else {
            log_info!("[Guard] No session on {}, redirecting", self.current_path);
            self.navigator.navigate(&self.auth_entry());
            None
        }
    }

    /// 执行一个受保护请求，401 时导航到认证入口
    pub async fn run<T, F>(&self, request: F) -> Loadable<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let loaded = Loadable::from_result(request.await);
        if let Loadable::Unauthorized = loaded {
            self.navigator.navigate(&self.auth_entry());
        }
        loaded
    }

    /// 把请求结果转换为状态机事件
    ///
    /// `describe` 负责把错误转换为页面文案（例如区分 404）。
    pub fn event_for<T>(&self, loaded: &Loadable<T>, describe: impl Fn(&ApiError) -> String) -> PageEvent {
        match loaded {
            Loadable::Ready(_) | Loadable::Loading => PageEvent::Loaded,
            Loadable::Unauthorized => PageEvent::Unauthorized(self.auth_entry()),
            Loadable::Error(e) => PageEvent::Failed(describe(e)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use std::cell::RefCell;

    /// 记录所有导航目标
    #[derive(Default)]
    pub struct RecordingNavigator {
        pub visited: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.visited.borrow_mut().push(path.to_string());
        }
    }

    impl RecordingNavigator {
        pub fn last(&self) -> Option<String> {
            self.visited.borrow().last().cloned()
        }
    }

    #[test]
    fn test_check_without_session_navigates() {
        let nav = RecordingNavigator::default();
        let guard = PageGuard::new(&nav, "/landing", "/challenges");
        let store = SessionStore::new(MemoryStore::new());

        assert!(guard.check(&store).is_none());
        assert_eq!(nav.last().as_deref(), Some("/landing?redirect=%2Fchallenges"));
    }

    #[test]
    fn test_check_with_session_stays() {
        let nav = RecordingNavigator::default();
        let guard = PageGuard::new(&nav, "/landing", "/profile");
        let store = SessionStore::new(MemoryStore::new());
        store.save("t", "e@x.com");

        assert!(guard.check(&store).is_some());
        assert!(nav.visited.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_run_unauthorized_navigates_once() {
        let nav = RecordingNavigator::default();
        let guard = PageGuard::new(&nav, "/landing", "/leaderboard");

        let loaded: Loadable<()> = guard.run(async { Err(ApiError::unauthorized()) }).await;

        assert_eq!(loaded, Loadable::Unauthorized);
        assert_eq!(nav.visited.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_run_error_does_not_navigate() {
        let nav = RecordingNavigator::default();
        let guard = PageGuard::new(&nav, "/landing", "/leaderboard");

        let loaded: Loadable<()> = guard
            .run(async { Err(ApiError::rejected(500, None)) })
            .await;

        assert!(matches!(loaded, Loadable::Error(_)));
        assert!(nav.visited.borrow().is_empty());
        assert_eq!(
            guard.event_for(&loaded, |e| e.display_message("Failed to load leaderboard data.")),
            PageEvent::Failed("Failed to load leaderboard data.".into())
        );
    }

    #[test]
    fn test_state_machine_happy_path() {
        let state = PageState::default()
            .on(PageEvent::SessionFound)
            .on(PageEvent::Loaded);
        assert_eq!(state, PageState::Ready);

        let state = state.on(PageEvent::RequestStarted);
        assert_eq!(state, PageState::Busy { pending: 1 });
        assert!(state.is_interactive());
        assert!(!PageState::Loading.is_interactive());
        assert_eq!(state.on(PageEvent::Failed("Invalid SQL syntax".into())), PageState::Ready);
    }

    #[test]
    fn test_overlapping_requests_keep_page_busy() {
        // 提交在途时又选择了另一题
        let state = PageState::Ready
            .on(PageEvent::RequestStarted)
            .on(PageEvent::RequestStarted);
        assert_eq!(state, PageState::Busy { pending: 2 });

        let state = state.on(PageEvent::Loaded);
        assert_eq!(state, PageState::Busy { pending: 1 });
        assert_eq!(state.on(PageEvent::Failed("Error occurred".into())), PageState::Ready);

        // 401 无论还有多少在途请求都直接跳转
        let state = PageState::Busy { pending: 3 }.on(PageEvent::Unauthorized("/landing".into()));
        assert_eq!(state, PageState::Redirecting("/landing".into()));
    }

    #[test]
    fn test_state_machine_redirects() {
        let state = PageState::default().on(PageEvent::NoSession("/landing".into()));
        assert_eq!(state, PageState::Redirecting("/landing".into()));

        let state = PageState::Ready.on(PageEvent::Unauthorized("/landing".into()));
        assert_eq!(state, PageState::Redirecting("/landing".into()));
        // 终态不再变化
        assert_eq!(state.clone().on(PageEvent::Loaded), state);
    }

    #[test]
    fn test_initial_failure_is_terminal() {
        let state = PageState::default()
            .on(PageEvent::SessionFound)
            .on(PageEvent::Failed("Course not found.".into()));
        assert_eq!(state, PageState::Error("Course not found.".into()));
        assert!(state.clone().on(PageEvent::RequestStarted).is_terminal());
    }
}
