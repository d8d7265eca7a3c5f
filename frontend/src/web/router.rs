//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程：同步会话 -> 验证(Guard) -> 写入 History -> 更新路由信号。

use brickwall::Navigator;
use brickwall::redirect::auth_entry_path;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器地址（path + search）
pub fn current_location() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
}

/// 当前查询字符串（带前导 `?`）
pub fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过注入认证信号与会话同步回调实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 导航代数：同一路由重新导航时也会变化，页面据此重新加载
    generation: RwSignal<u64>,
    is_authenticated: Signal<bool>,
    sync_session: Callback<()>,
    auth_route: StoredValue<String>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, sync_session: Callback<()>, auth_route: String) -> Self {
        let initial_route = AppRoute::from_path(&current_location(), &auth_route);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            generation: RwSignal::new(0),
            is_authenticated,
            sync_session,
            auth_route: StoredValue::new(auth_route),
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn generation(&self) -> ReadSignal<u64> {
        self.generation.read_only()
    }

    pub fn auth_route(&self) -> String {
        self.auth_route.get_value()
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, location: &str) {
        self.navigate_to(location, true);
    }

    fn navigate_to(&self, location: &str, use_push: bool) {
        // 网关可能刚刚清除了会话，先同步再做判断
        self.sync_session.run(());

        let auth_route = self.auth_route();
        let target_route = AppRoute::from_path(location, &auth_route);

        if target_route.requires_auth() && !self.is_authenticated.get_untracked() {
            let entry = auth_entry_path(&auth_route, Some(location));
            brickwall::log_info!("[Router] Access denied to {}, redirecting to {}", location, entry);
            self.commit(&entry, AppRoute::Landing, use_push);
            return;
        }

        self.commit(location, target_route, use_push);
    }

    fn commit(&self, location: &str, route: AppRoute, use_push: bool) {
        if use_push {
            push_history_state(location);
        } else {
            replace_history_state(location);
        }
        self.generation.update(|g| *g += 1);
        self.set_route.set(route);
    }

    /// 首次加载时对当前地址执行一次守卫
    fn guard_initial(&self) {
        let location = current_location();
        self.navigate_to(&location, false);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            router.navigate_to(&current_location(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话失效且停留在受保护页面时，自动跳转认证入口
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();
            if !is_auth && route.requires_auth() {
                let entry = auth_entry_path(&router.auth_route(), Some(&current_location()));
                brickwall::log_info!("[Router] Session ended, redirecting to {}", entry);
                router.commit(&entry, AppRoute::Landing, true);
            }
        });
    }
}

impl Navigator for RouterService {
    fn navigate(&self, path: &str) {
        RouterService::navigate(self, path);
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    is_authenticated: Signal<bool>,
    sync_session: Callback<()>,
    auth_route: String,
) -> RouterService {
    let router = RouterService::new(is_authenticated, sync_session, auth_route);

    router.guard_initial();
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 导航前同步会话
    sync_session: Callback<()>,
    /// 认证入口路由
    auth_route: String,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, sync_session, auth_route);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件；重新导航到同一路由时重新挂载页面。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        router.generation().track();
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
