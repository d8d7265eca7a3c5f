//! 受保护页面的通用加载流程
//!
//! 每个页面持有一个 `RwSignal<PageState>`，通过 `PageCtx` 完成会话检查、
//! 首屏加载与后续操作；401 统一交给 `PageGuard` 导航。

use std::future::Future;

use brickwall::{ApiError, ApiResult, Loadable, PageEvent, PageGuard, PageState, SessionStore};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{AppGateway, AuthContext, use_auth};
use crate::web::BrowserStorage;
use crate::web::router::{RouterService, current_location, use_router};

fn transition(state: RwSignal<PageState>, event: PageEvent) {
    state.update(|s| *s = std::mem::take(s).on(event));
}

#[derive(Clone)]
pub struct PageCtx {
    router: RouterService,
    auth: AuthContext,
    auth_route: String,
    location: String,
}

impl PageCtx {
    pub fn new() -> Self {
        let router = use_router();
        Self {
            router,
            auth: use_auth(),
            auth_route: router.auth_route(),
            location: current_location(),
        }
    }

    pub fn auth(&self) -> AuthContext {
        self.auth
    }

    fn guard(&self) -> PageGuard<'_, RouterService> {
        PageGuard::new(&self.router, &self.auth_route, &self.location)
    }

    /// 会话检查；返回 true 表示可以开始加载
    pub fn enter(&self, state: RwSignal<PageState>) -> bool {
        match self.guard().check(&SessionStore::new(BrowserStorage)) {
            Some(_) => {
                transition(state, PageEvent::SessionFound);
                true
            }
            None => {
                transition(state, PageEvent::NoSession(self.guard().auth_entry()));
                false
            }
        }
    }

    /// 首屏加载：失败是页面级终态
    pub fn load<T, F, Fut>(
        &self,
        state: RwSignal<PageState>,
        describe: impl Fn(&ApiError) -> String + 'static,
        fetch: F,
        on_ready: impl FnOnce(T) + 'static,
    ) where
        T: 'static,
        F: FnOnce(AppGateway) -> Fut + 'static,
        Fut: Future<Output = ApiResult<T>> + 'static,
    {
        if !self.enter(state) {
            return;
        }
        let ctx = self.clone();
        spawn_local(async move {
            let guard = ctx.guard();
            let loaded = guard.run(fetch(ctx.auth.gateway())).await;
            let event = guard.event_for(&loaded, describe);
            if let Loadable::Ready(value) = loaded {
                on_ready(value);
            }
            transition(state, event);
        });
    }

    /// Ready 之后的用户操作：错误由调用方内联展示
    pub fn act<T, F, Fut>(
        &self,
        state: RwSignal<PageState>,
        fetch: F,
        on_done: impl FnOnce(Loadable<T>) + 'static,
    ) where
        T: 'static,
        F: FnOnce(AppGateway) -> Fut + 'static,
        Fut: Future<Output = ApiResult<T>> + 'static,
    {
        transition(state, PageEvent::RequestStarted);
        let ctx = self.clone();
        spawn_local(async move {
            let guard = ctx.guard();
            let loaded = guard.run(fetch(ctx.auth.gateway())).await;
            transition(state, guard.event_for(&loaded, |e| e.to_string()));
            on_done(loaded);
        });
    }
}

/// 页面级的加载 / 错误 / 跳转占位
#[component]
pub fn PageStatus(state: RwSignal<PageState>, #[prop(into)] loading_text: String) -> impl IntoView {
    move || match state.get() {
        PageState::Unchecked | PageState::Loading => view! {
            <div class="flex flex-col items-center justify-center min-h-[60vh] gap-4">
                <span class="loading loading-spinner loading-lg text-primary"></span>
                <p class="text-base-content/70">{loading_text.clone()}</p>
            </div>
        }
        .into_any(),
        PageState::Error(message) => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div role="alert" class="alert alert-error max-w-md">
                    <span>{message}</span>
                </div>
            </div>
        }
        .into_any(),
        PageState::Redirecting(_) => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <span class="loading loading-dots loading-md"></span>
            </div>
        }
        .into_any(),
        PageState::Ready | PageState::Busy { .. } => ().into_any(),
    }
}

/// 页面内容只在首屏加载完成后显示
pub fn is_ready(state: RwSignal<PageState>) -> bool {
    state.with(PageState::is_interactive)
}
