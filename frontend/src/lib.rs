//! Brickwall Academy 前端应用
//!
//! 业务状态全部在 `brickwall` 核心库中，这里只负责浏览器绑定与渲染：
//! - `web::route`: 路由定义
//! - `web::router`: 路由服务（守卫、历史记录）
//! - `auth`: 会话信号
//! - `page`: 受保护页面的加载流程
//! - `components`: 各页面

mod auth;
mod components {
    pub mod challenges;
    pub mod course;
    pub mod home;
    pub mod landing;
    pub mod leaderboard;
    pub mod nav;
    pub mod profile;
    pub mod workspace;
}
mod page;

use crate::auth::AuthContext;
use crate::components::challenges::ChallengesPage;
use crate::components::course::CoursePage;
use crate::components::home::HomePage;
use crate::components::landing::LandingPage;
use crate::components::leaderboard::LeaderboardPage;
use crate::components::profile::ProfilePage;

use leptos::prelude::*;

// 浏览器 API 绑定：HTTP、LocalStorage 与 History
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::BrowserStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Course(id) => view! { <CoursePage course_id=id /> }.into_any(),
        AppRoute::Challenges => view! { <ChallengesPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Leaderboard => view! { <LeaderboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to="/" class="btn btn-primary">"Back to Courses"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 会话上下文（从 LocalStorage 恢复）
    let auth = AuthContext::new();
    provide_context(auth);

    // 2. 路由只依赖认证信号与同步回调
    let is_authenticated = auth.is_authenticated_signal();
    let sync_session = Callback::new(move |_| auth.refresh());

    view! {
        <Router is_authenticated=is_authenticated sync_session=sync_session auth_route=auth.config().auth_route>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
