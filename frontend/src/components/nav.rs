use brickwall_shared::{Cell, Level};
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::web::router::{Link, use_router};

/// 顶部导航栏
///
/// 登录后显示用户邮箱、资料页与注销；未登录时只显示登录入口。
#[component]
pub fn NavBar(#[prop(optional, into)] title: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let is_authenticated = auth.is_authenticated_signal();
    let email = auth.email();

    let on_logout = move |_| {
        auth.logout();
        // 公开页面注销后原地停留
        if router.current_route().get_untracked().requires_auth() {
            router.navigate(&router.auth_route());
        }
    };

    let title = title.unwrap_or_else(|| "Brickwall Academy".to_string());

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1 gap-2">
                <Link to="/" class="btn btn-ghost text-xl">{title}</Link>
            </div>
            <div class="flex-none gap-2">
                <Show
                    when=move || is_authenticated.get()
                    fallback=move || view! {
                        <Link to=router.auth_route() class="btn btn-primary btn-sm">"Sign In"</Link>
                    }
                >
                    <span class="text-sm text-base-content/70 hidden md:inline">
                        "Welcome, " {move || email.get().unwrap_or_default()}
                    </span>
                    <Link to="/challenges" class="btn btn-ghost btn-sm">"Challenges"</Link>
                    <Link to="/leaderboard" class="btn btn-ghost btn-sm">"Leaderboard"</Link>
                    <Link to="/profile" class="btn btn-ghost btn-sm">"Profile"</Link>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm">"Logout"</button>
                </Show>
            </div>
        </div>
    }
}

/// 难度徽章
#[component]
pub fn LevelBadge(level: Level) -> impl IntoView {
    let class = match level {
        Level::Basic => "badge badge-success",
        Level::Intermediate => "badge badge-warning",
        Level::Advanced => "badge badge-error",
        Level::Unknown => "badge badge-ghost",
    };
    view! { <span class=class>{level.label()}</span> }
}

/// 查询结果表格
#[component]
pub fn ResultTable(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> impl IntoView {
    let empty = rows.is_empty();
    view! {
        <div class="overflow-x-auto">
            <table class="table table-zebra table-sm">
                <thead>
                    <tr>
                        {columns.into_iter().map(|c| view! { <th>{c}</th> }).collect_view()}
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| {
                            view! {
                                <tr>
                                    {row
                                        .into_iter()
                                        .map(|cell| view! { <td class="font-mono">{cell.to_string()}</td> })
                                        .collect_view()}
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
            <Show when=move || empty>
                <p class="text-sm text-base-content/50 py-2">"No rows returned."</p>
            </Show>
        </div>
    }
}
