use brickwall::api::{CoursePage as CourseData, QUERY_FAILED, course_error_message};
use brickwall::{BrickwallApi, Catalog, PageState};
use brickwall_shared::Course;
use leptos::prelude::*;

use crate::components::nav::NavBar;
use crate::components::workspace::Workspace;
use crate::page::{PageCtx, PageStatus, is_ready};
use crate::web::router::Link;

/// 单个课程的学习页（受保护页面）
#[component]
pub fn CoursePage(course_id: String) -> impl IntoView {
    let ctx = PageCtx::new();
    let state = RwSignal::new(PageState::default());
    let course = RwSignal::new(Option::<Course>::None);
    let mut initial = Catalog::new();
    let ticket = initial.begin_list_fetch();
    let catalog = RwSignal::new(initial);

    ctx.load(
        state,
        course_error_message,
        move |gw| async move { BrickwallApi::new(&gw).load_course_page(&course_id).await },
        move |page: CourseData| {
            course.set(Some(page.course));
            catalog.update(|c| {
                c.apply_list(ticket, page.challenges);
            });
        },
    );

    // 进度随判定实时变化，不依赖服务端快照
    let progress = move || catalog.with(|c| c.progress());

    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar />
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
                <PageStatus state=state loading_text="Loading course..." />
                <Show when=move || is_ready(state)>
                    {move || {
                        course
                            .get()
                            .map(|c| {
                                view! {
                                    <div class="flex flex-wrap items-center gap-4">
                                        <Link to="/" class="btn btn-ghost btn-sm">"← Back to Courses"</Link>
                                        <span class="text-3xl">{c.icon}</span>
                                        <h1 class="text-2xl font-bold flex-1">{c.name}</h1>
                                        <div class="w-48">
                                            <p class="text-sm text-base-content/70">"Course Progress"</p>
                                            <progress
                                                class="progress progress-primary w-full"
                                                value=move || progress().percentage()
                                                max="100"
                                            ></progress>
                                            <p class="text-xs text-base-content/60">
                                                {move || progress().to_string()}
                                            </p>
                                        </div>
                                    </div>
                                }
                            })
                    }}
                    <Workspace
                        ctx=ctx.clone()
                        state=state
                        catalog=catalog
                        submit_fallback=QUERY_FAILED
                        show_engine=true
                    />
                </Show>
            </main>
        </div>
    }
}
