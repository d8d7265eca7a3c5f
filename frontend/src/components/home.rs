use brickwall::BrickwallApi;
use brickwall::api::COURSES_LOAD_FAILED;
use brickwall::stats::course_entry_target;
use brickwall_shared::Course;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::nav::NavBar;
use crate::web::router::use_router;

/// 课程目录（公开页面）
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let is_authenticated = auth.is_authenticated_signal();

    let (courses, set_courses) = signal(Vec::<Course>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    spawn_local(async move {
        let gateway = auth.gateway();
        match BrickwallApi::new(&gateway).list_courses().await {
            Ok(list) => set_courses.set(list),
            Err(e) => {
                brickwall::log_error!("[Home] Error loading courses: {}", e);
                set_error.set(Some(COURSES_LOAD_FAILED.to_string()));
            }
        }
        set_loading.set(false);
    });

    let open_course = move |course: &Course| {
        let signed_in = is_authenticated.get_untracked();
        if let Some(target) = course_entry_target(course, signed_in, &router.auth_route()) {
            router.navigate(&target);
        }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar />
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">
                <div class="text-center py-8">
                    <h1 class="text-4xl md:text-5xl font-bold">"Learn by Doing"</h1>
                    <p class="mt-3 text-base-content/70 max-w-2xl mx-auto">
                        "Pick a course and solve hands-on challenges against a real database."
                    </p>
                </div>

                <Show when=move || error.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || error.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <Show when=move || loading.get()>
                    <div class="flex flex-col items-center gap-4 py-12">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                        <p class="text-base-content/70">"Loading courses..."</p>
                    </div>
                </Show>

                <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                    <For
                        each=move || courses.get()
                        key=|c| c.id.clone()
                        children=move |course| {
                            let available = course.is_available;
                            let card_class = if available {
                                "card bg-base-100 shadow-xl cursor-pointer hover:scale-[1.02] transition-transform"
                            } else {
                                "card bg-base-100 shadow opacity-60 cursor-not-allowed"
                            };
                            let clicked = course.clone();
                            let challenge_count = course.challenge_count.unwrap_or(0);
                            view! {
                                <div class=card_class on:click=move |_| open_course(&clicked)>
                                    <div class="card-body">
                                        <Show when=move || !available>
                                            <span class="badge badge-neutral absolute top-4 right-4">"Coming Soon"</span>
                                        </Show>
                                        <div class="flex items-center gap-4">
                                            <span class="text-4xl">{course.icon.clone()}</span>
                                            <div>
                                                <h3 class="card-title">{course.name.clone()}</h3>
                                                <p class="text-sm text-base-content/60">
                                                    {format!("{} • {}", course.difficulty, course.duration)}
                                                </p>
                                            </div>
                                        </div>
                                        <p class="text-base-content/80">{course.description.clone()}</p>
                                        <h4 class="text-sm font-semibold">"What you'll learn:"</h4>
                                        <ul class="text-sm list-disc list-inside">
                                            {course
                                                .features
                                                .iter()
                                                .take(3)
                                                .map(|f| view! { <li>{f.clone()}</li> })
                                                .collect_view()}
                                        </ul>
                                        <div class="flex flex-wrap gap-1">
                                            {course
                                                .technologies
                                                .iter()
                                                .map(|t| view! { <span class="badge badge-outline">{t.clone()}</span> })
                                                .collect_view()}
                                        </div>
                                        <Show when=move || available>
                                            <p class="text-sm text-base-content/60">
                                                {format!(
                                                    "{} challenge{}",
                                                    challenge_count,
                                                    if challenge_count == 1 { "" } else { "s" },
                                                )}
                                            </p>
                                            <div class="card-actions justify-end">
                                                <span class="btn btn-primary btn-sm">
                                                    {move || if is_authenticated.get() { "Start Learning" } else { "Login to Start" }}
                                                </span>
                                            </div>
                                        </Show>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>

                <Show when=move || !is_authenticated.get()>
                    <div class="card bg-base-100 shadow text-center">
                        <div class="card-body items-center">
                            <h2 class="card-title">"Ready to start learning?"</h2>
                            <p class="text-base-content/70">"Create an account to track your progress across courses."</p>
                            <button class="btn btn-primary" on:click=move |_| router.navigate(&router.auth_route())>
                                "Get Started"
                            </button>
                        </div>
                    </div>
                </Show>
            </main>
        </div>
    }
}
