use brickwall::api::{PROFILE_LOAD_FAILED, ProfilePage as ProfileData};
use brickwall::catalog::attempts_label;
use brickwall::stats::{ProfileSummary, recent_submissions};
use brickwall::{BrickwallApi, PageState};
use brickwall_shared::date::format_timestamp;
use brickwall_shared::{ProgressItem, SubmissionItem};
use leptos::prelude::*;

use crate::components::nav::{LevelBadge, NavBar};
use crate::page::{PageCtx, PageStatus, is_ready};
use crate::web::router::Link;

fn display_time(raw: Option<&str>) -> String {
    raw.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

/// 个人资料（受保护页面）
#[component]
pub fn ProfilePage() -> impl IntoView {
    let ctx = PageCtx::new();
    let state = RwSignal::new(PageState::default());
    let data = RwSignal::new(Option::<ProfileData>::None);

    ctx.load(
        state,
        |_| PROFILE_LOAD_FAILED.to_string(),
        |gw| async move { BrickwallApi::new(&gw).load_profile().await },
        move |page| data.set(Some(page)),
    );

    let summary = move || {
        data.with(|d| {
            d.as_ref()
                .map(|d| ProfileSummary::new(&d.progress, &d.submissions))
                .unwrap_or_default()
        })
    };
    let solved = move || data.with(|d| d.as_ref().map(|d| d.progress.progress.clone()).unwrap_or_default());
    let recent = move || {
        data.with(|d| {
            d.as_ref()
                .map(|d| recent_submissions(&d.submissions).to_vec())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar title="Profile" />
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
                <PageStatus state=state loading_text="Loading profile..." />
                <Show when=move || is_ready(state)>
                    <Link to="/challenges" class="btn btn-ghost btn-sm">"← Back to Challenges"</Link>

                    <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                        <div class="stat">
                            <div class="stat-title">"Challenges Solved"</div>
                            <div class="stat-value text-success">{move || summary().solved}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Total Submissions"</div>
                            <div class="stat-value">{move || summary().total_submissions}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Success Rate"</div>
                            <div class="stat-value text-warning">{move || format!("{}%", summary().success_rate_label())}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Account Created"</div>
                            <div class="stat-value text-lg">"Active"</div>
                        </div>
                    </div>

                    <div class="grid gap-6 lg:grid-cols-2">
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <h2 class="card-title">"Solved Challenges"</h2>
                                <Show
                                    when=move || !solved().is_empty()
                                    fallback=|| view! {
                                        <p class="text-center text-base-content/60 py-8">
                                            "No challenges solved yet. Start practicing!"
                                        </p>
                                    }
                                >
                                    <div class="space-y-3">
                                        <For each=solved key=|item| item.challenge_id children=|item| view! { <SolvedRow item=item /> } />
                                    </div>
                                </Show>
                            </div>
                        </div>

                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body">
                                <h2 class="card-title">"Recent Submissions"</h2>
                                <Show
                                    when=move || !recent().is_empty()
                                    fallback=|| view! {
                                        <p class="text-center text-base-content/60 py-8">
                                            "No submissions yet. Start solving challenges!"
                                        </p>
                                    }
                                >
                                    <div class="space-y-3 max-h-96 overflow-y-auto">
                                        {move || recent().into_iter().map(|s| view! { <SubmissionRow submission=s /> }).collect_view()}
                                    </div>
                                </Show>
                            </div>
                        </div>
                    </div>
                </Show>
            </main>
        </div>
    }
}

#[component]
fn SolvedRow(item: ProgressItem) -> impl IntoView {
    view! {
        <div class="border border-base-300 rounded-lg p-4 flex justify-between items-start gap-2">
            <div>
                <h3 class="font-medium">{item.challenge_name}</h3>
                <p class="text-sm text-base-content/60">
                    {format!("Solved on {}", display_time(item.solved_at.as_deref()))}
                </p>
            </div>
            <div class="flex items-center gap-2">
                <LevelBadge level=item.level />
                <span class="text-xs text-base-content/60">
                    {attempts_label(item.attempts).unwrap_or_else(|| "0 attempts".to_string())}
                </span>
            </div>
        </div>
    }
}

#[component]
fn SubmissionRow(submission: SubmissionItem) -> impl IntoView {
    let (badge, label) = if submission.passed {
        ("badge badge-success", "Passed")
    } else {
        ("badge badge-error", "Failed")
    };
    view! {
        <div class="border border-base-300 rounded-lg p-3">
            <div class="flex flex-wrap justify-between items-start gap-2 mb-2">
                <h3 class="font-medium">{submission.challenge_name}</h3>
                <div class="flex items-center gap-2">
                    <span class=badge>{label}</span>
                    <span class="text-xs text-base-content/60">
                        {display_time(submission.submitted_at.as_deref())}
                    </span>
                </div>
            </div>
            <pre class="bg-base-200 rounded p-2 text-xs font-mono whitespace-pre-wrap break-all">{submission.query}</pre>
        </div>
    }
}
