use brickwall::api::LEADERBOARD_LOAD_FAILED;
use brickwall::stats::{RankTone, efficiency_bar_width, is_current_user, rank_badge};
use brickwall::{BrickwallApi, PageState};
use brickwall_shared::LeaderboardEntry;
use brickwall_shared::date::format_day;
use leptos::prelude::*;

use crate::components::nav::NavBar;
use crate::page::{PageCtx, PageStatus, is_ready};

fn rank_class(tone: RankTone) -> &'static str {
    match tone {
        RankTone::Gold => "text-lg font-bold text-yellow-600",
        RankTone::Silver => "text-lg font-bold text-gray-500",
        RankTone::Bronze => "text-lg font-bold text-amber-600",
        RankTone::Plain => "text-lg font-bold",
    }
}

/// 排行榜（受保护页面）
#[component]
pub fn LeaderboardPage() -> impl IntoView {
    let ctx = PageCtx::new();
    let state = RwSignal::new(PageState::default());
    let entries = RwSignal::new(Vec::<LeaderboardEntry>::new());
    let email = ctx.auth().email();

    ctx.load(
        state,
        |_| LEADERBOARD_LOAD_FAILED.to_string(),
        |gw| async move { BrickwallApi::new(&gw).leaderboard().await },
        move |list| entries.set(list),
    );

    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar title="Leaderboard" />
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">
                <PageStatus state=state loading_text="Loading leaderboard..." />
                <Show when=move || is_ready(state)>
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h2 class="card-title">"🏆 Top Performers"</h2>
                            <p class="text-sm text-base-content/70">
                                "Ranked by total score (based on challenge difficulty and efficiency)"
                            </p>
                            <Show
                                when=move || entries.with(|e| !e.is_empty())
                                fallback=|| view! {
                                    <div class="text-center py-8 text-base-content/60">
                                        <p class="text-lg">"No one has solved any challenges yet!"</p>
                                        <p class="text-sm mt-2">"Be the first to make it on the leaderboard."</p>
                                    </div>
                                }
                            >
                                <div class="overflow-x-auto">
                                    <table class="table">
                                        <thead>
                                            <tr>
                                                <th>"Rank"</th>
                                                <th>"User"</th>
                                                <th>"Score"</th>
                                                <th>"Challenges Solved"</th>
                                                <th>"Efficiency Rate"</th>
                                                <th>"Last Solved"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {move || {
                                                let me = email.get();
                                                entries
                                                    .get()
                                                    .into_iter()
                                                    .map(|entry| {
                                                        let mine = is_current_user(&entry, me.as_deref());
                                                        view! { <LeaderboardRow entry=entry mine=mine /> }
                                                    })
                                                    .collect_view()
                                            }}
                                        </tbody>
                                    </table>
                                </div>
                            </Show>
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <h3 class="card-title">"How Scoring Works"</h3>
                            <div class="grid gap-6 md:grid-cols-3 text-center">
                                <div>
                                    <div class="text-2xl font-bold text-success">"Basic"</div>
                                    <div class="text-sm text-base-content/70">"10 points"</div>
                                </div>
                                <div>
                                    <div class="text-2xl font-bold text-warning">"Intermediate"</div>
                                    <div class="text-sm text-base-content/70">"20 points"</div>
                                </div>
                                <div>
                                    <div class="text-2xl font-bold text-error">"Advanced"</div>
                                    <div class="text-sm text-base-content/70">"30 points"</div>
                                </div>
                            </div>
                            <div class="text-sm text-base-content/70 text-center mt-4">
                                <p>
                                    <strong>"Efficiency Bonus: "</strong>
                                    "Solve challenges in fewer attempts for up to 50% bonus points!"
                                </p>
                                <p class="mt-1">
                                    <strong>"Efficiency Rate: "</strong>
                                    "(Challenges Solved ÷ Total Attempts) × 100"
                                </p>
                            </div>
                        </div>
                    </div>
                </Show>
            </main>
        </div>
    }
}

#[component]
fn LeaderboardRow(entry: LeaderboardEntry, mine: bool) -> impl IntoView {
    let row_class = if mine { "bg-primary/10 border-l-4 border-primary" } else { "hover" };
    let bar_width = format!("width: {}%", efficiency_bar_width(entry.efficiency_rate));

    view! {
        <tr class=row_class>
            <td>
                <div class=rank_class(RankTone::for_rank(entry.rank))>{rank_badge(entry.rank)}</div>
            </td>
            <td class="font-medium">
                {entry.email.clone()}
                {mine.then(|| view! { <span class="badge badge-primary badge-sm ml-2">"You"</span> })}
            </td>
            <td class="font-bold">{format!("{} pts", entry.total_score)}</td>
            <td>
                <div>{entry.challenges_solved}</div>
                <div class="text-xs text-base-content/60">{format!("{} attempts", entry.total_attempts)}</div>
            </td>
            <td>
                <div>{format!("{}%", entry.efficiency_rate)}</div>
                <div class="w-16 bg-base-300 rounded-full h-1.5 mt-1">
                    <div class="bg-success h-1.5 rounded-full" style=bar_width></div>
                </div>
            </td>
            <td class="text-sm text-base-content/60">{format_day(entry.last_solved.as_deref())}</td>
        </tr>
    }
}
