use brickwall::api::{CHALLENGES_LOAD_FAILED, SUBMIT_FAILED};
use brickwall::{BrickwallApi, Catalog, PageState};
use leptos::prelude::*;

use crate::components::nav::NavBar;
use crate::components::workspace::Workspace;
use crate::page::{PageCtx, PageStatus, is_ready};

/// 全部挑战（受保护页面）
#[component]
pub fn ChallengesPage() -> impl IntoView {
    let ctx = PageCtx::new();
    let state = RwSignal::new(PageState::default());
    let mut initial = Catalog::new();
    let ticket = initial.begin_list_fetch();
    let catalog = RwSignal::new(initial);

    ctx.load(
        state,
        |_| CHALLENGES_LOAD_FAILED.to_string(),
        |gw| async move { BrickwallApi::new(&gw).list_challenges().await },
        move |items| {
            catalog.update(|c| {
                c.apply_list(ticket, items);
            })
        },
    );

    view! {
        <div class="min-h-screen bg-base-200">
            <NavBar title="SQL Challenges" />
            <main class="max-w-7xl mx-auto p-4 md:p-8">
                <PageStatus state=state loading_text="Loading challenges..." />
                <Show when=move || is_ready(state)>
                    <Workspace
                        ctx=ctx.clone()
                        state=state
                        catalog=catalog
                        submit_fallback=SUBMIT_FAILED
                        show_next=true
                    />
                </Show>
            </main>
        </div>
    }
}
