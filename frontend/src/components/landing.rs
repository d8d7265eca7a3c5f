use brickwall::{AuthFlow, AuthForm, AuthMode, AuthOutcome};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::web::router::{current_search, use_router};

#[component]
pub fn LandingPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let form = RwSignal::new(AuthForm::default());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let mut credentials = None;
        form.update(|f| credentials = f.begin_submit());
        let Some(credentials) = credentials else {
            return;
        };

        let mode = form.with_untracked(|f| f.mode);
        let search = current_search();
        spawn_local(async move {
            let gateway = auth.gateway();
            let outcome = AuthFlow::new(&gateway).submit(mode, credentials, &search).await;
            form.update(|f| f.finish(&outcome));
            if let AuthOutcome::Success { target } = outcome {
                auth.refresh();
                router.navigate(&target);
            }
        });
    };

    let tab = move |mode: AuthMode| {
        let class = move || {
            if form.with(|f| f.mode == mode) {
                "tab tab-active"
            } else {
                "tab"
            }
        };
        view! {
            <a role="tab" class=class on:click=move |_| form.update(|f| f.switch_mode(mode))>
                {mode.tab_label()}
            </a>
        }
    };

    let loading = move || form.with(|f| f.loading);

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Brickwall Academy"</h1>
                    <p class="text-base-content/70">"Master technology through interactive challenges"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <div role="tablist" class="tabs tabs-boxed mb-2">
                            {tab(AuthMode::Login)}
                            {tab(AuthMode::Signup)}
                        </div>

                        <Show when=move || form.with(|f| f.error.is_some())>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || form.with(|f| f.error.clone().unwrap_or_default())}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email address"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="email"
                                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.email.clone())
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.password.clone())
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=loading>
                                <Show when=loading>
                                    <span class="loading loading-spinner"></span>
                                </Show>
                                {move || form.with(|f| f.submit_label())}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
