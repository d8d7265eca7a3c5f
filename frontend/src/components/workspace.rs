//! 挑战工作区
//!
//! 课程页与挑战页共用：左侧题目列表，右侧题面 + 编辑器 + 判定结果。
//! 所有状态变化都经过 `Catalog` reducer。

use brickwall::api::{DETAIL_LOAD_FAILED, HISTORY_LOAD_FAILED, NEXT_CHALLENGE_FAILED};
use brickwall::catalog::attempts_label;
use brickwall::{BrickwallApi, Catalog, Loadable, PageState};
use brickwall_shared::date::format_timestamp;
use brickwall_shared::{ChallengeDetail, DatabaseType, SchemaTable, SubmissionItem, SubmissionVerdict};
use leptos::prelude::*;

use crate::components::nav::{LevelBadge, ResultTable};
use crate::page::PageCtx;

#[component]
pub fn Workspace(
    ctx: PageCtx,
    state: RwSignal<PageState>,
    catalog: RwSignal<Catalog>,
    /// 提交失败且没有服务端消息时的兜底文案
    submit_fallback: &'static str,
    /// 是否显示数据库引擎选择
    #[prop(optional)]
    show_engine: bool,
    /// 是否显示 "Next Challenge" 按钮
    #[prop(optional)]
    show_next: bool,
) -> impl IntoView {
    let ctx = StoredValue::new(ctx);
    let query = RwSignal::new(String::new());
    let engine = RwSignal::new(DatabaseType::default());
    // 当前选中题目的提交记录，按需加载
    let history = RwSignal::new(Option::<Vec<SubmissionItem>>::None);

    let select = move |challenge_id: u32| {
        let ticket = catalog.try_update(|c| c.select(challenge_id));
        let Some(ticket) = ticket else {
            return;
        };
        query.set(String::new());
        history.set(None);
        ctx.with_value(|ctx| {
            ctx.act(
                state,
                move |gw| async move { BrickwallApi::new(&gw).get_challenge(challenge_id).await },
                move |loaded| match loaded {
                    Loadable::Ready(detail) => catalog.update(|c| {
                        c.apply_detail(ticket, detail);
                    }),
                    Loadable::Error(_) => catalog.update(|c| {
                        c.detail_failed(ticket, DETAIL_LOAD_FAILED);
                    }),
                    Loadable::Loading | Loadable::Unauthorized => {}
                },
            )
        });
    };

    let submit = move || {
        let Some(Some(ticket)) = catalog.try_update(|c| c.begin_submit()) else {
            return;
        };
        history.set(None);
        let user_query = query.get_untracked();
        let database_type = show_engine.then(|| engine.get_untracked());
        ctx.with_value(|ctx| {
            ctx.act(
                state,
                move |gw| async move {
                    BrickwallApi::new(&gw)
                        .submit(ticket.challenge_id(), &user_query, database_type)
                        .await
                },
                move |loaded| match loaded {
                    Loadable::Ready(verdict) => catalog.update(|c| c.apply_verdict(ticket, verdict)),
                    Loadable::Error(e) => {
                        catalog.update(|c| c.submit_failed(ticket, e.display_message(submit_fallback)))
                    }
                    Loadable::Loading | Loadable::Unauthorized => catalog.update(|c| c.abort_submit(ticket)),
                },
            )
        });
    };

    let load_history = move || {
        let Some(challenge_id) = catalog.with_untracked(|c| c.selected()) else {
            return;
        };
        ctx.with_value(|ctx| {
            ctx.act(
                state,
                move |gw| async move { BrickwallApi::new(&gw).submissions_for(challenge_id).await },
                move |loaded| match loaded {
                    // 期间切换了题目则丢弃
                    Loadable::Ready(list) if catalog.with_untracked(|c| c.selected()) == Some(challenge_id) => {
                        history.set(Some(list.submissions))
                    }
                    Loadable::Error(e) => catalog.update(|c| c.set_error(e.display_message(HISTORY_LOAD_FAILED))),
                    _ => {}
                },
            )
        });
    };

    let next_challenge = move || {
        ctx.with_value(|ctx| {
            ctx.act(
                state,
                move |gw| async move { BrickwallApi::new(&gw).next_challenge().await },
                move |loaded| match loaded {
                    Loadable::Ready(Some(next)) => select(next.id),
                    Loadable::Ready(None) => {}
                    Loadable::Error(_) => catalog.update(|c| c.set_error(NEXT_CHALLENGE_FAILED)),
                    Loadable::Loading | Loadable::Unauthorized => {}
                },
            )
        });
    };

    let progress = move || catalog.with(|c| c.progress());

    view! {
        <div class="grid gap-6 lg:grid-cols-3">
            // 题目列表
            <aside class="card bg-base-100 shadow-xl lg:col-span-1">
                <div class="card-body p-4 gap-3">
                    <div class="flex items-center justify-between">
                        <h2 class="card-title">"Challenges"</h2>
                        <Show when=move || show_next>
                            <button class="btn btn-primary btn-xs" on:click=move |_| next_challenge()>
                                "Next Challenge"
                            </button>
                        </Show>
                    </div>
                    <div>
                        <p class="text-sm text-base-content/70">{move || progress().to_string()}</p>
                        <progress
                            class="progress progress-success w-full"
                            value=move || progress().percentage()
                            max="100"
                        ></progress>
                    </div>
                    <ul class="menu p-0 gap-1">
                        <For
                            each=move || catalog.with(|c| c.items().to_vec())
                            key=|item| (item.id, item.solved, item.attempts)
                            children=move |item| {
                                let id = item.id;
                                let solved = item.solved;
                                let active = move || catalog.with(|c| c.selected() == Some(id));
                                view! {
                                    <li>
                                        <a
                                            class=move || if active() { "active flex-col items-start" } else { "flex-col items-start" }
                                            on:click=move |_| select(id)
                                        >
                                            <div class="flex items-center gap-2 w-full">
                                                <span class="font-medium flex-1">{item.name.clone()}</span>
                                                <Show when=move || solved>
                                                    <span class="text-success">"✓"</span>
                                                </Show>
                                            </div>
                                            <div class="flex items-center gap-2">
                                                <LevelBadge level=item.level />
                                                {attempts_label(item.attempts)
                                                    .map(|label| view! { <span class="text-xs text-base-content/60">{label}</span> })}
                                            </div>
                                        </a>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </div>
            </aside>

            // 题面与编辑器
            <section class="lg:col-span-2 space-y-4">
                {move || {
                    let (selected, detail, loading) = catalog
                        .with(|c| (c.selected(), c.detail().cloned(), c.is_loading_detail()));
                    match (selected, detail) {
                        (None, _) => view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body items-center text-center py-16">
                                    <h2 class="card-title">"Select a Challenge"</h2>
                                    <p class="text-base-content/70">"Choose a challenge from the list to get started."</p>
                                </div>
                            </div>
                        }
                        .into_any(),
                        (Some(_), None) if loading => view! {
                            <div class="flex justify-center py-16">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                        .into_any(),
                        (Some(_), None) => ().into_any(),
                        (Some(_), Some(detail)) => view! {
                            <ChallengePanel detail=detail query=query engine=engine show_engine=show_engine />
                        }
                        .into_any(),
                    }
                }}

                <Show when=move || catalog.with(|c| c.selected().is_some())>
                    <div class="flex gap-2">
                        <button
                            class="btn btn-primary"
                            disabled=move || catalog.with(|c| c.is_submitting() || c.detail().is_none())
                            on:click=move |_| submit()
                        >
                            <Show when=move || catalog.with(|c| c.is_submitting())>
                                <span class="loading loading-spinner loading-sm"></span>
                            </Show>
                            "Submit"
                        </button>
                        <Show when=move || history.with(Option::is_none)>
                            <button class="btn btn-ghost" on:click=move |_| load_history()>
                                "My Submissions"
                            </button>
                        </Show>
                    </div>
                </Show>

                {move || history.get().map(|items| view! { <HistoryPanel items=items /> })}

                <Show when=move || catalog.with(|c| c.error().is_some())>
                    <div role="alert" class="alert alert-error">
                        <span>{move || catalog.with(|c| c.error().unwrap_or_default().to_string())}</span>
                    </div>
                </Show>

                {move || {
                    catalog
                        .with(|c| c.verdict().cloned())
                        .map(|verdict| {
                            let next = catalog.with(|c| c.next_step().cloned());
                            view! {
                                <VerdictPanel verdict=verdict />
                                {next.map(|next| {
                                    let id = next.id;
                                    view! {
                                        <button class="btn btn-success" on:click=move |_| select(id)>
                                            {format!("Next: {} →", next.name)}
                                        </button>
                                    }
                                })}
                            }
                        })
                }}
            </section>
        </div>
    }
}

#[component]
fn ChallengePanel(
    detail: ChallengeDetail,
    query: RwSignal<String>,
    engine: RwSignal<DatabaseType>,
    show_engine: bool,
) -> impl IntoView {
    let options = detail.options.clone().unwrap_or_default();
    let has_options = !options.is_empty();
    let has_schema = !detail.schema_tables.is_empty();

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body gap-4">
                <div class="flex items-center gap-3">
                    <h2 class="card-title flex-1">{detail.name.clone()}</h2>
                    <LevelBadge level=detail.level />
                </div>
                <p class="whitespace-pre-line">{detail.question.clone()}</p>

                <Show when=move || has_schema>
                    <h3 class="font-semibold">"Database Schema"</h3>
                </Show>
                {detail.schema_tables.iter().cloned().map(|t| view! { <SchemaCard table=t /> }).collect_view()}

                {if has_options {
                    view! {
                        <div class="flex flex-col gap-2">
                            {options
                                .into_iter()
                                .zip('A'..='Z')
                                .map(|(option, letter)| {
                                    let value = option.clone();
                                    let checked = option.clone();
                                    view! {
                                        <label class="label cursor-pointer justify-start gap-3">
                                            <input
                                                type="radio"
                                                name="answer"
                                                class="radio radio-primary"
                                                prop:checked=move || query.with(|q| *q == checked)
                                                on:change=move |_| query.set(value.clone())
                                            />
                                            <span class="label-text">
                                                <span class="font-medium">{format!("{}.", letter)}</span>
                                                " "
                                                {option}
                                            </span>
                                        </label>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <textarea
                            class="textarea textarea-bordered font-mono min-h-40"
                            placeholder="SELECT * FROM ..."
                            prop:value=move || query.get()
                            on:input=move |ev| query.set(event_target_value(&ev))
                        ></textarea>
                    }
                    .into_any()
                }}

                <Show when=move || show_engine && !has_options>
                    <label class="form-control w-full max-w-xs">
                        <span class="label-text mb-1">"Database Engine"</span>
                        <select
                            class="select select-bordered select-sm"
                            on:change=move |ev| {
                                if let Some(db) = DatabaseType::parse(&event_target_value(&ev)) {
                                    engine.set(db);
                                }
                            }
                        >
                            {DatabaseType::ALL
                                .into_iter()
                                .map(|db| {
                                    view! {
                                        <option value=db.as_str() selected=move || engine.get() == db>
                                            {db.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </label>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn HistoryPanel(items: Vec<SubmissionItem>) -> impl IntoView {
    if items.is_empty() {
        return view! { <p class="text-sm text-base-content/60">"No submissions for this challenge yet."</p> }.into_any();
    }
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body gap-2 p-4">
                <h3 class="font-semibold">"My Submissions"</h3>
                {items
                    .into_iter()
                    .map(|s| {
                        let badge = if s.passed { ("badge badge-success", "Passed") } else { ("badge badge-error", "Failed") };
                        view! {
                            <div class="border border-base-300 rounded p-2">
                                <div class="flex items-center gap-2 mb-1">
                                    <span class=badge.0>{badge.1}</span>
                                    <span class="text-xs text-base-content/60">
                                        {s.submitted_at.as_deref().map(format_timestamp).unwrap_or_else(|| "-".to_string())}
                                    </span>
                                </div>
                                <pre class="text-xs font-mono whitespace-pre-wrap break-all">{s.query}</pre>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
    .into_any()
}

#[component]
fn SchemaCard(table: SchemaTable) -> impl IntoView {
    view! {
        <div class="border border-base-300 rounded-lg overflow-hidden">
            <div class="bg-base-200 px-4 py-2 font-semibold text-sm">
                {format!("Table: {}", table.table_name)}
            </div>
            <table class="table table-xs">
                <thead>
                    <tr><th>"Column"</th><th>"Type"</th><th>"Constraints"</th></tr>
                </thead>
                <tbody>
                    {table
                        .columns
                        .into_iter()
                        .map(|col| view! {
                            <tr>
                                <td class="font-mono">{col.name}</td>
                                <td class="font-mono">{col.column_type}</td>
                                <td>
                                    {if col.constraints.is_empty() { "-".to_string() } else { col.constraints.join(", ") }}
                                </td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn VerdictPanel(verdict: SubmissionVerdict) -> impl IntoView {
    let passed = verdict.passed;
    let (title, class) = if passed {
        ("✅ Passed", "alert alert-success")
    } else {
        ("❌ Failed", "alert alert-error")
    };

    let expected = if passed {
        None
    } else {
        verdict.expected.clone().map(|rows| {
            let columns = verdict
                .expected_column_names
                .clone()
                .unwrap_or_else(|| verdict.column_names.clone());
            view! {
                <h4 class="font-semibold">"Expected Result"</h4>
                <ResultTable columns=columns rows=rows />
            }
        })
    };

    let has_table = !verdict.column_names.is_empty() || !verdict.result.is_empty();

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body gap-3">
                <div role="status" class=class>
                    <span class="font-bold">{title}</span>
                    {verdict.message.clone().map(|m| view! { <span>{m}</span> })}
                </div>
                <Show when=move || has_table>
                    <h4 class="font-semibold">"Your Result"</h4>
                </Show>
                {has_table.then(|| view! { <ResultTable columns=verdict.column_names.clone() rows=verdict.result.clone() /> })}
                {expected}
                {verdict.correct_answer.clone().filter(|_| !passed).map(|a| view! {
                    <p><span class="font-semibold">"Correct answer: "</span>{a}</p>
                })}
                {verdict.explanation.clone().map(|e| view! {
                    <p class="text-base-content/80"><span class="font-semibold">"Explanation: "</span>{e}</p>
                })}
            </div>
        </div>
    }
}
