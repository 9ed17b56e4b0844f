use chrono::Utc;
#[cfg(feature = "supabase")]
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::clipboard;
use crate::config;
use crate::entry::{self, Entry};
use crate::markdown::render_markdown;
#[cfg(feature = "supabase")]
use crate::realtime::RealtimeListener;
use crate::storage::{EntryStore, Store};

const AUTOSAVE_DELAY_MS: i32 = 2_000;
const TOAST_DISMISS_MS: i32 = 3_000;
const COPIED_RESET_MS: i32 = 2_000;
const SNIPPET_CHARS: usize = 100;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn color(self) -> &'static str {
        match self {
            ToastKind::Success => "var(--success-color)",
            ToastKind::Error => "var(--danger-color)",
            ToastKind::Info => "var(--accent-color)",
        }
    }
}

#[derive(Clone)]
struct Toast {
    id: u32,
    message: String,
    kind: ToastKind,
}

fn theme_vars(dark: bool) -> &'static str {
    if dark {
        "--bg-primary: #111827; --bg-secondary: #1f2937; --bg-card: #0f172a; \
         --text-primary: #f9fafb; --text-muted: #9ca3af; --border-color: #374151; \
         --accent-color: #3b82f6; --danger-color: #f87171; --success-color: #34d399;"
    } else {
        "--bg-primary: #ffffff; --bg-secondary: #f3f4f6; --bg-card: #ffffff; \
         --text-primary: #111827; --text-muted: #6b7280; --border-color: #e5e7eb; \
         --accent-color: #2563eb; --danger-color: #dc2626; --success-color: #059669;"
    }
}

const APP_STYLES: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; }
button { cursor: pointer; font: inherit; }
button:disabled { opacity: 0.5; cursor: not-allowed; }
.entry-card .entry-actions { opacity: 0; transition: opacity 0.15s; }
.entry-card:hover .entry-actions { opacity: 1; }
.entry-card:hover { border-color: var(--accent-color) !important; }
.markdown-preview { line-height: 1.6; }
.markdown-preview h1, .markdown-preview h2, .markdown-preview h3 {
    border-bottom: 1px solid var(--border-color); padding-bottom: 0.25rem;
}
.markdown-preview code {
    background: var(--bg-secondary); padding: 0.1rem 0.3rem; border-radius: 3px;
    font-size: 0.9em;
}
.markdown-preview pre {
    background: var(--bg-secondary); padding: 0.75rem; border-radius: 6px;
    overflow-x: auto;
}
.markdown-preview pre code { background: transparent; padding: 0; }
.markdown-preview blockquote {
    margin: 0; padding-left: 1rem; border-left: 3px solid var(--border-color);
    color: var(--text-muted);
}
.markdown-preview table { border-collapse: collapse; }
.markdown-preview th, .markdown-preview td {
    border: 1px solid var(--border-color); padding: 0.3rem 0.6rem;
}
.markdown-preview a { color: var(--accent-color); }
"#;

#[component]
pub fn App() -> impl IntoView {
    let app_config = config::load_config();
    let store = StoredValue::new_local(Store::from_config(&app_config));
    #[cfg(feature = "supabase")]
    let realtime_handle = StoredValue::new_local(None::<RealtimeListener>);

    let entries: RwSignal<Vec<Entry>> = RwSignal::new(Vec::new());
    let (content, set_content) = signal(String::new());
    let (search_query, set_search_query) = signal(String::new());
    let is_preview_mode = RwSignal::new(true);
    let is_dark_mode = RwSignal::new(config::load_dark_mode());
    let is_loading = RwSignal::new(true);
    let is_saving = RwSignal::new(false);

    let toasts: RwSignal<Vec<Toast>> = RwSignal::new(Vec::new());
    let toast_seq: RwSignal<u32> = RwSignal::new(0);
    let copied_entry_id: RwSignal<Option<String>> = RwSignal::new(None);
    let preview_copied = RwSignal::new(false);
    let debounce_handle: RwSignal<Option<i32>> = RwSignal::new(None);

    let push_toast = move |message: &str, kind: ToastKind| {
        let id = toast_seq.get_untracked() + 1;
        toast_seq.set(id);
        toasts.update(|list| {
            list.push(Toast {
                id,
                message: message.to_string(),
                kind,
            })
        });
        if let Some(win) = web_sys::window() {
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                Closure::once_into_js(move || {
                    toasts.update(|list| list.retain(|toast| toast.id != id));
                })
                .as_ref()
                .unchecked_ref(),
                TOAST_DISMISS_MS,
            );
        }
    };

    let reload = move || {
        spawn_local(async move {
            let data = store.get_value().load().await;
            entries.set(data);
        });
    };

    // Debounced autosave target. Skips blank buffers, skips while a save is
    // in flight (dropped, not queued), and skips when the buffer matches the
    // most recent entry. Failures are logged by the adapter, not retried.
    let save_current = move || {
        let text = content.get_untracked();
        if text.trim().is_empty() || is_saving.get_untracked() {
            return;
        }
        if entries
            .get_untracked()
            .first()
            .is_some_and(|front| front.content == text)
        {
            return;
        }
        is_saving.set(true);
        spawn_local(async move {
            if store.get_value().save(&text).await.is_some()
                && store.get_value().needs_manual_reload()
            {
                reload();
            }
            is_saving.set(false);
        });
    };

    let delete_entry = move |id: String| {
        spawn_local(async move {
            if store.get_value().delete(&id).await && store.get_value().needs_manual_reload() {
                reload();
            }
        });
    };

    let copy_entry = move |item: Entry| {
        spawn_local(async move {
            if clipboard::write_text(&item.content).await {
                copied_entry_id.set(Some(item.id.clone()));
                push_toast("Copied to clipboard", ToastKind::Success);
                if let Some(win) = web_sys::window() {
                    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                        Closure::once_into_js(move || copied_entry_id.set(None))
                            .as_ref()
                            .unchecked_ref(),
                        COPIED_RESET_MS,
                    );
                }
            } else {
                push_toast("Copy failed", ToastKind::Error);
            }
        });
    };

    let copy_preview = move || {
        let text = content.get_untracked();
        spawn_local(async move {
            if clipboard::write_text(&text).await {
                preview_copied.set(true);
                push_toast("Copied to clipboard", ToastKind::Success);
                if let Some(win) = web_sys::window() {
                    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                        Closure::once_into_js(move || preview_copied.set(false))
                            .as_ref()
                            .unchecked_ref(),
                        COPIED_RESET_MS,
                    );
                }
            } else {
                push_toast("Copy failed", ToastKind::Error);
            }
        });
    };

    let clear_all = move || {
        let confirmed = window()
            .confirm_with_message("Clear all history? This cannot be undone.")
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            if store.get_value().clear_all().await {
                set_content.set(String::new());
                if store.get_value().needs_manual_reload() {
                    reload();
                }
                push_toast("All entries cleared", ToastKind::Info);
            } else {
                push_toast("Failed to clear history", ToastKind::Error);
            }
        });
    };

    // Initial load: fetch the history, seed the editor with the newest
    // entry, then hand list refreshes over to the realtime push (remote) or
    // to explicit reloads after mutations (local).
    Effect::new(move |_| {
        spawn_local(async move {
            let data = store.get_value().load().await;
            if let Some(first) = data.first() {
                set_content.set(first.content.clone());
            }
            entries.set(data);
            is_loading.set(false);
        });

        #[cfg(feature = "supabase")]
        {
            if let Store::Supabase(remote) = store.get_value() {
                match RealtimeListener::connect(remote.base_url(), remote.anon_key(), reload) {
                    Ok(listener) => realtime_handle.set_value(Some(listener)),
                    Err(err) => logging::error!("realtime: failed to connect: {err:?}"),
                }
            }
        }
    });

    // Restart the 2s autosave countdown on every buffer change; the pending
    // timer is the only cancellable unit.
    Effect::new(move |_| {
        let _ = content.get();
        if let Some(win) = web_sys::window() {
            if let Some(handle) = debounce_handle.get_untracked() {
                win.clear_timeout_with_handle(handle);
            }
            let handle = win
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    Closure::once_into_js(move || {
                        debounce_handle.set(None);
                        save_current();
                    })
                    .as_ref()
                    .unchecked_ref(),
                    AUTOSAVE_DELAY_MS,
                )
                .unwrap_or(0);
            debounce_handle.set(Some(handle));
        }
    });

    Effect::new(move |_| {
        config::store_dark_mode(is_dark_mode.get());
    });

    let filtered = move || entry::filter_entries(&entries.get(), &search_query.get());

    view! {
        <style>{APP_STYLES}</style>
        <main style=move || format!(
            "display: flex; flex-direction: column; height: 100vh; width: 100vw; \
             background: var(--bg-primary); color: var(--text-primary); \
             font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; {}",
            theme_vars(is_dark_mode.get())
        )>
            {move || is_loading.get().then(|| view! {
                <div style="background: var(--accent-color); color: white; text-align: center; padding: 0.4rem; font-size: 0.85rem;">
                    "Loading entries..."
                </div>
            })}

            <header style="display: flex; align-items: center; justify-content: space-between; padding: 0.9rem 1.5rem; border-bottom: 1px solid var(--border-color);">
                <div style="display: flex; align-items: center; gap: 0.75rem;">
                    <div style="background: var(--accent-color); color: white; border-radius: 8px; padding: 0.4rem 0.6rem; font-size: 1.1rem;">
                        "⧉"
                    </div>
                    <div>
                        <h1 style="margin: 0; font-size: 1.2rem;">"ClipSync"</h1>
                        <p style="margin: 0; font-size: 0.8rem; color: var(--text-muted);">
                            "Cross-device clipboard and notes"
                        </p>
                    </div>
                </div>
                <div style="display: flex; gap: 0.5rem;">
                    <button
                        on:click=move |_| {
                            save_current();
                            push_toast("Content saved", ToastKind::Success);
                        }
                        style="padding: 0.45rem 0.9rem; border-radius: 8px; border: 1px solid var(--border-color); background: var(--bg-secondary); color: var(--text-primary);"
                        title="Save current content"
                    >
                        "Save"
                    </button>
                    <button
                        on:click=move |_| is_preview_mode.update(|on| *on = !*on)
                        style=move || format!(
                            "padding: 0.45rem 0.9rem; border-radius: 8px; border: 1px solid var(--border-color); {}",
                            if is_preview_mode.get() {
                                "background: var(--accent-color); color: white;"
                            } else {
                                "background: var(--bg-secondary); color: var(--text-primary);"
                            }
                        )
                        title=move || if is_preview_mode.get() { "Hide preview" } else { "Show preview" }
                    >
                        "Preview"
                    </button>
                    <button
                        on:click=move |_| is_dark_mode.update(|on| *on = !*on)
                        style="padding: 0.45rem 0.9rem; border-radius: 8px; border: 1px solid var(--border-color); background: var(--bg-secondary); color: var(--text-primary);"
                        title=move || if is_dark_mode.get() { "Switch to light theme" } else { "Switch to dark theme" }
                    >
                        {move || if is_dark_mode.get() { "☀" } else { "☾" }}
                    </button>
                </div>
            </header>

            <div style="flex: 1; display: flex; overflow: hidden;">
                <aside style="width: 320px; display: flex; flex-direction: column; background: var(--bg-secondary); border-right: 1px solid var(--border-color);">
                    <div style="padding: 1rem; border-bottom: 1px solid var(--border-color);">
                        <input
                            type="text"
                            prop:value=move || search_query.get()
                            on:input=move |ev| set_search_query.set(event_target_value(&ev))
                            placeholder="Search history..."
                            style="width: 100%; padding: 0.5rem 0.75rem; border-radius: 8px; border: 1px solid var(--border-color); background: var(--bg-primary); color: var(--text-primary); outline: none;"
                        />
                        {move || (!entries.get().is_empty()).then(|| view! {
                            <button
                                on:click=move |_| clear_all()
                                style="margin-top: 0.75rem; width: 100%; padding: 0.5rem; border-radius: 8px; border: none; background: transparent; color: var(--danger-color); font-size: 0.85rem;"
                            >
                                "Clear all"
                            </button>
                        })}
                    </div>
                    <div style="flex: 1; overflow-y: auto; padding: 0.5rem;">
                        {move || {
                            let list = filtered();
                            if list.is_empty() {
                                view! {
                                    <div style="padding: 2rem 1rem; text-align: center; color: var(--text-muted);">
                                        <p style="font-size: 0.9rem; margin: 0;">"No history yet"</p>
                                        <p style="font-size: 0.75rem; margin-top: 0.4rem;">"Start typing or paste content"</p>
                                    </div>
                                }.into_any()
                            } else {
                                view! {
                                    <div>
                                        {list.into_iter().map(|item| {
                                            let load_content = item.content.clone();
                                            let copy_item = item.clone();
                                            let delete_id = item.id.clone();
                                            let copied_marker_id = item.id.clone();
                                            view! {
                                                <div
                                                    class="entry-card"
                                                    style="display: flex; justify-content: space-between; gap: 0.5rem; margin-bottom: 0.5rem; padding: 0.75rem; background: var(--bg-card); border: 1px solid var(--border-color); border-radius: 8px; cursor: pointer; transition: border-color 0.15s;"
                                                    on:click=move |_| set_content.set(load_content.clone())
                                                >
                                                    <div style="min-width: 0; flex: 1;">
                                                        <h3 style="margin: 0; font-size: 0.9rem; white-space: nowrap; overflow: hidden; text-overflow: ellipsis;">
                                                            {item.title.clone()}
                                                        </h3>
                                                        <p style="margin: 0.2rem 0 0; font-size: 0.7rem; color: var(--text-muted);">
                                                            {entry::format_relative(item.created_at, Utc::now())}
                                                        </p>
                                                        <p style="margin: 0.4rem 0 0; font-size: 0.75rem; color: var(--text-muted); overflow: hidden; max-height: 2.4em;">
                                                            {entry::snippet(&item.content, SNIPPET_CHARS)}
                                                        </p>
                                                    </div>
                                                    <div class="entry-actions" style="display: flex; flex-direction: column; gap: 0.25rem;">
                                                        <button
                                                            on:click=move |ev: web_sys::MouseEvent| {
                                                                ev.stop_propagation();
                                                                copy_entry(copy_item.clone());
                                                            }
                                                            style="border: none; background: var(--bg-secondary); border-radius: 4px; padding: 0.25rem 0.4rem; color: var(--accent-color); font-size: 0.8rem;"
                                                            title="Copy content"
                                                        >
                                                            {move || if copied_entry_id.get().as_deref() == Some(copied_marker_id.as_str()) { "✓" } else { "⧉" }}
                                                        </button>
                                                        <button
                                                            on:click=move |ev: web_sys::MouseEvent| {
                                                                ev.stop_propagation();
                                                                delete_entry(delete_id.clone());
                                                            }
                                                            style="border: none; background: var(--bg-secondary); border-radius: 4px; padding: 0.25rem 0.4rem; color: var(--danger-color); font-size: 0.8rem;"
                                                            title="Delete entry"
                                                        >
                                                            "✕"
                                                        </button>
                                                    </div>
                                                </div>
                                            }
                                        }).collect::<Vec<_>>()}
                                    </div>
                                }.into_any()
                            }
                        }}
                    </div>
                </aside>

                <section style="flex: 1; display: flex; flex-direction: column; min-width: 0; border-right: 1px solid var(--border-color);">
                    <div style="display: flex; align-items: center; justify-content: space-between; padding: 0.5rem 1rem; border-bottom: 1px solid var(--border-color); background: var(--bg-secondary);">
                        <h2 style="margin: 0; font-size: 0.85rem; color: var(--text-muted);">"Editor"</h2>
                        {move || is_saving.get().then(|| view! {
                            <span style="font-size: 0.75rem; color: var(--text-muted);">"Saving..."</span>
                        })}
                    </div>
                    <textarea
                        prop:value=move || content.get()
                        on:input=move |ev| set_content.set(event_target_value(&ev))
                        placeholder="Paste or type content here... markdown supported"
                        spellcheck="false"
                        style="flex: 1; width: 100%; padding: 1rem; border: none; outline: none; resize: none; background: var(--bg-primary); color: var(--text-primary); font-family: ui-monospace, 'SF Mono', Menlo, monospace; font-size: 0.85rem; line-height: 1.6;"
                    ></textarea>
                </section>

                {move || is_preview_mode.get().then(|| view! {
                    <section style="flex: 1; display: flex; flex-direction: column; min-width: 0;">
                        <div style="display: flex; align-items: center; justify-content: space-between; padding: 0.5rem 1rem; border-bottom: 1px solid var(--border-color); background: var(--bg-secondary);">
                            <h2 style="margin: 0; font-size: 0.85rem; color: var(--text-muted);">"Preview"</h2>
                            <button
                                on:click=move |_| copy_preview()
                                disabled=move || content.get().trim().is_empty()
                                style=move || format!(
                                    "border: none; border-radius: 6px; padding: 0.3rem 0.7rem; font-size: 0.8rem; {}",
                                    if preview_copied.get() {
                                        "background: var(--success-color); color: white;"
                                    } else {
                                        "background: var(--accent-color); color: white;"
                                    }
                                )
                            >
                                {move || if preview_copied.get() { "✓ Copied" } else { "⧉ Copy" }}
                            </button>
                        </div>
                        {move || {
                            let text = content.get();
                            if text.trim().is_empty() {
                                view! {
                                    <p style="padding: 1rem; color: var(--text-muted); font-style: italic;">
                                        "Nothing to preview yet..."
                                    </p>
                                }.into_any()
                            } else {
                                view! {
                                    <div
                                        class="markdown-preview"
                                        style="flex: 1; overflow-y: auto; padding: 1rem;"
                                        inner_html=render_markdown(&text)
                                    ></div>
                                }.into_any()
                            }
                        }}
                    </section>
                })}
            </div>

            <div style="position: fixed; right: 1rem; bottom: 1rem; display: flex; flex-direction: column; gap: 0.5rem; z-index: 50;">
                {move || toasts.get().into_iter().map(|toast| {
                    let toast_id = toast.id;
                    view! {
                        <div style=format!(
                            "display: flex; align-items: center; gap: 0.75rem; padding: 0.6rem 0.9rem; \
                             background: var(--bg-card); color: var(--text-primary); border: 1px solid var(--border-color); \
                             border-left: 3px solid {}; border-radius: 8px; box-shadow: 0 4px 12px rgba(0,0,0,0.15); font-size: 0.85rem;",
                            toast.kind.color()
                        )>
                            <span>{toast.message.clone()}</span>
                            <button
                                on:click=move |_| toasts.update(|list| list.retain(|t| t.id != toast_id))
                                style="border: none; background: transparent; color: var(--text-muted); padding: 0;"
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </main>
    }
}
