//! Package folder picker.
//!
//! Selecting a folder replaces the current bundle. The picker is disabled
//! while a request is in flight or no wallet is connected.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use movepub_core::models::BundleSummary;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/upload/upload.module.css");

#[component]
pub fn UploadPanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let input_ref = NodeRef::<leptos::html::Input>::new();

    let disabled = Signal::derive(move || {
        ctx.pipeline.busy.get() || !ctx.wallet.with(|w| w.is_connected())
    });

    let on_change = move |ev: ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        if let Some(list) = input.files() {
            ctx.select_files(list);
        }
    };

    let on_clear = move |_| {
        if let Some(input) = input_ref.get() {
            input.set_value("");
        }
        ctx.clear_files();
    };

    view! {
        <section class=css::panel>
            <h2 class=css::heading>"Package"</h2>

            <label class=css::picker class:disabled=disabled>
                <Icon icon=ic::FOLDER />
                <span>"Upload Move project folder"</span>
                <input
                    node_ref=input_ref
                    class=css::hiddenInput
                    type="file"
                    multiple=true
                    prop:webkitdirectory=true
                    disabled=disabled
                    on:change=on_change
                />
            </label>

            {move || ctx.pipeline.bundle.get().map(|summary| view! {
                <Selection summary=summary on_clear=on_clear />
            })}
        </section>
    }
}

#[component]
fn Selection(
    summary: BundleSummary,
    on_clear: impl Fn(ev::MouseEvent) + Clone + 'static,
) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let missing_manifest = !summary.has_manifest;

    let manifest = summary.manifest.map(|manifest| {
        let placeholders: Vec<String> = manifest
            .unresolved_addresses()
            .into_iter()
            .map(str::to_string)
            .collect();
        let has_placeholders = !placeholders.is_empty();
        let seedable = has_placeholders && ctx.uses_named_addresses();

        view! {
            <div class=css::manifest>
                <span class=css::packageName>{manifest.package_name}</span>
                <Show when=move || has_placeholders>
                    <span class=css::placeholders>
                        "Addresses to supply: " {placeholders.join(", ")}
                    </span>
                </Show>
                <Show when=move || seedable>
                    <button
                        class=css::linkButton
                        on:click=move |_| {
                            ctx.seed_manifest_addresses();
                        }
                    >
                        "Add to named addresses"
                    </button>
                </Show>
            </div>
        }
    });

    view! {
        <div class=css::selection>
            <div class=css::count>
                <span>{format!("{} files selected", summary.file_count)}</span>
                <button
                    class=css::clearButton
                    on:click=on_clear
                    disabled=move || ctx.pipeline.busy.get()
                >
                    <Icon icon=ic::TRASH />
                    "Clear"
                </button>
            </div>
            <Show when=move || missing_manifest>
                <span class=css::warning>
                    <Icon icon=ic::ALERT />
                    "No Move.toml found in the selected folder"
                </span>
            </Show>
            {manifest}
        </div>
    }
}
