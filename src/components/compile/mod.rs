//! Compile action, compiler output and publish action.
//!
//! The Publish button only appears while a compile result is held; publishing
//! consumes it.

use leptos::prelude::*;
use leptos_icons::Icon;
use movepub_core::PublishPhase;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/compile/compile.module.css");

#[component]
pub fn CompilePanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let busy = ctx.pipeline.busy;

    let can_compile = Signal::derive(move || {
        !busy.get()
            && ctx.wallet.with(|w| w.is_connected())
            && ctx.pipeline.bundle.with(|b| b.as_ref().is_some_and(|s| s.file_count > 0))
    });
    let output = move || ctx.pipeline.result.with(|r| r.as_ref().map(|r| r.to_pretty()));

    view! {
        <section class=css::panel>
            <div class=css::actions>
                <button
                    class=css::primaryButton
                    disabled=move || !can_compile.get()
                    on:click=move |_| ctx.compile()
                >
                    <Icon icon=ic::COMPILE />
                    "Compile"
                </button>

                <Show when=move || output().is_some()>
                    <button
                        class=css::primaryButton
                        disabled=move || busy.get()
                        on:click=move |_| ctx.publish()
                    >
                        <Icon icon=ic::PUBLISH />
                        "Publish"
                    </button>
                </Show>

                <Show when=move || busy.get()>
                    <span class=css::spinner>
                        <Icon icon=ic::SPINNER />
                    </span>
                </Show>

                <PhaseBadge />
            </div>

            {move || output().map(|json| view! {
                <pre class=css::output>{json}</pre>
            })}
        </section>
    }
}

/// Progress of the current or last publish attempt.
#[component]
fn PhaseBadge() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let phase = ctx.pipeline.phase;

    let class = move || match phase.get() {
        PublishPhase::Confirmed => css::badgeSuccess,
        PublishPhase::Failed => css::badgeFailed,
        _ => css::badge,
    };

    view! {
        <Show when=move || phase.get() != PublishPhase::Idle>
            <span class=class>
                {move || match phase.get() {
                    PublishPhase::Confirmed => view! { <Icon icon=ic::SUCCESS /> }.into_any(),
                    PublishPhase::Failed => view! { <Icon icon=ic::ALERT /> }.into_any(),
                    _ => ().into_any(),
                }}
                {move || phase.get().label()}
            </span>
        </Show>
    }
}
