//! Notification toasts.

use leptos::prelude::*;
use leptos_icons::Icon;
use movepub_core::models::{Notification, NotificationKind};

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/toast/toast.module.css");

#[component]
pub fn Toaster() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    view! {
        <div class=css::stack role="status" aria-live="polite">
            <For
                each=move || ctx.toasts.get()
                key=|n| n.id
                children=move |notification| view! { <Toast notification=notification /> }
            />
        </div>
    }
}

#[component]
fn Toast(notification: Notification) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let id = notification.id;

    let (class, icon) = match notification.kind {
        NotificationKind::Success => (css::toastSuccess, ic::SUCCESS),
        NotificationKind::Destructive => (css::toastDestructive, ic::ALERT),
    };

    view! {
        <div class=class>
            <span class=css::icon><Icon icon=icon /></span>
            <div class=css::body>
                <strong class=css::title>{notification.title}</strong>
                <span class=css::description>{notification.description}</span>
                {notification.link.map(|href| view! {
                    <a class=css::link href=href target="_blank" rel="noopener noreferrer">
                        "View on explorer"
                        <Icon icon=ic::EXTERNAL_LINK />
                    </a>
                })}
            </div>
            <button class=css::close title="Dismiss" on:click=move |_| ctx.dismiss(id)>
                <Icon icon=ic::CLOSE />
            </button>
        </div>
    }
}
