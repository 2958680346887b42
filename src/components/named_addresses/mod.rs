//! Named-address editor.
//!
//! Rows with an empty name or address are kept in the editor but left out
//! of the compile request.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use movepub_core::models::EntryField;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/named_addresses/named_addresses.module.css");

#[component]
pub fn NamedAddressPanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let rows = move || {
        ctx.pipeline
            .registry
            .with(|r| r.entries().iter().cloned().enumerate().collect::<Vec<_>>())
    };

    view! {
        <section class=css::panel>
            <h2 class=css::heading>"Named addresses"</h2>

            <div class=css::rows>
                <For
                    each=rows
                    key=|(index, entry)| (*index, entry.name.clone(), entry.address.clone())
                    children=move |(index, entry)| view! {
                        <div class=css::row>
                            <input
                                class=css::nameInput
                                placeholder="name"
                                prop:value=entry.name
                                on:change=move |ev: ev::Event| {
                                    let value = event_target_value(&ev);
                                    ctx.update_registry(|r| r.with_field(index, EntryField::Name, value));
                                }
                            />
                            <input
                                class=css::addressInput
                                placeholder="0x..."
                                prop:value=entry.address
                                on:change=move |ev: ev::Event| {
                                    let value = event_target_value(&ev);
                                    ctx.update_registry(|r| r.with_field(index, EntryField::Address, value));
                                }
                            />
                            <button
                                class=css::iconButton
                                title="Remove"
                                on:click=move |_| ctx.update_registry(|r| r.without_entry(index))
                            >
                                <Icon icon=ic::CLOSE />
                            </button>
                        </div>
                    }
                />
            </div>

            <button
                class=css::addButton
                on:click=move |_| ctx.update_registry(|r| r.with_blank_entry())
            >
                <Icon icon=ic::PLUS />
                "Add named address"
            </button>
        </section>
    }
}
