//! Title bar with wallet connection.
//!
//! Shows the shortened account address and the wallet's network. Everything
//! below the header is gated on a connected wallet.

use leptos::prelude::*;
use leptos_icons::Icon;
use movepub_core::models::{WalletState, is_valid_network_name};
use movepub_core::wallet;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::{APP_NAME, APP_TAGLINE};

stylance::import_crate_style!(css, "src/components/header/header.module.css");

#[component]
pub fn WalletHeader() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let account = Signal::derive(move || ctx.wallet.with(|w| w.display_name()));
    let network = Signal::derive(move || {
        ctx.wallet
            .with(|w| w.network().map(|n| n.name().to_string()))
    });
    let network_class = move || match network.get() {
        Some(name) if !is_valid_network_name(&name) => css::networkInvalid,
        _ => css::network,
    };

    let on_click = move |_| match ctx.wallet.get_untracked() {
        WalletState::Connected { .. } => ctx.disconnect_wallet(),
        WalletState::Disconnected => ctx.connect_wallet(),
        WalletState::Connecting => {}
    };
    let button_label = move || match ctx.wallet.get() {
        WalletState::Connected { .. } => "Disconnect",
        WalletState::Connecting => "Connecting...",
        WalletState::Disconnected if wallet::is_available() => "Connect Wallet",
        WalletState::Disconnected => "Install Wallet",
    };

    view! {
        <header class=css::bar>
            <div class=css::brand>
                <span class=css::title>{APP_NAME}</span>
                <span class=css::tagline>{APP_TAGLINE}</span>
            </div>

            <div class=css::session>
                <Show when=move || ctx.wallet.with(|w| w.is_connected())>
                    <span class=css::account title=move || {
                        ctx.wallet.with(|w| w.address().unwrap_or_default().to_string())
                    }>
                        <Icon icon=ic::USER />
                        {account}
                    </span>
                    <span class=network_class>
                        <Icon icon=ic::NETWORK />
                        {move || network.get().unwrap_or_else(|| "unknown".to_string())}
                    </span>
                </Show>

                <button
                    class=css::connectButton
                    on:click=on_click
                    disabled=move || ctx.wallet.with(|w| *w == WalletState::Connecting)
                >
                    <Icon icon=ic::WALLET />
                    {button_label}
                </button>
            </div>
        </header>
    }
}
