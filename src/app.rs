//! Root application module.
//!
//! Contains the main App component and the AppContext that mirrors the
//! core [`Session`] into Leptos signals.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use movepub_core::config::{CompileMode, compile_mode};
use movepub_core::models::{
    BundleSummary, CompileResult, NamedAddressRegistry, Network, Notification, WalletState,
};
use movepub_core::{
    CompilerClient, HttpTransport, InjectedWallet, PublishPhase, Publisher, RestChainClient,
    Session, SessionEvent, files_from_list, wallet,
};
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::components::{CompilePanel, NamedAddressPanel, Toaster, UploadPanel, WalletHeader};
use crate::config::{MAX_TOASTS, TOAST_DURATION_MS};

stylance::import_crate_style!(css, "src/app.module.css");

type AppSession = Session<HttpTransport>;

// ============================================================================
// PipelineState
// ============================================================================

/// Read-only mirror of the session state.
///
/// Updated only from [`SessionEvent`]s; components read these signals and
/// call [`AppContext`] methods to act.
#[derive(Clone, Copy)]
pub struct PipelineState {
    pub busy: RwSignal<bool>,
    pub bundle: RwSignal<Option<BundleSummary>>,
    pub registry: RwSignal<NamedAddressRegistry>,
    pub result: RwSignal<Option<CompileResult>>,
    pub phase: RwSignal<PublishPhase>,
}

impl PipelineState {
    fn new() -> Self {
        Self {
            busy: RwSignal::new(false),
            bundle: RwSignal::new(None),
            registry: RwSignal::new(NamedAddressRegistry::new()),
            result: RwSignal::new(None),
            phase: RwSignal::new(PublishPhase::Idle),
        }
    }

    fn apply(&self, event: SessionEvent, toasts: RwSignal<Vec<Notification>>) {
        match event {
            SessionEvent::Busy(busy) => self.busy.set(busy),
            SessionEvent::BundleChanged(bundle) => self.bundle.set(bundle),
            SessionEvent::RegistryChanged(registry) => self.registry.set(registry),
            SessionEvent::ResultChanged(result) => self.result.set(result),
            SessionEvent::PublishPhase(phase) => self.phase.set(phase),
            SessionEvent::Notify(notification) => push_toast(toasts, notification),
        }
    }
}

/// Show a toast and schedule its dismissal.
fn push_toast(toasts: RwSignal<Vec<Notification>>, notification: Notification) {
    let id = notification.id;
    toasts.update(|list| {
        list.push(notification);
        if list.len() > MAX_TOASTS {
            list.remove(0);
        }
    });
    Timeout::new(TOAST_DURATION_MS, move || {
        let _ = toasts.try_update(|list| list.retain(|n| n.id != id));
    })
    .forget();
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree; access it with
/// `expect_context::<AppContext>()`.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Wallet connection state.
    pub wallet: RwSignal<WalletState>,
    /// Mirror of the compile/publish session.
    pub pipeline: PipelineState,
    /// Toasts currently on screen.
    pub toasts: RwSignal<Vec<Notification>>,
    session: StoredValue<Rc<AppSession>, LocalStorage>,
}

impl AppContext {
    pub fn new() -> Self {
        let pipeline = PipelineState::new();
        let toasts = RwSignal::new(Vec::new());
        let compiler = CompilerClient::new(HttpTransport);
        let session = Session::new(compiler, compile_mode(), move |event| {
            pipeline.apply(event, toasts)
        });

        Self {
            wallet: RwSignal::new(WalletState::default()),
            pipeline,
            toasts,
            session: StoredValue::new_local(Rc::new(session)),
        }
    }

    fn session(&self) -> Rc<AppSession> {
        self.session.get_value()
    }

    pub fn notify(&self, notification: Notification) {
        push_toast(self.toasts, notification);
    }

    pub fn dismiss(&self, id: usize) {
        self.toasts.update(|list| list.retain(|n| n.id != id));
    }

    pub fn uses_named_addresses(&self) -> bool {
        self.session().mode() == CompileMode::NamedAddresses
    }

    // ------------------------------------------------------------------------
    // Wallet
    // ------------------------------------------------------------------------

    pub fn connect_wallet(&self) {
        let state = self.wallet;
        let ctx = *self;
        state.set(WalletState::Connecting);
        spawn_local(async move {
            match wallet::connect().await {
                Ok(account) => {
                    let network = wallet::network().await;
                    info!(address = %account.address, network = ?network, "wallet connected");
                    wallet::save_session();
                    state.set(WalletState::Connected {
                        address: account.address,
                        network,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "wallet connection failed");
                    state.set(WalletState::Disconnected);
                    ctx.notify(Notification::error("Wallet connection failed", e.to_string()));
                }
            }
        });
    }

    pub fn disconnect_wallet(&self) {
        let state = self.wallet;
        spawn_local(async move {
            wallet::disconnect().await;
            wallet::clear_session();
            state.set(WalletState::Disconnected);
        });
    }

    /// Reconnect silently if the user connected in an earlier visit, and
    /// follow account and network changes from then on.
    pub fn restore_wallet(&self) {
        if !wallet::is_available() {
            return;
        }
        let state = self.wallet;

        let _ = wallet::on_account_change(move |address| match address {
            Some(address) => state.update(|w| {
                if let WalletState::Connected { address: current, .. } = w {
                    *current = address;
                }
            }),
            None => {
                wallet::clear_session();
                state.set(WalletState::Disconnected);
            }
        });
        let _ = wallet::on_network_change(move |network: Network| {
            state.update(|w| {
                if let WalletState::Connected { network: current, .. } = w {
                    *current = Some(network);
                }
            });
        });

        if !wallet::has_session() {
            return;
        }
        spawn_local(async move {
            match wallet::account().await {
                Ok(account) => {
                    let network = wallet::network().await;
                    state.set(WalletState::Connected {
                        address: account.address,
                        network,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "could not restore wallet session");
                    wallet::clear_session();
                }
            }
        });
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    pub fn select_files(&self, list: web_sys::FileList) {
        let files = files_from_list(&list);
        let session = self.session();
        spawn_local(async move {
            let _ = session.select_files(&files).await;
        });
    }

    pub fn clear_files(&self) {
        self.session().clear_files();
    }

    pub fn update_registry(
        &self,
        f: impl FnOnce(NamedAddressRegistry) -> NamedAddressRegistry,
    ) {
        self.session().update_registry(f);
    }

    pub fn seed_manifest_addresses(&self) -> usize {
        self.session().seed_manifest_addresses()
    }

    pub fn compile(&self) {
        let account = self
            .wallet
            .with_untracked(|w| w.address().map(str::to_string));
        let session = self.session();
        spawn_local(async move {
            let _ = session.compile(account.as_deref()).await;
        });
    }

    pub fn publish(&self) {
        let network = self.wallet.with_untracked(|w| w.network().cloned());
        let Some(fullnode) = network.as_ref().and_then(Network::fullnode_url) else {
            warn!(network = ?network, "no fullnode endpoint for wallet network");
            let name = network.as_ref().map_or("unknown", Network::name).to_string();
            self.notify(Notification::error(
                "Unsupported network",
                format!("No fullnode endpoint for network {}", name),
            ));
            return;
        };

        let publisher =
            Publisher::new(InjectedWallet, RestChainClient::new(fullnode)).with_network(network);
        let session = self.session();
        spawn_local(async move {
            let _ = session.publish(&publisher).await;
        });
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);
    ctx.restore_wallet();

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div class=css::fallback>
                    <h1>"Something went wrong"</h1>
                    <p>"An unexpected error occurred. Please try reloading the page."</p>
                    <ul>
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button on:click=move |_| {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    }>
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <div class=css::layout>
                <WalletHeader />
                <main class=css::main>
                    <UploadPanel />
                    <Show when=move || ctx.uses_named_addresses()>
                        <NamedAddressPanel />
                    </Show>
                    <CompilePanel />
                </main>
                <Toaster />
            </div>
        </ErrorBoundary>
    }
}
