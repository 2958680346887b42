//! Wallet connection logic using web-sys.
//!
//! Talks to the Aptos wallet injected as `window.aptos` (Petra and
//! compatible extensions) through direct JavaScript interop via the
//! Reflect API.

use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use serde::Deserialize;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::config::WALLET_SESSION_KEY;
use crate::error::WalletError;
use crate::models::{Network, PublishPayload, TransactionHash};
use crate::publish::Wallet;

/// Get the window.aptos object injected by the wallet extension.
fn get_aptos() -> Result<Object, WalletError> {
    let window = web_sys::window().ok_or(WalletError::NoWindow)?;
    Reflect::get(&window, &"aptos".into())
        .ok()
        .and_then(|v| v.dyn_into::<Object>().ok())
        .ok_or(WalletError::NotInstalled)
}

/// Call `aptos[method](...args)` and await the returned promise.
async fn aptos_call(method: &str, args: &Array) -> Result<JsValue, WalletError> {
    let aptos = get_aptos()?;

    let function = Reflect::get(&aptos, &method.into())
        .map_err(|_| WalletError::RequestCreationFailed)?
        .dyn_into::<Function>()
        .map_err(|_| WalletError::RequestCreationFailed)?;

    let promise: Promise = function
        .apply(&aptos, args)
        .map_err(|e| WalletError::RequestRejected(describe(&e)))?
        .dyn_into()
        .map_err(|_| WalletError::InvalidResponse(format!("{} did not return a promise", method)))?;

    JsFuture::from(promise)
        .await
        .map_err(|e| WalletError::RequestRejected(describe(&e)))
}

/// Best-effort text of a rejected promise value.
fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    Reflect::get(value, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Account returned by `connect()` / `account()`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalletAccount {
    pub address: String,
    #[serde(rename = "publicKey", default)]
    pub public_key: Option<String>,
}

fn parse_account(value: JsValue) -> Result<WalletAccount, WalletError> {
    let account: WalletAccount = serde_wasm_bindgen::from_value(value)
        .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;
    if account.address.is_empty() {
        return Err(WalletError::NoAccount);
    }
    Ok(account)
}

/// Check if an Aptos wallet is installed
pub fn is_available() -> bool {
    get_aptos().is_ok()
}

/// Request wallet connection (shows the wallet popup)
pub async fn connect() -> Result<WalletAccount, WalletError> {
    let result = aptos_call("connect", &Array::new()).await?;
    parse_account(result)
}

/// Get the currently connected account (no popup)
pub async fn account() -> Result<WalletAccount, WalletError> {
    let result = aptos_call("account", &Array::new()).await?;
    parse_account(result)
}

/// Read a network reported by the wallet.
///
/// Wallets report either a bare name or an object with `name` (or
/// `networkName`) and an optional `url`.
fn parse_network(value: &JsValue) -> Option<Network> {
    if let Some(name) = value.as_string() {
        return Some(Network::from_name(&name, None));
    }
    let field = |key: &str| {
        Reflect::get(value, &key.into())
            .ok()
            .and_then(|v| v.as_string())
            .filter(|v| !v.is_empty())
    };
    let name = field("name").or_else(|| field("networkName"))?;
    Some(Network::from_name(&name, field("url")))
}

/// Get the network the wallet is on.
pub async fn network() -> Option<Network> {
    let result = aptos_call("network", &Array::new()).await.ok()?;
    parse_network(&result)
}

/// Disconnect the wallet. Errors are ignored; the UI state is reset anyway.
pub async fn disconnect() {
    let _ = aptos_call("disconnect", &Array::new()).await;
}

/// Check if the user connected in an earlier visit (localStorage flag).
pub fn has_session() -> bool {
    local_storage()
        .and_then(|s| s.get_item(WALLET_SESSION_KEY).ok().flatten())
        .is_some()
}

/// Remember the connection in localStorage.
pub fn save_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(WALLET_SESSION_KEY, "1");
    }
}

/// Forget the connection.
pub fn clear_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(WALLET_SESSION_KEY);
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

// ============================================================================
// Event Listeners
// ============================================================================

/// Register `aptos[method](closure)`. The closure lives as long as the page.
fn register_listener(method: &str, closure: Closure<dyn Fn(JsValue)>) -> Result<(), WalletError> {
    let aptos = get_aptos()?;
    let on_fn = Reflect::get(&aptos, &method.into())
        .map_err(|_| WalletError::RequestCreationFailed)?
        .dyn_into::<Function>()
        .map_err(|_| WalletError::RequestCreationFailed)?;

    on_fn
        .call1(&aptos, closure.as_ref())
        .map_err(|_| WalletError::RequestCreationFailed)?;

    closure.forget();
    Ok(())
}

/// Register a callback for account changes.
///
/// The callback receives `None` when the wallet disconnects or locks.
pub fn on_account_change(callback: impl Fn(Option<String>) + 'static) -> Result<(), WalletError> {
    let closure = Closure::wrap(Box::new(move |account: JsValue| {
        let address = Reflect::get(&account, &"address".into())
            .ok()
            .and_then(|a| a.as_string())
            .filter(|a| !a.is_empty());
        callback(address);
    }) as Box<dyn Fn(JsValue)>);
    register_listener("onAccountChange", closure)
}

/// Register a callback for network changes.
pub fn on_network_change(callback: impl Fn(Network) + 'static) -> Result<(), WalletError> {
    let closure = Closure::wrap(Box::new(move |network: JsValue| {
        if let Some(network) = parse_network(&network) {
            callback(network);
        }
    }) as Box<dyn Fn(JsValue)>);
    register_listener("onNetworkChange", closure)
}

// ============================================================================
// Transactions
// ============================================================================

#[derive(Deserialize)]
struct SubmitResponse {
    hash: String,
}

/// Build the entry-function payload object the wallet expects.
fn payload_object(payload: &PublishPayload) -> Result<Object, WalletError> {
    let modules = Array::new();
    for module in &payload.modules {
        modules.push(&Uint8Array::from(module.as_slice()));
    }
    let arguments = Array::of2(&Uint8Array::from(payload.metadata.as_slice()), &modules);

    let object = Object::new();
    let set = |key: &str, value: &JsValue| {
        Reflect::set(&object, &key.into(), value).map_err(|_| WalletError::RequestCreationFailed)
    };
    set("type", &"entry_function_payload".into())?;
    set("function", &payload.function.into())?;
    set("type_arguments", &Array::new())?;
    set("arguments", &arguments)?;
    Ok(object)
}

/// The injected browser wallet.
#[derive(Clone, Copy, Debug, Default)]
pub struct InjectedWallet;

impl Wallet for InjectedWallet {
    async fn sign_and_submit(
        &self,
        payload: &PublishPayload,
    ) -> Result<TransactionHash, WalletError> {
        let object = payload_object(payload)?;
        let result = aptos_call("signAndSubmitTransaction", &Array::of1(&object)).await?;
        let response: SubmitResponse = serde_wasm_bindgen::from_value(result)
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;
        Ok(TransactionHash::new(response.hash))
    }
}
