mod app;
mod components;
mod config;

use app::App;
use leptos::prelude::*;
use movepub_core::config::LOG_LEVEL;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    movepub_core::log::init(LOG_LEVEL);

    let root = document()
        .get_element_by_id("app")
        .expect("Failed to find #app element")
        .unchecked_into::<web_sys::HtmlElement>();

    mount_to(root, App).forget();
}
