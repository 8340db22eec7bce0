//! Bunny Name Service WASM frontend
//!
//! Pure Rust + WASM single page for minting and editing `.bunny` names through
//! an injected wallet. Each concern lives in its own module.

pub mod dom;
pub mod events;
pub mod logging;
pub mod ops;
pub mod provider;
pub mod render;
pub mod state;

use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    logging::init();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    render::render(&els, &state::snapshot(), &state::config());
    events::bind_events(&els);

    ops::check_connection(&els).await;

    Ok(())
}
