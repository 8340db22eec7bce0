//! Event binding.
//!
//! Wires all UI event listeners. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`.

use bns_view_state::Action;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom::{self, Elements};
use crate::ops;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        listen(&$el, "click", &cb);
        cb.forget();
    }};
}

/// Helper: dispatch an action built from an input's current value.
macro_rules! on_input {
    ($input:ident, $els:expr, $read:expr, $action:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let value = $read(&els.$input);
            ops::apply(&els, $action(value));
        }) as Box<dyn FnMut(_)>);
        listen(&$els.$input, "input", &cb);
        cb.forget();
    }};
}

fn listen<T: ?Sized>(target: &web_sys::EventTarget, event: &str, cb: &Closure<T>) {
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        tracing::warn!("could not bind {} listener: {:?}", event, err);
    }
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Wallet ──
    on_click_async!(els.connect_btn, els, ops::on_connect);
    on_click_async!(els.switch_network_btn, els, ops::on_switch_network);

    // ── Form inputs ──
    on_input!(domain_input, els, dom::get_input_value, Action::DomainChanged);
    on_input!(record_input, els, dom::get_input_raw, Action::RecordChanged);

    // ── Submissions ──
    on_click_async!(els.mint_btn, els, ops::on_mint);
    on_click_async!(els.set_record_btn, els, ops::on_set_record);
    on_click_async!(els.retry_record_btn, els, ops::on_retry_record);
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            ops::apply(&els2, Action::EditCancelled);
        }) as Box<dyn FnMut(_)>);
        listen(&els.cancel_edit_btn, "click", &cb);
        cb.forget();
    }

    // ── Edit buttons on owned names (delegated, cards are re-rendered) ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            let name = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .and_then(|el| el.closest("button[data-name]").ok().flatten())
                .and_then(|btn| btn.get_attribute("data-name"));
            if let Some(name) = name {
                ops::apply(&els2, Action::EditRequested(name));
            }
        }) as Box<dyn FnMut(_)>);
        listen(&els.mint_list, "click", &cb);
        cb.forget();
    }
}
