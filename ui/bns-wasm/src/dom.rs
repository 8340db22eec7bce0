//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add new UI elements, add a
//! field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement};

// ── Helpers ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

/// Input value exactly as typed.
pub fn get_input_raw(el: &HtmlInputElement) -> String {
    el.value()
}

/// Update an input only when `read` disagrees with `val`, so the caret is not
/// reset while the user is typing.
pub fn sync_input_value(el: &HtmlInputElement, val: &str, read: fn(&HtmlInputElement) -> String) {
    if read(el) != val {
        el.set_value(val);
    }
}

pub fn set_visible(el: &HtmlElement, visible: bool) {
    let _ = el
        .style()
        .set_property("display", if visible { "" } else { "none" });
}

pub fn set_disabled(el: &HtmlElement, disabled: bool) {
    if disabled {
        let _ = el.set_attribute("disabled", "");
    } else {
        let _ = el.remove_attribute("disabled");
    }
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

pub fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

pub fn reload() {
    let _ = window().location().reload();
}

// ── Elements struct ──

/// All DOM element references used by the name service page.
#[derive(Clone)]
pub struct Elements {
    // Header
    pub wallet_label: Element,
    pub network_logo: HtmlImageElement,

    // Connect
    pub connect_panel: HtmlElement,
    pub connect_btn: HtmlElement,

    // Wrong network
    pub network_panel: HtmlElement,
    pub network_message: Element,
    pub switch_network_btn: HtmlElement,

    // Form
    pub form_panel: HtmlElement,
    pub domain_input: HtmlInputElement,
    pub record_input: HtmlInputElement,
    pub price_hint: Element,
    pub mint_btn: HtmlElement,
    pub set_record_btn: HtmlElement,
    pub cancel_edit_btn: HtmlElement,
    pub retry_record_btn: HtmlElement,

    // Recently minted
    pub mints_panel: HtmlElement,
    pub mint_list: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_img {
    ($id:expr) => {
        by_id_typed::<HtmlImageElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing img #{}", $id)))?
    };
}

impl Elements {
    pub fn bind() -> Result<Self, JsValue> {
        Ok(Self {
            wallet_label: get_el!("walletLabel"),
            network_logo: get_img!("networkLogo"),

            connect_panel: get_html!("connectPanel"),
            connect_btn: get_html!("connectBtn"),

            network_panel: get_html!("networkPanel"),
            network_message: get_el!("networkMessage"),
            switch_network_btn: get_html!("switchNetworkBtn"),

            form_panel: get_html!("formPanel"),
            domain_input: get_input!("domainInput"),
            record_input: get_input!("recordInput"),
            price_hint: get_el!("priceHint"),
            mint_btn: get_html!("mintBtn"),
            set_record_btn: get_html!("setRecordBtn"),
            cancel_edit_btn: get_html!("cancelEditBtn"),
            retry_record_btn: get_html!("retryRecordBtn"),

            mints_panel: get_html!("mintsPanel"),
            mint_list: get_el!("mintList"),
        })
    }
}
