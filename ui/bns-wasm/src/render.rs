//! Rendering of the header, form and recently minted list from a
//! [`ViewState`].

use bns_api_types::AppConfig;
use bns_pricing::{PricingPolicy, display_price};
use bns_view_state::{FormView, Logo, NameCard, ViewState, form_view, header, name_cards};
use wasm_bindgen::prelude::*;

use crate::dom::{self, Elements};

const POLYGON_LOGO: &str = "assets/polygonlogo.png";
const ETH_LOGO: &str = "assets/ethlogo.png";

pub fn render(els: &Elements, state: &ViewState, config: &AppConfig) {
    render_header(els, state);
    render_form(els, state, config);
    if let Err(err) = render_mints(els, state, config) {
        tracing::warn!("could not render names: {:?}", err);
    }
}

fn render_header(els: &Elements, state: &ViewState) {
    let header = header(state);
    dom::set_text(&els.wallet_label, &header.wallet);
    els.network_logo.set_src(match header.logo {
        Logo::Polygon => POLYGON_LOGO,
        Logo::Ethereum => ETH_LOGO,
    });
}

fn render_form(els: &Elements, state: &ViewState, config: &AppConfig) {
    let view = form_view(state);
    dom::set_visible(&els.connect_panel, view == FormView::NotConnected);
    dom::set_visible(
        &els.network_panel,
        matches!(view, FormView::WrongNetwork { .. }),
    );
    let (mint_mode, edit_mode, busy) = match &view {
        FormView::Mint { busy } => (true, false, *busy),
        FormView::Edit { busy, .. } => (false, true, *busy),
        _ => (false, false, false),
    };
    dom::set_visible(&els.form_panel, mint_mode || edit_mode);

    if let FormView::WrongNetwork { required } = &view {
        dom::set_text(
            &els.network_message,
            &format!("Please connect to the {required}"),
        );
    }

    dom::sync_input_value(&els.domain_input, &state.form.domain, dom::get_input_value);
    dom::sync_input_value(&els.record_input, &state.form.record, dom::get_input_raw);

    dom::set_visible(&els.mint_btn, mint_mode);
    dom::set_visible(&els.set_record_btn, edit_mode);
    dom::set_visible(&els.cancel_edit_btn, edit_mode);
    dom::set_visible(&els.retry_record_btn, state.pending_mint.is_some());
    for btn in [
        &els.mint_btn,
        &els.set_record_btn,
        &els.cancel_edit_btn,
        &els.retry_record_btn,
    ] {
        dom::set_disabled(btn, busy);
    }

    let policy = PricingPolicy::for_version(config.pricing_version).unwrap_or_default();
    let hint = if mint_mode {
        policy
            .price_for(&state.form.domain)
            .map(|wei| format!("{} MATIC", display_price(wei)))
            .unwrap_or_default()
    } else {
        String::new()
    };
    dom::set_text(&els.price_hint, &hint);
}

fn render_mints(els: &Elements, state: &ViewState, config: &AppConfig) -> Result<(), JsValue> {
    let cards = name_cards(state, config);
    dom::set_visible(&els.mints_panel, !cards.is_empty());
    els.mint_list.set_inner_html("");
    for card in &cards {
        let card = card_element(card)?;
        els.mint_list.append_child(&card)?;
    }
    Ok(())
}

fn card_element(card: &NameCard) -> Result<web_sys::Element, JsValue> {
    let item = dom::create_element("div")?;
    item.set_attribute("class", "mint-item")?;

    let row = dom::create_element("div")?;
    row.set_attribute("class", "mint-row")?;

    let link = dom::create_element("a")?;
    link.set_attribute("class", "link")?;
    link.set_attribute("href", &card.link)?;
    link.set_attribute("target", "_blank")?;
    link.set_attribute("rel", "noopener noreferrer")?;
    let title = dom::create_element("p")?;
    title.set_attribute("class", "underlined")?;
    dom::set_text(&title, &card.display_name);
    link.append_child(&title)?;
    row.append_child(&link)?;

    if card.editable {
        let edit = dom::create_element("button")?;
        edit.set_attribute("class", "edit-button")?;
        edit.set_attribute("data-name", &card.name)?;
        dom::set_text(&edit, "Edit");
        row.append_child(&edit)?;
    }
    item.append_child(&row)?;

    let record = dom::create_element("p")?;
    dom::set_text(&record, &card.record);
    item.append_child(&record)?;
    Ok(item)
}
