use crate::constants::{THEME_ATTRIBUTE, THEME_ICON_SELECTOR, THEME_TOGGLE_ID};
use crate::core::{Theme, THEME_STORAGE_KEY};
use crate::dom;
use web_sys as web;

fn stored_theme(window: &web::Window) -> Theme {
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|s| s.get_item(THEME_STORAGE_KEY).ok().flatten());
    Theme::from_stored(stored.as_deref())
}

fn store_theme(window: &web::Window, theme: Theme) {
    match window.local_storage() {
        Ok(Some(storage)) => {
            if let Err(e) = storage.set_item(THEME_STORAGE_KEY, theme.as_str()) {
                log::warn!("[theme] could not persist: {:?}", e);
            }
        }
        _ => log::warn!("[theme] localStorage unavailable"),
    }
}

fn apply_theme(document: &web::Document, theme: Theme) {
    if let Some(html) = document.document_element() {
        _ = html.set_attribute(THEME_ATTRIBUTE, theme.as_str());
    }
    if let Ok(Some(icon)) = document.query_selector(THEME_ICON_SELECTOR) {
        icon.set_class_name(theme.icon_class());
    }
}

fn current_theme(document: &web::Document) -> Theme {
    let attr = document
        .document_element()
        .and_then(|html| html.get_attribute(THEME_ATTRIBUTE));
    Theme::from_stored(attr.as_deref())
}

pub fn wire_theme_toggle(window: &web::Window, document: &web::Document) -> anyhow::Result<()> {
    let theme = stored_theme(window);
    apply_theme(document, theme);
    log::info!("[theme] {}", theme.as_str());

    let toggle = document
        .get_element_by_id(THEME_TOGGLE_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", THEME_TOGGLE_ID))?;
    let doc = document.clone();
    let wnd = window.clone();
    dom::add_click_listener(&toggle, move |_ev| {
        let next = current_theme(&doc).toggled();
        apply_theme(&doc, next);
        store_theme(&wnd, next);
    });
    Ok(())
}
