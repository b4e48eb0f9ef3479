use crate::core::page::CursorTrail;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

mod contact;
mod cursor;
mod nav;
mod reveal;
mod tabs;
mod theme;

/// Wire every page interaction. Each feature is independent: a missing element
/// disables that feature only.
pub fn init_page(window: &web::Window, document: &web::Document, cursor: Rc<RefCell<CursorTrail>>) {
    cursor::start_follower(document, cursor);
    if let Err(e) = theme::wire_theme_toggle(window, document) {
        log::warn!("[ui] theme toggle disabled: {:?}", e);
    }
    nav::wire_navigation(window, document);
    if let Err(e) = reveal::wire_scroll_reveal(window, document) {
        log::warn!("[ui] scroll reveal disabled: {:?}", e);
    }
    tabs::wire_portfolio_tabs(document);
    tabs::style_project_cards(document);
    if let Err(e) = contact::wire_contact_form(window, document) {
        log::warn!("[ui] contact form disabled: {:?}", e);
    }
    nav::wire_mobile_menu(window, document);
    nav::wire_parallax(window, document);
}
