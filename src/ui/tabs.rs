use crate::constants::{
    ACTIVE_CLASS, PROJECT_CARD_SELECTOR, TAB_CONTENT_SELECTOR, TAB_SELECTOR,
};
use crate::dom;
use std::rc::Rc;
use web_sys as web;

pub fn wire_portfolio_tabs(document: &web::Document) {
    let tabs = Rc::new(dom::query_all(document, TAB_SELECTOR));
    let contents = Rc::new(dom::query_all(document, TAB_CONTENT_SELECTOR));

    for tab in tabs.iter() {
        let tabs = tabs.clone();
        let contents = contents.clone();
        let this = tab.clone();
        dom::add_click_listener(tab, move |_ev| {
            let target = this.get_attribute("data-tab").unwrap_or_default();
            for t in tabs.iter() {
                _ = t.class_list().remove_1(ACTIVE_CLASS);
            }
            _ = this.class_list().add_1(ACTIVE_CLASS);
            for content in contents.iter() {
                _ = content
                    .class_list()
                    .toggle_with_force(ACTIVE_CLASS, content.id() == target);
            }
        });
    }
}

pub fn style_project_cards(document: &web::Document) {
    for card in dom::query_all(document, PROJECT_CARD_SELECTOR) {
        dom::set_style(&card, "cursor", "default");
    }
}
