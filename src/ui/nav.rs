use crate::constants::{
    ACTIVE_CLASS, MENU_TOGGLE_SELECTOR, NAV_LINKS_SELECTOR, NAV_LINK_SELECTOR, PARALLAX_SELECTOR,
    SECTION_SELECTOR,
};
use crate::core::page;
use crate::dom;
use std::rc::Rc;
use web_sys as web;

fn scroll_y(window: &web::Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

fn highlight_active_link(window: &web::Window, sections: &[web::Element], links: &[web::Element]) {
    let ids: Vec<(String, f64)> = sections
        .iter()
        .map(|s| (s.id(), dom::offset_top(s)))
        .collect();
    let current = page::active_section(
        scroll_y(window),
        ids.iter().map(|(id, top)| (id.as_str(), *top)),
    );
    for link in links {
        let href = link.get_attribute("href").unwrap_or_default();
        _ = link
            .class_list()
            .toggle_with_force(ACTIVE_CLASS, page::link_is_active(&href, current));
    }
}

/// Scroll-spy highlighting plus smooth in-page scrolling for nav links.
pub fn wire_navigation(window: &web::Window, document: &web::Document) {
    let links = Rc::new(dom::query_all(document, NAV_LINK_SELECTOR));
    let sections = Rc::new(dom::query_all(document, SECTION_SELECTOR));

    {
        let wnd = window.clone();
        let links = links.clone();
        let sections = sections.clone();
        dom::add_passive_listener(window, "scroll", move |_ev| {
            highlight_active_link(&wnd, &sections, &links);
        });
    }

    for link in links.iter() {
        let wnd = window.clone();
        let doc = document.clone();
        let this = link.clone();
        dom::add_click_listener(link, move |ev| {
            ev.prevent_default();
            let Some(href) = this.get_attribute("href") else {
                return;
            };
            let Ok(Some(section)) = doc.query_selector(&href) else {
                log::debug!("[nav] no target for {}", href);
                return;
            };
            let opts = web::ScrollToOptions::new();
            opts.set_top(page::scroll_target_for(dom::offset_top(&section)));
            opts.set_behavior(web::ScrollBehavior::Smooth);
            wnd.scroll_to_with_scroll_to_options(&opts);
        });
    }
}

pub fn wire_mobile_menu(window: &web::Window, document: &web::Document) {
    let (Ok(Some(toggle)), Ok(Some(nav_links))) = (
        document.query_selector(MENU_TOGGLE_SELECTOR),
        document.query_selector(NAV_LINKS_SELECTOR),
    ) else {
        return;
    };

    {
        let toggle_el = toggle.clone();
        let nav_links = nav_links.clone();
        dom::add_click_listener(&toggle, move |_ev| {
            let left = dom::get_style(&nav_links, "left");
            dom::set_style(&nav_links, "left", page::toggled_menu_left(&left));
            _ = toggle_el.class_list().toggle(ACTIVE_CLASS);
        });
    }

    for link in dom::query_all(document, NAV_LINK_SELECTOR) {
        let wnd = window.clone();
        let toggle = toggle.clone();
        let nav_links = nav_links.clone();
        dom::add_click_listener(&link, move |_ev| {
            let width = wnd
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(f64::MAX);
            if page::is_mobile_width(width) {
                dom::set_style(&nav_links, "left", "-100%");
                _ = toggle.class_list().remove_1(ACTIVE_CLASS);
            }
        });
    }
}

pub fn wire_parallax(window: &web::Window, document: &web::Document) {
    let doc = document.clone();
    let wnd = window.clone();
    dom::add_passive_listener(window, "scroll", move |_ev| {
        let offset = page::parallax_offset(scroll_y(&wnd));
        for el in dom::query_all(&doc, PARALLAX_SELECTOR) {
            dom::set_style(&el, "transform", &format!("translateY({}px)", offset));
        }
    });
}
