use crate::constants::{CONTACT_FORM_ID, SUBMIT_BUTTON_SELECTOR};
use crate::core::page::{ContactMessage, SubmitPhase};
use crate::core::{FORM_SENDING_MS, FORM_SENT_MS};
use crate::dom;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn read_message(form: &web::HtmlFormElement) -> anyhow::Result<ContactMessage> {
    let data = web::FormData::new_with_form(form).map_err(dom::js_err)?;
    let field = |name: &str| data.get(name).as_string().unwrap_or_default();
    Ok(ContactMessage {
        name: field("name"),
        email: field("email"),
        subject: field("subject"),
        message: field("message"),
    })
}

fn show_phase(button: &web::HtmlButtonElement, phase: SubmitPhase, idle_html: &str) {
    button.set_inner_html(phase.button_html().unwrap_or(idle_html));
    button.set_disabled(phase.button_disabled());
}

/// Simulated send: nothing leaves the page, the button just walks through
/// sending and sent before the form resets.
pub fn wire_contact_form(window: &web::Window, document: &web::Document) -> anyhow::Result<()> {
    let form = document
        .get_element_by_id(CONTACT_FORM_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CONTACT_FORM_ID))?
        .dyn_into::<web::HtmlFormElement>()
        .map_err(|_| anyhow::anyhow!("#{} is not a form", CONTACT_FORM_ID))?;
    let button = form
        .query_selector(SUBMIT_BUTTON_SELECTOR)
        .map_err(dom::js_err)?
        .and_then(|el| el.dyn_into::<web::HtmlButtonElement>().ok())
        .ok_or_else(|| anyhow::anyhow!("missing {}", SUBMIT_BUTTON_SELECTOR))?;

    let phase = Rc::new(Cell::new(SubmitPhase::Idle));
    let wnd = window.clone();
    let this_form = form.clone();
    dom::add_listener(&form, "submit", move |ev| {
        ev.prevent_default();
        let Some(next) = phase.get().submit() else {
            return;
        };
        match read_message(&this_form) {
            Ok(msg) => log::info!("[contact] form submitted: {:?}", msg),
            Err(e) => log::warn!("[contact] could not read form: {:?}", e),
        }

        let idle_html = button.inner_html();
        phase.set(next);
        show_phase(&button, next, &idle_html);

        let (phase, button, form, inner_wnd) =
            (phase.clone(), button.clone(), this_form.clone(), wnd.clone());
        dom::set_timeout(&wnd, FORM_SENDING_MS, move || {
            let sent = phase.get().elapse();
            phase.set(sent);
            show_phase(&button, sent, &idle_html);
            dom::set_timeout(&inner_wnd, FORM_SENT_MS, move || {
                let idle = phase.get().elapse();
                phase.set(idle);
                show_phase(&button, idle, &idle_html);
                form.reset();
            });
        });
    });
    Ok(())
}
