//! Browser implementation: DOM render target and History API.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Document, Element, HtmlElement};

use crate::app::History;
use crate::render::RenderTarget;

fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

/// `history.pushState` / `location.pathname`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

impl History for BrowserHistory {
    fn push(&self, path: &str) {
        let Some(win) = window() else { return };
        let pushed = win
            .history()
            .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(e) = pushed {
            log::warn!("⚠️ pushState({path}) failed: {e:?}");
        }
    }

    fn current_path(&self) -> String {
        window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }
}

/// Writes into the page by element id. Missing elements are skipped.
#[derive(Debug, Default, Clone)]
pub struct DomTarget {
    document: Option<Document>,
}

impl DomTarget {
    pub fn new() -> Self {
        DomTarget {
            document: document(),
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let el = self.document.as_ref()?.get_element_by_id(id);
        if el.is_none() {
            log::trace!("no element #{id}, write dropped");
        }
        el
    }

    fn each(&self, selector: &str, f: impl Fn(&Element)) {
        let Some(doc) = self.document.as_ref() else { return };
        let Ok(nodes) = doc.query_selector_all(selector) else { return };
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                f(&el);
            }
        }
    }
}

impl RenderTarget for DomTarget {
    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_html(&self, id: &str, html: &str) {
        if let Some(el) = self.element(id) {
            el.set_inner_html(html);
        }
    }

    fn set_visible(&self, id: &str, visible: bool) {
        let Some(el) = self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let display = if visible { "block" } else { "none" };
        let _ = el.style().set_property("display", display);
    }

    fn set_class(&self, id: &str, class: &str) {
        if let Some(el) = self.element(id) {
            el.set_class_name(class);
        }
    }

    fn show_page(&self, page_id: &str) {
        self.each(".page", |el| {
            let _ = el.class_list().remove_1("active");
        });
        if let Some(el) = self.element(page_id) {
            let _ = el.class_list().add_1("active");
        }
    }

    fn alert(&self, message: &str) {
        if let Some(win) = window() {
            let _ = win.alert_with_message(message);
        }
    }
}

/// Activate one address/transaction tab (`overview`, `transactions`,
/// `contract`, `tokens`, `logs`, ...).
pub fn show_tab(name: &str) {
    let target = DomTarget::new();
    target.each(".tab, .tab-pane", |el| {
        let _ = el.class_list().remove_1("active");
    });
    target.each(&format!(r#".tab[data-tab="{name}"]"#), |el| {
        let _ = el.class_list().add_1("active");
    });
    if let Some(pane) = target.element(&format!("{name}-tab")) {
        let _ = pane.class_list().add_1("active");
    }
}

#[wasm_bindgen]
extern "C" {
    // Clipboard bridge provided by the page; `catch` keeps a missing one from panicking.
    #[wasm_bindgen(js_namespace = window, js_name = __copy_text, catch)]
    fn copy_text_js(s: &str) -> Result<js_sys::Promise, JsValue>;
}

/// Copy an element's text through the page's clipboard bridge.
pub fn copy_element_text(id: &str) -> bool {
    let Some(text) = DomTarget::new().element(id).and_then(|el| el.text_content()) else {
        return false;
    };
    match copy_text_js(&text) {
        Ok(promise) => {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
            true
        }
        Err(e) => {
            log::warn!("⚠️ clipboard bridge unavailable: {e:?}");
            false
        }
    }
}
