#![cfg_attr(target_arch = "wasm32", no_main)]

// DOM frontend for Pivex.
//
// The page provides the element ids the explorer writes into and calls the
// exported functions from its buttons:
//   import init, { navigate_block, show_list, perform_search } from "./pivex-web-dom.js";
//   await init();
//
// In-app links carry `data-route` and are routed without a reload. The RPC
// endpoint is read once from <meta name="pivex-rpc-url" content="...">.

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{window, Element, Event, HtmlInputElement, KeyboardEvent};

    use pivex::{
        app::{App, ListView},
        config::Config,
        explorer::Explorer,
        platform::{self, BrowserHistory, DomTarget},
        rpc_utils::HttpTransport,
        verify::VerificationRequest,
    };

    type WebApp = App<HttpTransport, DomTarget, BrowserHistory>;

    thread_local! {
        static APP: RefCell<Option<Rc<WebApp>>> = const { RefCell::new(None) };
    }

    fn app() -> Option<Rc<WebApp>> {
        APP.with(|a| a.borrow().clone())
    }

    /// Run `f` against the app on the local executor.
    fn spawn_with_app<F, Fut>(f: F)
    where
        F: FnOnce(Rc<WebApp>) -> Fut + 'static,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        match app() {
            Some(app) => spawn_local(f(app)),
            None => log::warn!("⚠️ explorer not started yet"),
        }
    }

    fn rpc_url_from_page() -> Option<String> {
        window()?
            .document()?
            .query_selector(r#"meta[name="pivex-rpc-url"]"#)
            .ok()??
            .get_attribute("content")
    }

    #[wasm_bindgen(start)]
    pub fn wasm_start() {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());

        let config = Config::for_browser(rpc_url_from_page());
        log::info!("🚀 Pivex starting - endpoint: {}", config.rpc_url);

        let explorer = Explorer::new(HttpTransport::new(config.rpc_url.clone()));
        let app = Rc::new(App::new(explorer, DomTarget::new(), BrowserHistory));
        APP.with(|a| *a.borrow_mut() = Some(app.clone()));

        install_listeners();
        start_auto_refresh(&config);
        spawn_local(async move { app.start().await });
    }

    fn install_listeners() {
        let Some(win) = window() else { return };
        let Some(doc) = win.document() else { return };

        let on_popstate = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            spawn_with_app(|app| async move {
                app.handle_route().await;
            });
        });
        let _ = win.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
        on_popstate.forget();

        // delegated clicks on in-app links
        let on_click = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            let link = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-route]").ok().flatten());
            let Some(path) = link.and_then(|el| el.get_attribute("data-route")) else {
                return;
            };
            e.prevent_default();
            spawn_with_app(move |app| async move {
                app.navigate(&path).await;
            });
        });
        let _ = doc.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        on_click.forget();

        if let Some(input) = doc.get_element_by_id("searchInput") {
            let on_key = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
                let enter = e
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|k| k.key() == "Enter");
                if enter {
                    perform_search();
                }
            });
            let _ = input.add_event_listener_with_callback("keypress", on_key.as_ref().unchecked_ref());
            on_key.forget();
        }
    }

    /// Fires every interval; each tick runs as its own task, so a slow tick
    /// may still be running when the next one starts.
    fn start_auto_refresh(config: &Config) {
        let millis = config.refresh_interval.as_millis().min(u32::MAX as u128) as u32;
        gloo_timers::callback::Interval::new(millis, || {
            spawn_with_app(|app| async move {
                app.auto_refresh_tick().await;
            });
        })
        .forget();
    }

    #[wasm_bindgen]
    pub fn navigate(path: String) {
        spawn_with_app(move |app| async move {
            app.navigate(&path).await;
        });
    }

    /// Search box button / Enter key.
    #[wasm_bindgen]
    pub fn perform_search() {
        let query = window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("searchInput"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();
        spawn_with_app(move |app| async move {
            app.search(&query).await;
        });
    }

    #[wasm_bindgen]
    pub fn navigate_block(direction: i32) {
        spawn_with_app(move |app| async move {
            app.navigate_block(direction as i64).await;
        });
    }

    /// `blocks`, `txs`, `contracts` or `tokens`.
    #[wasm_bindgen]
    pub fn show_list(name: String) {
        let Some(view) = ListView::from_name(&name) else {
            log::warn!("⚠️ unknown list {name:?}");
            return;
        };
        spawn_with_app(move |app| async move {
            app.show_list(view).await;
        });
    }

    #[wasm_bindgen]
    pub fn show_tab(name: String) {
        platform::show_tab(&name);
    }

    #[wasm_bindgen]
    pub fn copy_to_clipboard(element_id: String) -> bool {
        platform::copy_element_text(&element_id)
    }

    #[wasm_bindgen]
    pub fn show_verify_contract() {
        if let Some(app) = app() {
            app.show_verify_contract();
        }
    }

    #[wasm_bindgen]
    pub fn close_verify_modal() {
        if let Some(app) = app() {
            app.close_verify_modal();
        }
    }

    #[wasm_bindgen]
    pub fn verify_contract(
        contract_name: String,
        compiler: String,
        optimization: String,
        source_code: String,
        constructor_args: String,
    ) {
        let request = VerificationRequest::from_form(
            &contract_name,
            &compiler,
            &optimization,
            &source_code,
            &constructor_args,
        );
        if let Some(app) = app() {
            app.verify_contract(&request);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("pivex-web-dom is only supported on wasm32 targets");
}
