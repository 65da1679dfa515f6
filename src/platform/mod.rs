//! Platform glue. Only the browser needs any; native runs on [`crate::render::MemoryTarget`]
//! and [`crate::app::MemoryHistory`].

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{copy_element_text, show_tab, BrowserHistory, DomTarget};
