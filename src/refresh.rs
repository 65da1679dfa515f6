//! Home page auto refresh.

use std::time::Duration;

use crate::app::{App, History};
use crate::render::RenderTarget;
use crate::rpc_utils::RpcTransport;

pub const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

/// Tick forever, calling `on_tick` after every tick that reloaded the home page.
///
/// Ticks run back to back here; the browser fires them from a timer instead and
/// lets them overlap.
pub async fn run_auto_refresh<T, R, H>(
    app: &App<T, R, H>,
    interval: Duration,
    mut on_tick: impl FnMut(&App<T, R, H>),
) where
    T: RpcTransport,
    R: RenderTarget,
    H: History,
{
    log::info!("🚀 auto refresh started - every {}s", interval.as_secs());
    loop {
        log::debug!("😴 Sleeping for {}ms...", interval.as_millis());
        sleep(interval).await;
        if app.auto_refresh_tick().await {
            log::debug!("🔄 home refreshed");
            on_tick(app);
        } else {
            log::debug!("💤 home not active, tick skipped");
        }
    }
}
