// Native binary for Pivex - renders explorer pages as text

use anyhow::{bail, Context, Result};
use clap::Parser;

use pivex::{
    app::{App, History, MemoryHistory, SearchOutcome},
    config::{CliArgs, Config},
    explorer::Explorer,
    html,
    refresh::run_auto_refresh,
    render::{ids, MemoryTarget},
    rpc_utils::HttpTransport,
};

type CliApp = App<HttpTransport, MemoryTarget, MemoryHistory>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let cfg = Config::from_args(&args).context("Failed to load configuration")?;
    if log::log_enabled!(log::Level::Info) {
        cfg.print_summary();
    }

    let transport = HttpTransport::new(cfg.rpc_url.clone()).with_timeout_ms(cfg.rpc_timeout_ms);
    let app: CliApp = App::new(
        Explorer::new(transport),
        MemoryTarget::new(),
        MemoryHistory::new(&args.path),
    );

    if let Some(query) = &args.search {
        if app.search(query).await == SearchOutcome::Rejected {
            print_alerts(&app);
            bail!("search for {query:?} matched nothing");
        }
    } else if let Some(view) = args.list {
        app.show_list(view).await;
    } else {
        app.start().await;
    }
    print_page(&app);
    print_alerts(&app);

    if args.watch {
        if !app.state().is_home_active() {
            log::warn!("--watch only refreshes the home page");
        }
        let refreshing = run_auto_refresh(&app, cfg.refresh_interval, print_page);
        tokio::select! {
            _ = refreshing => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("👋 interrupted, exiting");
            }
        }
    }
    Ok(())
}

/// Dump every filled region of the active page.
fn print_page(app: &CliApp) {
    let target = app.target();
    let Some(page) = target.active_page() else { return };
    println!("== {page} ({}) ==", app.history().current_path());
    for id in ids::for_page(&page) {
        let Some(region) = target.region(id) else { continue };
        if region.visible == Some(false) {
            continue;
        }
        let Some(content) = region.content() else { continue };
        let text = html::to_plain_text(content);
        if text.contains('\n') {
            println!("{id}:");
            for line in text.lines() {
                println!("    {line}");
            }
        } else {
            println!("{id}: {text}");
        }
    }
    println!();
}

fn print_alerts(app: &CliApp) {
    for alert in app.target().alerts() {
        eprintln!("! {alert}");
    }
}
