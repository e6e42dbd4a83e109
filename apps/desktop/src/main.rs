use std::path::PathBuf;
use std::thread;

use anyhow::anyhow;
use crossbeam_channel::unbounded;
use eframe::NativeOptions;
use tracing_subscriber::EnvFilter;

mod app;
mod chart;
mod palette;

use app::App;

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    // The catalog fetch is the one asynchronous operation: the palette waits
    // on it, the planner itself does not.
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let path = catalog_path();
        tracing::info!(path = %path.display(), "loading catalog");
        let _ = tx.send(catalog::Catalog::load(&path));
    });

    let options = NativeOptions::default();
    eframe::run_native(
        "Build Order Planner",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(rx)))),
    )
    .map_err(|e| anyhow!("run ui: {e}"))
}

fn catalog_path() -> PathBuf {
    std::env::var_os("SC2_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sc2-data.json"))
}
