//! gifpick - search Giphy and print the chosen GIF.
//!
//! The selected item is written to stdout as one line of JSON, so the picker
//! can be used from scripts:
//!
//! ```text
//! GIPHY_API_KEY=... gifpick | jq -r .images.original.url
//! ```

use std::io::Write;
use std::sync::Arc;

use gifpick_core::{PickerConfig, SearchResult};
use gifpick_engine::{GiphyBackend, PickerSession};
use gifpick_ui::window::run_picker;
use tokio::sync::mpsc;

fn print_selection(item: &SearchResult) {
    let line = match serde_json::to_string(item.raw()) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!("Failed to encode selection: {}", e);
            return;
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{line}").and_then(|_| stdout.flush()) {
        tracing::error!("Failed to write selection: {}", e);
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    tracing::error!("{}", message);
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("gifpick starting...");

    let config = match PickerConfig::load() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    // Searches run on tokio workers; GPUI keeps the main thread.
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => fail(format!("Failed to create tokio runtime: {e}")),
    };
    let _guard = rt.enter();

    let backend = match GiphyBackend::new(&config) {
        Ok(backend) => Arc::new(backend),
        Err(e) => fail(e),
    };

    let (close_tx, close_rx) = mpsc::channel::<()>(1);
    let session = PickerSession::new(
        backend,
        config.empty_query,
        Arc::new(print_selection),
        rt.handle().clone(),
    )
    .with_request_close(Arc::new(move || {
        let _ = close_tx.try_send(());
    }));

    tracing::info!(endpoint = %config.endpoint, limit = ?config.limit, "Picker ready");
    run_picker(config, session, close_rx);
}
