pub mod access;
pub mod clock;
pub mod config;
pub mod console;
pub mod control;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod flash;
pub mod logging;
pub mod otp;
pub mod store;

use std::time::Duration;

use device::{ConsoleReporter, Device, DeviceOptions, LogRelay};
use flash::FileFlash;
use store::{Layout, StorageContext};

fn open_store(cfg: &config::Config, path: &std::path::Path) -> anyhow::Result<StorageContext<FileFlash>> {
    let flash = FileFlash::open(path, cfg.flash_size)
        .map_err(|e| anyhow::anyhow!("Failed to open flash image {}: {e}", path.display()))?;
    StorageContext::open(flash, &Layout::for_device(cfg.flash_size))
        .map_err(|e| anyhow::anyhow!("Failed to open access store: {e}"))
}

pub fn wipe(cfg: config::Config) -> anyhow::Result<()> {
    let path = cfg.flash_path()?;
    if !path.exists() {
        println!("No flash image at {}, nothing to wipe", path.display());
        return Ok(());
    }
    let mut store = open_store(&cfg, &path)?;
    let before = store.config();
    store.reset()?;
    println!(
        "Forgot {} key(s) and {} log entries in {}",
        before.stored_keys,
        before.log_entries,
        path.display()
    );
    Ok(())
}

pub async fn run(cfg: config::Config) -> anyhow::Result<()> {
    let debug_switch = logging::init(cfg.verbose);

    tracing::info!("Starting bouncer");

    // Preflight checks
    diagnostics::check(&cfg)?;

    let path = cfg.flash_path()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Single-instance lock
    let lock_path = path.with_extension("lock");
    let lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock
        .try_write()
        .map_err(|_| anyhow::anyhow!("bouncer is already running (lock: {})", lock_path.display()))?;

    let store = open_store(&cfg, &path)?;
    let config = store.config();
    tracing::info!(
        keys = config.stored_keys,
        log_entries = config.log_entries,
        path = %path.display(),
        "Access store loaded"
    );

    let device = Device::new(
        store,
        Box::new(ConsoleReporter),
        Box::new(LogRelay),
        Box::new(clock::SystemClock),
        DeviceOptions {
            open_for: Duration::from_millis(cfg.open_millis),
            scan_interval: Duration::from_millis(cfg.scan_interval_millis),
        },
    )
    .with_debug_switch(debug_switch);

    let transport = console::start_console_transport();
    console::run_device_loop(transport.incoming_rx, transport.outgoing_tx, device).await;
    match transport.task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(anyhow::anyhow!("Console transport error: {e}")),
        Err(e) => return Err(anyhow::anyhow!("Console transport panicked: {e}")),
    }
    Ok(())
}
