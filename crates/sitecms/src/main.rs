// # sitecms - Site CMS command line
//
// A thin layer over sitecms-core: every command loads the shared document
// through a view, applies at most one change (persist, then render), and
// exits. `watch` keeps a view running and rewrites its output file whenever
// the document changes, including changes made by other processes.
//
// ## Configuration
//
// Global options can also be given as environment variables:
//
// - `SITECMS_STORAGE_TYPE`: Storage backend (file, memory)
// - `SITECMS_STORAGE_DIR`: Directory for the file backend
// - `SITECMS_STORAGE_KEY`: Key the document is persisted under
// - `SITECMS_PREFERS_DARK`: Ambient dark color-scheme preference
// - `SITECMS_POLL_INTERVAL_MS`: Poll interval for external changes (watch)
// - `SITECMS_LOG_LEVEL`: Log level (trace, debug, info, warn, error)
//
// ## Example
//
// ```bash
// export SITECMS_STORAGE_DIR=/var/lib/sitecms
//
// sitecms set i-brand "AC Technology"
// sitecms remove service 1
// sitecms watch --view public --out /srv/www/index.html
// ```

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sitecms_core::{
    AdminRenderer, BackendRegistry, CmsConfig, ConfigStore, DisplayConfig, Edit,
    ExternalChangeWatcher, Field, STORAGE_KEY, StorageConfig, SyncConfig, View,
};
use tokio::sync::oneshot;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use cli::{Cli, Collection, Command, GlobalOpts, ThemeCommand, ViewKind};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum CmsExitCode {
    /// Command completed
    Success = 0,
    /// Configuration, usage, or import error
    ConfigError = 1,
    /// Runtime error (storage, I/O)
    RuntimeError = 2,
}

impl From<CmsExitCode> for ExitCode {
    fn from(code: CmsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl GlobalOpts {
    /// Build the library configuration from command-line and environment
    fn to_config(&self) -> CmsConfig {
        let storage = match self.storage {
            cli::StorageKind::File => StorageConfig::File {
                dir: self.storage_dir.to_string_lossy().into_owned(),
            },
            cli::StorageKind::Memory => StorageConfig::Memory,
        };

        CmsConfig {
            storage,
            storage_key: self
                .storage_key
                .clone()
                .unwrap_or_else(|| STORAGE_KEY.to_string()),
            display: DisplayConfig {
                prefers_dark: self.prefers_dark,
            },
            sync: SyncConfig {
                poll_interval_ms: self.poll_interval_ms,
                ..SyncConfig::default()
            },
        }
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "SITECMS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version also end up here
            return if e.use_stderr() {
                CmsExitCode::ConfigError.into()
            } else {
                CmsExitCode::Success.into()
            };
        }
    };

    let log_level = match cli.global.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CmsExitCode::ConfigError.into();
        }
    };

    let config = cli.global.to_config();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CmsExitCode::ConfigError.into();
    }

    // stdout carries rendered pages and JSON, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CmsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CmsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run(cli.command, config).await {
            Ok(()) => CmsExitCode::Success,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                exit_code_for(&e)
            }
        }
    });

    result.into()
}

/// User mistakes exit with 1, everything else with 2
fn exit_code_for(err: &anyhow::Error) -> CmsExitCode {
    match err.downcast_ref::<sitecms_core::Error>() {
        Some(e) if e.is_user_facing() => CmsExitCode::ConfigError,
        Some(sitecms_core::Error::Config(_)) => CmsExitCode::ConfigError,
        _ => CmsExitCode::RuntimeError,
    }
}

async fn run(command: Command, config: CmsConfig) -> Result<()> {
    let registry = BackendRegistry::with_builtin();
    let backend = registry.create_backend(&config.storage)?;
    let store = ConfigStore::from_config(backend, &config)?;
    debug!("Using {:?}", store);

    match command {
        Command::Show { keys: true } => {
            for key in store.stored_keys().await? {
                println!("{}", key);
            }
        }

        Command::Show { keys: false } => {
            println!("{}", store.load().await.to_export()?);
        }

        Command::Render { view, out } => {
            let (mut view, _events) = View::from_config(store, view.renderer(), &config);
            let html = view.load().await;
            match out {
                Some(path) => write_output(&path, html).await?,
                None => println!("{}", html),
            }
        }

        Command::Set { field, value } => {
            let field: Field = field.parse()?;
            apply(store, &config, Edit::Set { field, value }).await?;
        }

        Command::Add { collection } => {
            let edit = match collection {
                Collection::Service => Edit::AddService,
                Collection::Partner => Edit::AddPartner,
                Collection::Project => Edit::AddProject,
            };
            apply(store, &config, edit).await?;
        }

        Command::Remove { collection, index } => {
            let edit = match collection {
                Collection::Service => Edit::RemoveService(index),
                Collection::Partner => Edit::RemovePartner(index),
                Collection::Project => Edit::RemoveProject(index),
            };
            apply(store, &config, edit).await?;
        }

        Command::Theme(theme) => {
            let edit = match theme {
                ThemeCommand::Mode { mode } => Edit::SetThemeMode(mode.into()),
                ThemeCommand::Toggle => Edit::ToggleTheme,
                ThemeCommand::Reset => Edit::ResetTheme,
            };
            apply(store, &config, edit).await?;
        }

        Command::Export { out } => {
            let (mut view, _events) = View::from_config(store, AdminRenderer, &config);
            view.load().await;
            write_output(&out, &view.export()?).await?;
            println!("Exported to {}", out.display());
        }

        Command::Import { file } => {
            let payload = tokio::fs::read_to_string(&file).await.map_err(|e| {
                sitecms_core::Error::invalid_input(format!(
                    "Cannot read {}: {}",
                    file.display(),
                    e
                ))
            })?;

            let (mut view, _events) = View::from_config(store, AdminRenderer, &config);
            view.import(&payload).await?;
        }

        Command::Reset => {
            let (mut view, _events) = View::from_config(store, AdminRenderer, &config);
            view.reset_all().await?;
            info!("Document reset to defaults");
        }

        Command::Watch { view, out } => {
            watch(store, &config, view, &out).await?;
        }
    }

    Ok(())
}

/// Apply one edit through an admin view
async fn apply(store: ConfigStore, config: &CmsConfig, edit: Edit) -> Result<()> {
    let (mut view, _events) = View::from_config(store, AdminRenderer, config);
    view.load().await;

    if !view.apply(&edit).await? {
        return Err(sitecms_core::Error::invalid_input(format!(
            "Nothing to change: {:?} addresses a missing entry",
            edit
        ))
        .into());
    }
    info!("Applied {:?}", edit);
    Ok(())
}

/// Keep `out` in sync with the document until SIGINT/SIGTERM
async fn watch(store: ConfigStore, config: &CmsConfig, kind: ViewKind, out: &Path) -> Result<()> {
    let (mut view, mut events) = View::from_config(store.clone(), kind.renderer(), config);
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!("View event: {:?}", event);
        }
    });

    view.load().await;
    write_output(out, view.output()).await?;
    info!("Watching '{}', rendering to {}", store.key(), out.display());

    let watcher = ExternalChangeWatcher::new(
        store,
        Duration::from_millis(config.sync.poll_interval_ms),
    );
    let (watcher_tx, watcher_rx) = oneshot::channel();
    let watcher_handle =
        tokio::spawn(async move { watcher.run_with_shutdown(Some(watcher_rx)).await });

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            handled = view.recv_notification() => match handled {
                Some(true) => write_output(out, view.output()).await?,
                Some(false) => {}
                None => break,
            },

            signal = &mut shutdown => {
                info!("Received shutdown signal: {}", signal?);
                break;
            }
        }
    }

    let _ = watcher_tx.send(());
    watcher_handle.await??;
    info!("Watch stopped");
    Ok(())
}

async fn write_output(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(received)
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
