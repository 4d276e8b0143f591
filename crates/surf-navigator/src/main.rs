//! surf-navigator console host entry point.
//!
//! Parses the command line, loads the configuration, builds the split and
//! overlay navigators and then drives them from stdin, one command per line
//! (see `infrastructure::console` for the command list).
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- screens, overlays, breakpoint
//!  └─ SplitNavigator           -- restored from the last snapshot if any
//!  └─ ModalContext             -- overlay controller, LoggingOverlayHost
//!  └─ ManualViewportSource ──► pump_viewport_changes (Tokio task)
//!  └─ stdin command loop       -- until `quit`, EOF or Ctrl-C
//!  └─ save_snapshot()
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use surf_core::{Action, ModalRouter, NavigationError, SplitRouter, SplitState, UuidKeyGenerator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use surf_navigator::application::layout_bridge::{
    pump_viewport_changes, LayoutBridge, SplitNavigator, Viewport,
};
use surf_navigator::application::modal_controller::{ModalContext, ModalController};
use surf_navigator::application::navigator::Navigator;
use surf_navigator::infrastructure::console::{
    Command, LoggingOverlayHost, ParseError, DEFAULT_VIEWPORT_HEIGHT,
};
use surf_navigator::infrastructure::storage::config::{
    load_config, load_config_from, snapshot_file_path, AppConfig,
};
use surf_navigator::infrastructure::storage::snapshot::{load_snapshot, save_snapshot};
use surf_navigator::infrastructure::viewport::manual::ManualViewportSource;
use surf_navigator::infrastructure::viewport::ViewportSource;

/// Console host for split and overlay navigation.
#[derive(Debug, Parser)]
#[command(
    name = "surf-navigator",
    about = "Drive split/stacked and overlay navigation from stdin",
    version
)]
struct Cli {
    /// Config file to load instead of the platform default.
    #[arg(long, env = "SURF_CONFIG")]
    config: Option<PathBuf>,

    /// Viewport width at startup; overrides `layout.initial_width`.
    #[arg(long, env = "SURF_INITIAL_WIDTH")]
    initial_width: Option<u32>,

    /// Neither restore nor save the navigation snapshot.
    #[arg(long)]
    no_snapshot: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let log_level = loaded
        .as_ref()
        .map(|cfg| cfg.navigator.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let mut config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("using default configuration: {e}");
            AppConfig::default()
        }
    };
    if let Some(width) = cli.initial_width {
        config.layout.initial_width = width;
    }

    info!("surf-navigator starting");

    let snapshot_path = if cli.no_snapshot {
        None
    } else {
        match snapshot_file_path(&config) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("navigation snapshots disabled: {e}");
                None
            }
        }
    };
    let stored = snapshot_path.as_deref().and_then(|path| match load_snapshot(path) {
        Ok(state) => state,
        Err(e) => {
            warn!("ignoring unreadable snapshot: {e}");
            None
        }
    });

    let split = Arc::new(Mutex::new(build_split_navigator(&config, stored.as_ref())?));
    let modals = build_modal_context(&config)?;

    // ── Viewport pump ─────────────────────────────────────────────────────────
    let viewport = ManualViewportSource::new();
    let rx = viewport.start().context("starting viewport source")?;
    let pump = tokio::spawn(pump_viewport_changes(rx, Arc::clone(&split)));

    info!("surf-navigator ready.  Type `quit` or press Ctrl-C to exit.");

    // ── Command loop ──────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                None
            }
        };
        let Some(line) = line else { break };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            Command::Resize(size) => viewport.emit(size).context("emitting viewport")?,
            Command::Navigate { name, params } => {
                let action = match params {
                    Some(params) => Action::navigate_with_params(name, params),
                    None => Action::navigate(name),
                };
                report(split.lock().await.dispatch(action));
            }
            Command::Jump(name) => report(split.lock().await.dispatch(Action::jump_to(name))),
            Command::Back => report(split.lock().await.dispatch(Action::GoBack)),
            Command::Show { name, params } => report(modals.show(&name, params)),
            Command::Hide(name) => report(modals.hide(&name)),
            Command::HideAll => report(modals.hide_all()),
            Command::Close => report(modals.go_back()),
            Command::State => {
                let split_state = split.lock().await.state().clone();
                let overlays = modals.with_controller(|c| c.state().clone());
                let json = serde_json::json!({ "split": split_state, "overlays": overlays });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            Command::Plan => match split.lock().await.render_plan() {
                Ok(plan) => println!("{plan:#?}"),
                Err(e) => error!("cannot render: {e}"),
            },
            Command::Quit => break,
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    viewport.stop();
    if let Err(e) = pump.await {
        warn!("viewport pump ended abnormally: {e}");
    }
    modals.unmount();

    if let Some(path) = snapshot_path {
        persist(&split.lock().await.state().clone(), path);
    }

    info!("surf-navigator stopped");
    Ok(())
}

fn build_split_navigator(
    config: &AppConfig,
    stored: Option<&SplitState>,
) -> anyhow::Result<SplitNavigator> {
    let route_config = config
        .split_route_config()
        .context("invalid [[screens]] declarations")?;
    // The router must start in the layout its first viewport reports: the
    // first SET_SPLIT only announces the mode and never converts.
    let startup = Viewport::new(config.layout.initial_width, DEFAULT_VIEWPORT_HEIGHT);
    let is_split = startup.is_split(config.layout.main_width);
    let router = SplitRouter::new(config.split_router_options(is_split), UuidKeyGenerator::shared());

    let navigator = match stored {
        Some(state) => {
            info!(split = is_split, "restoring navigation snapshot");
            Navigator::restore(router, route_config, state)?
        }
        None => Navigator::new(router, route_config)?,
    };
    let bridge = LayoutBridge::new(
        config.layout.main_width,
        config.layout.initial_route_name.clone(),
    );
    let mut split = SplitNavigator::new(navigator, bridge);
    split.resize(startup)?;
    Ok(split)
}

fn build_modal_context(config: &AppConfig) -> anyhow::Result<ModalContext> {
    let router = ModalRouter::new(config.modal_router_options(), UuidKeyGenerator::shared())
        .context("invalid [[overlays]] declarations")?;
    let route_config = router.route_config();
    let navigator = Navigator::new(router, route_config)?;

    let context = ModalContext::new();
    context.mount(ModalController::new(
        navigator,
        Box::new(LoggingOverlayHost::new()),
    ));
    Ok(context)
}

fn report(result: Result<bool, NavigationError>) {
    match result {
        Ok(true) => println!("ok"),
        Ok(false) => println!("not handled"),
        Err(e) => error!("navigation error: {e}"),
    }
}

fn persist(state: &SplitState, path: PathBuf) {
    match save_snapshot(state, &path) {
        Ok(()) => info!(path = %path.display(), "navigation snapshot saved"),
        Err(e) => warn!("could not save navigation snapshot: {e}"),
    }
}
