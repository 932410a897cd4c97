pub mod commands;
pub mod config;
pub mod error;
pub mod schedule;
pub mod store;

use commands::{Notebook, ViewState};
use error::AppError;
use store::SqliteSheet;
use tracing_subscriber::EnvFilter;

/// Opens the notebook for today, persists any months that had to be
/// generated and prints the current month's schedule.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let config_path = config::config_path();
    let config = config::load_config(&config_path)?;

    // Ensure sheet directory exists
    if let Some(dir) = config.sheet_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let sheet = SqliteSheet::new(&config.sheet_path)?;

    let today = chrono::Local::now().date_naive();
    let span = tracing::info_span!("open_notebook", sheet = %config.sheet_path.display(), %today);
    let _entered = span.enter();

    let (mut notebook, report) = Notebook::open(sheet, &config, today)?;
    if notebook.is_dirty() {
        log::info!(
            "Saving: {} ids renumbered, {} months generated",
            report.numbering.renumbered,
            report.generated.len()
        );
        notebook.save()?;
    }

    let view = ViewState::new(today);
    let stats = notebook.month_stats(view.month);
    println!("{} ({} 本)", view.month, stats.total);
    println!(
        "出来上がっている本数: {} 本 / {} {}",
        stats.stock.finished, stats.stock.deadline_text, stats.stock.sub_text
    );
    for summary in notebook.month_view(view.month) {
        println!("{}", summary.label);
    }

    log::info!("Production notebook ready");
    Ok(())
}

/// Installs the tracing subscriber; `log` records are forwarded to it.
/// Level comes from `RUST_LOG`, default `info`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
