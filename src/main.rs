use clap::Parser;
use log::{info, warn};
use runpad::core::config::{self, CliOverrides, ResolvedConfig};
use runpad::core::draft::{DRAFT_KEY, DraftStore, FileDraftStore, MemoryDraftStore};
use runpad::core::state::App;
use runpad::core::submission::{HeadlessRunner, SubmissionContext};
use runpad::executor::HttpExecutor;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "runpad", about = "Edit code in the terminal, run it on a remote executor")]
struct Args {
    /// Execution endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Run FILE once without the editor and print its output
    #[arg(short, long, value_name = "FILE")]
    run: Option<PathBuf>,

    /// Config file to use instead of ~/.runpad/config.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to runpad.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("runpad.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let file_config = loaded.map_err(|e| {
        warn!("Refusing to start with a broken config: {}", e);
        std::io::Error::other(e)
    })?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            endpoint: args.endpoint.clone(),
            timeout_secs: args.timeout,
        },
    );

    info!(
        "runpad starting: endpoint={}, timeout={:?}",
        resolved.endpoint, resolved.timeout
    );

    let executor = Arc::new(HttpExecutor::new(Some(resolved.endpoint.clone())));

    if let Some(file) = args.run {
        return run_headless(&file, &resolved, executor).await;
    }

    let store: Arc<dyn DraftStore> = match &resolved.draft_path {
        Some(path) => {
            let store = FileDraftStore::new(path.clone());
            if let Some(saved_at) = store.saved_at(DRAFT_KEY) {
                info!(
                    "Restoring draft from {} (saved {})",
                    store.path().display(),
                    saved_at.to_rfc3339()
                );
            }
            Arc::new(store)
        }
        None => {
            warn!("No home directory, drafts will not survive a restart");
            Arc::new(MemoryDraftStore::new())
        }
    };
    let ctx = SubmissionContext::new(store, executor, resolved.timeout);

    runpad::tui::run(&resolved, ctx)
}

/// Submits `file` once and exits with 0 on success, 1 otherwise.
async fn run_headless(
    file: &Path,
    resolved: &ResolvedConfig,
    executor: Arc<HttpExecutor>,
) -> std::io::Result<()> {
    let source = std::fs::read_to_string(file)?;
    info!("Headless run of {} ({} bytes)", file.display(), source.len());

    // The saved editor draft is left alone in headless mode.
    let ctx = SubmissionContext::new(Arc::new(MemoryDraftStore::new()), executor, resolved.timeout);
    let mut app = App::new(source, resolved.endpoint.clone(), resolved.language.clone());

    let navigation = HeadlessRunner::new(ctx).submit(&mut app).await;

    println!("{}", app.output_text());
    if let Some(request) = navigation {
        eprintln!("{}: syntax error at line {}", file.display(), request.line);
    }
    std::process::exit(if app.succeeded() { 0 } else { 1 });
}
