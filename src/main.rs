use clap::Parser;
use roi_simulator::core::report::PaperSize;
use roi_simulator::utils::{error::ErrorSeverity, logger, validation::Validate};
use roi_simulator::{
    serve, ChromiumRenderer, CliConfig, GotenbergRenderer, RendererKind, RoiEngine, RoiError,
    SqliteScenarioStore, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    logger::init_server_logger(config.logging.verbose, config.logging.json);
    tracing::info!("Starting roi-simulator");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(e);
    }

    if let Err(e) = run(config).await {
        fail(e);
    }

    Ok(())
}

async fn run(config: TomlConfig) -> roi_simulator::Result<()> {
    let addr = config.bind_addr()?;
    let paper = config.paper_size()?;

    let store = SqliteScenarioStore::open(&config.database.path)?;
    store.migrate()?;
    tracing::info!("📁 Scenario database: {}", config.database.path);

    match config.renderer_kind()? {
        RendererKind::Gotenberg => {
            tracing::info!("PDF renderer: rendering service at {}", config.renderer.endpoint);
            let renderer =
                GotenbergRenderer::new(&config.renderer.endpoint, config.render_timeout(), paper)?;
            serve(engine(store, renderer, paper), addr).await
        }
        RendererKind::Chromium => {
            tracing::info!("PDF renderer: local browser {}", config.renderer.chromium_path);
            let renderer =
                ChromiumRenderer::new(&config.renderer.chromium_path, config.render_timeout());
            serve(engine(store, renderer, paper), addr).await
        }
    }
}

fn engine<R: roi_simulator::core::PdfRenderer>(
    store: SqliteScenarioStore,
    renderer: R,
    paper: PaperSize,
) -> Arc<RoiEngine<SqliteScenarioStore, R>> {
    Arc::new(RoiEngine::new(store, renderer).with_paper_size(paper))
}

fn fail(e: RoiError) -> ! {
    tracing::error!(
        "❌ roi-simulator failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
