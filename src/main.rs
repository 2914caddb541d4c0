use cause_list_pdf::core::output;
use cause_list_pdf::utils::{logger, validation::Validate};
use cause_list_pdf::{
    AppConfig, CauseListError, CauseListPipeline, ChromiumRenderer, CliConfig, HttpFetcher,
    RenderOutcome, RequestContext, WkhtmltopdfRenderer,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli).await {
        Ok(outcome) => {
            let size = std::fs::metadata(&outcome.path).map(|m| m.len()).unwrap_or(0);
            tracing::info!(
                "Cause list saved via {} ({} bytes): {}",
                outcome.via,
                size,
                outcome.path.display()
            );
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            eprintln!("Error: {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: &CliConfig) -> Result<RenderOutcome, CauseListError> {
    cli.validate()?;
    let config: AppConfig = cli.app_config()?;

    let base_dir = output::program_dir()?;
    output::ensure_data_dir(&base_dir)?;
    let today = chrono::Local::now().date_naive();
    let out_path = output::resolve_output_path(cli.out.as_deref(), &base_dir, today);
    let ctx = RequestContext::new(cli.url.clone(), out_path);

    let pipeline = CauseListPipeline::new(
        HttpFetcher::new(&config)?,
        WkhtmltopdfRenderer::new(config.converter.clone()),
        ChromiumRenderer::new(config.browser.clone()),
    )
    .with_skip_primary(cli.skip_primary);

    pipeline.run(&ctx).await
}
