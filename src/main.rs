use clap::Parser;
use house_price_dashboard::utils::{logger, validation::Validate};
use house_price_dashboard::{
    CliConfig, ConfiguredSource, Dashboard, DashboardError, JsonRenderer, OutputFormat, Result,
    TextRenderer,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting house-dashboard");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    match render_dashboard(config).await {
        Ok(output) => {
            print!("{}", output);
            tracing::info!("✅ Dashboard rendered");
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}

async fn render_dashboard(config: CliConfig) -> Result<String> {
    let format = config.format;
    let pretty = !config.compact;
    let bar_width = config.bar_width;
    let monitor = config.monitor;

    let source = ConfiguredSource::from_config(&config)?;
    let dashboard = Dashboard::new_with_monitoring(source, config, monitor);

    match format {
        OutputFormat::Text => dashboard.run(&TextRenderer::new(bar_width)?).await,
        OutputFormat::Json => dashboard.run(&JsonRenderer::new(pretty)).await,
    }
}

fn report_failure(e: &DashboardError) {
    tracing::error!(
        "❌ Dashboard failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 使用者可見的錯誤訊息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = e.severity().exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
