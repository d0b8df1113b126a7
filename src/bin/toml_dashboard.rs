use clap::Parser;
use house_price_dashboard::core::ConfigProvider;
use house_price_dashboard::utils::{logger, validation::Validate};
use house_price_dashboard::{
    ConfiguredSource, Dashboard, DashboardError, JsonRenderer, OutputFormat, Result,
    TextRenderer, TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-dashboard")]
#[command(about = "House price dashboard driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override output format from config
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Show what would be loaded without fetching the dataset
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("🚀 Starting TOML-based dashboard");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(format) = args.format {
        config.report.format = Some(format);
        tracing::info!("🔧 Output format overridden to: {:?}", format);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the dataset will not be fetched");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    match render_dashboard(config, monitor_enabled).await {
        Ok(output) => {
            print!("{}", output);
            tracing::info!("✅ Dashboard rendered");
        }
        Err(e) => report_failure(&e),
    }

    Ok(())
}

async fn render_dashboard(config: TomlConfig, monitor_enabled: bool) -> Result<String> {
    let format = config.format();
    let pretty = config.pretty_json();
    let bar_width = config.bar_width();

    let source = ConfiguredSource::from_config(&config)?;
    let dashboard = Dashboard::new_with_monitoring(source, config, monitor_enabled);

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

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = e.severity().exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

// 摘要輸出到 stderr，stdout 保留給報表
fn display_config_summary(config: &TomlConfig, args: &Args) {
    eprintln!("📋 Configuration Summary:");
    eprintln!("  Dashboard: {}", config.dashboard.name);
    if let Some(description) = &config.dashboard.description {
        eprintln!("  Description: {}", description);
    }
    match config.dataset_file() {
        Some(file) => eprintln!("  Source: {} (local file)", file),
        None => eprintln!("  Source: {}", config.dataset_url()),
    }
    if let Some(timeout) = config.request_timeout() {
        eprintln!("  Timeout: {:?}", timeout);
    }
    eprintln!("  Format: {:?}", config.format());
    eprintln!("  Preview Rows: {}", config.preview_rows());
    eprintln!("  Histogram Bins: {}", config.histogram_bins());

    if args.dry_run {
        eprintln!("  🔍 DRY RUN MODE ENABLED");
    }

    eprintln!();
}
