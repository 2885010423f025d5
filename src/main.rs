use clap::Parser;
use relay_gateway::utils::{logger, validation::Validate};
use relay_gateway::{CliArgs, GatewayConfig, GatewayError, GatewayServer};

fn report_and_exit(stage: &str, e: &GatewayError) -> ! {
    tracing::error!("❌ {}: {} (Category: {:?})", stage, e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("🚀 Starting relay-gateway");
    tracing::info!("📁 Loading config from: {}", args.config);

    let mut config = match GatewayConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => report_and_exit("Failed to load config", &e),
    };

    if let Err(e) = config.apply_env_overrides() {
        report_and_exit("Invalid environment override", &e);
    }
    if let Some(port) = args.port {
        config.server.port = port;
        tracing::info!("🔧 Port overridden to: {}", port);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        report_and_exit("Configuration validation failed", &e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if args.check {
        println!("✅ Configuration OK ({} instance(s))", config.instances.len());
        return Ok(());
    }

    if let Err(e) = GatewayServer::new(config).run().await {
        report_and_exit("Server failed", &e);
    }

    Ok(())
}
