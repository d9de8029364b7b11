use clap::Parser;
use gin_tasting::core::ConfigProvider;
use gin_tasting::utils::error::TastingError;
use gin_tasting::utils::{logger, validation::Validate};
use gin_tasting::{CliConfig, KnownSamples, LocalStorage, PromptFrontend, TastingConfig, TastingSession};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🍸 Starting gin-tasting");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match TastingConfig::resolve(&cli).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    // 已知琴酒清單是啟動必要條件
    let catalog = match KnownSamples::load(config.known_samples_file()) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(
                "❌ Could not read known samples from '{}'",
                config.known_samples_file()
            );
            fail(&e)
        }
    };
    tracing::info!("📋 {} known gins available for renaming", catalog.len());

    let storage = LocalStorage::new(config.output_path().to_string());
    let session = TastingSession::new(storage);
    let mut frontend = PromptFrontend::new(session, catalog, &config);

    if let Err(e) = frontend.run() {
        tracing::error!("❌ Tasting session aborted: {:#}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let exports = frontend.session().exports();
    if exports.is_empty() {
        tracing::warn!("Session ended without saving; scores were not exported");
    } else {
        for receipt in exports {
            println!("📁 {}", receipt.path);
        }
    }

    Ok(())
}

fn fail(e: &TastingError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code())
}
