use clap::Parser;
use gin_tasting::core::command::CommandOutcome;
use gin_tasting::core::report::{
    bar_chart, podium, ranking_report, DEFAULT_PODIUM_PLACES, MAX_CHART_WIDTH,
};
use gin_tasting::core::session::{dry_run, CommandFailure};
use gin_tasting::utils::logger;
use gin_tasting::utils::validation::validate_range;
use gin_tasting::{Command, CommandScript, ExportFormat, LocalStorage, TastingSession};

#[derive(Parser)]
#[command(name = "replay-tasting")]
#[command(about = "Apply a JSON command script to a gin tasting session")]
struct Args {
    /// Path to the JSON command script
    #[arg(short, long)]
    script: String,

    /// Directory the export files are written to
    #[arg(long, default_value = ".")]
    output_path: String,

    /// Export once more in this format after the script has run
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Width of the bar chart
    #[arg(long, default_value = "40")]
    chart_width: usize,

    /// Validate the script and show the plan without writing files
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Replaying tasting script: {}", args.script);

    if let Err(e) = validate_range("chart_width", args.chart_width, 1, MAX_CHART_WIDTH) {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code().max(1));
    }

    let mut script = match CommandScript::from_file(&args.script) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("❌ Failed to load script '{}': {}", args.script, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code().max(1));
        }
    };
    if let Some(format) = args.format {
        script.commands.push(Command::Export { format });
    }
    tracing::info!("✅ Loaded {} commands", script.len());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        if let Err(failure) = perform_dry_run(&script, args.chart_width) {
            report_failure(&failure);
            std::process::exit(failure.exit_code());
        }
        return Ok(());
    }

    let storage = LocalStorage::new(args.output_path.clone());
    let mut session = TastingSession::new(storage);

    match session.apply_all(script.commands) {
        Ok(outcomes) => {
            print_summary(&session, args.chart_width);
            for outcome in outcomes {
                if let CommandOutcome::Exported { path, rows } = outcome {
                    println!("📁 Saved {} rows to {}", rows, path);
                }
            }
        }
        Err(failure) => {
            report_failure(&failure);
            std::process::exit(failure.exit_code());
        }
    }

    Ok(())
}

fn perform_dry_run(script: &CommandScript, chart_width: usize) -> Result<(), CommandFailure> {
    println!("📋 Plan:");
    for (index, command) in script.commands.iter().enumerate() {
        println!("  {:>3}. {}", index + 1, command.name());
    }

    let formats = script.export_formats();
    if formats.is_empty() {
        println!("⚠️  The script never exports; results would be discarded");
    } else {
        let labels: Vec<&str> = formats.iter().map(|f| f.label()).collect();
        println!("💾 Would export as: {}", labels.join(", "));
    }

    let session = dry_run(script)?;
    println!("✅ Script is valid");
    print_summary(&session, chart_width);
    Ok(())
}

fn print_summary<S: gin_tasting::core::Storage>(session: &TastingSession<S>, chart_width: usize) {
    let Ok(ledger) = session.ledger() else {
        tracing::warn!("Script did not initialize a session");
        return;
    };
    println!("{}", ranking_report(ledger));
    println!();
    println!("{}", bar_chart(ledger, chart_width));
    println!();
    println!("{}", podium(ledger, DEFAULT_PODIUM_PLACES));
}

fn report_failure(failure: &CommandFailure) {
    let (index, command, error) = (failure.index, &failure.command, &failure.error);
    tracing::error!(
        "❌ Command #{} ({}) failed: {} (Category: {:?}, Severity: {:?})",
        index + 1,
        command.name(),
        error,
        error.category(),
        error.severity()
    );
    eprintln!("❌ Command #{}: {}", index + 1, error.user_friendly_message());
    eprintln!("💡 建議: {}", error.recovery_suggestion());
}
