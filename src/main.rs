use anyhow::Context;
use clap::Parser;
use fueleu_dash::adapters::notifier::ConsoleNotifier;
use fueleu_dash::adapters::storage::LocalStorage;
use fueleu_dash::config::cli::{OutputFormat, View};
use fueleu_dash::core::report;
use fueleu_dash::core::views::RouteFilter;
use fueleu_dash::domain::ports::Storage;
use fueleu_dash::utils::error::ErrorSeverity;
use fueleu_dash::utils::export::{to_csv, to_json};
use fueleu_dash::utils::{logger, validation::Validate};
use fueleu_dash::{
    build_backend, AppDashboard, CliArgs, DashError, Dashboard, DashboardConfig,
    DashboardSettings, SessionReport, SessionRunner, SessionScript,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(args.log_format, args.verbose);

    tracing::info!("🚀 Starting fueleu-dash");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    if let Err(e) = args.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let config = match &args.config {
        Some(path) => match DashboardConfig::from_file(path) {
            Ok(config) => {
                tracing::info!("📋 Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("📋 No configuration given, using built-in seed data");
            DashboardConfig::default()
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(&args, &config).await {
        let Some(dash_error) = e.downcast_ref::<DashError>() else {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        tracing::error!(
            "❌ Dashboard run failed: {:#} (Category: {:?}, Severity: {:?})",
            e,
            dash_error.category(),
            dash_error.severity()
        );
        eprintln!("❌ {}", dash_error.user_friendly_message());
        eprintln!("💡 {}", dash_error.recovery_suggestion());

        let startup_failed = e.downcast_ref::<StartupFailure>().is_some();
        let exit_code = exit_code(dash_error.severity(), startup_failed);
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

/// Context for a failed initial load.
#[derive(Debug)]
struct StartupFailure;

impl std::fmt::Display for StartupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("initial dashboard load failed")
    }
}

/// 依嚴重程度決定退出碼，啟動失敗一律非零
fn exit_code(severity: ErrorSeverity, startup_failed: bool) -> i32 {
    let code = match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    if startup_failed && code == 0 {
        1
    } else {
        code
    }
}

async fn run(args: &CliArgs, config: &DashboardConfig) -> anyhow::Result<()> {
    let backend = build_backend(config)?;
    let settings = DashboardSettings {
        reporting_year: config.reporting_year(),
        target_ghg: config.target_ghg(),
    };

    let mut dashboard: AppDashboard<ConsoleNotifier> = Dashboard::new(
        backend.routes,
        backend.banking,
        backend.pooling,
        ConsoleNotifier,
        settings,
        config.fleet_member(),
    );
    dashboard.load().await.context(StartupFailure)?;

    if let Some(script_path) = &args.script {
        let script = SessionScript::from_file(script_path)?;
        script.validate()?;

        let session_id = format!("session_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        let session_report = SessionRunner::new(session_id)
            .run(&script, &mut dashboard)
            .await;
        print_session_report(&session_report);
    }

    let filter = RouteFilter {
        vessel_type: args.vessel,
        fuel_type: args.fuel,
        year: args.year,
        search: args.search.clone(),
    };

    let rendered = render(&dashboard, args, &filter)?;

    match &args.output {
        Some(dir) => {
            let storage = LocalStorage::new(dir.clone());
            for (file_name, content) in &rendered {
                storage
                    .write_file(file_name, content.as_bytes())
                    .await
                    .with_context(|| format!("writing {}", file_name))?;
                println!("📁 {}", storage.full_path(file_name).display());
            }
        }
        None => {
            for (_, content) in &rendered {
                println!("{}", content);
            }
        }
    }

    Ok(())
}

/// Renders the selected views as `(file name, content)` pairs.
fn render(
    dashboard: &AppDashboard<ConsoleNotifier>,
    args: &CliArgs,
    filter: &RouteFilter,
) -> fueleu_dash::Result<Vec<(String, String)>> {
    let views: &[View] = match args.view {
        View::All => &[View::Routes, View::Compare, View::Banking, View::Pooling],
        View::Routes => &[View::Routes],
        View::Compare => &[View::Compare],
        View::Banking => &[View::Banking],
        View::Pooling => &[View::Pooling],
    };

    let extension = match args.format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
    };
    let target = dashboard.settings().target_ghg;

    let mut rendered = Vec::with_capacity(views.len());
    for view in views {
        let (name, content) = match view {
            View::Routes => {
                let routes = dashboard.filtered_routes(filter);
                let content = match args.format {
                    OutputFormat::Text => report::routes_table(&routes, target),
                    OutputFormat::Json => to_json(&routes)?,
                    OutputFormat::Csv => to_csv(&routes)?,
                };
                ("routes", content)
            }
            View::Compare => {
                let comparison = dashboard.comparison();
                let content = match args.format {
                    OutputFormat::Text => report::comparison_table(&comparison),
                    OutputFormat::Json => to_json(&comparison)?,
                    OutputFormat::Csv => to_csv(&comparison.rows)?,
                };
                ("compare", content)
            }
            View::Banking => {
                let overview = dashboard.banking_overview().ok_or(DashError::NotLoaded)?;
                let content = match args.format {
                    OutputFormat::Text => report::banking_summary(&overview),
                    OutputFormat::Json => to_json(&overview)?,
                    OutputFormat::Csv => to_csv(&[overview])?,
                };
                ("banking", content)
            }
            View::Pooling => {
                let pooling = dashboard.pooling();
                let content = match args.format {
                    OutputFormat::Text => report::pooling_summary(pooling),
                    OutputFormat::Json => to_json(pooling)?,
                    OutputFormat::Csv => to_csv(&pooling.draft)?,
                };
                ("pooling", content)
            }
            View::All => continue,
        };
        rendered.push((format!("{}.{}", name, extension), content));
    }

    Ok(rendered)
}

fn print_session_report(report: &SessionReport) {
    println!("🎬 Session '{}' ({})", report.name, report.session_id);
    for outcome in &report.outcomes {
        let icon = if outcome.succeeded { "✅" } else { "❌" };
        println!(
            "  {} [{}] {} - {} ({:?})",
            icon,
            outcome.index + 1,
            outcome.action,
            outcome.detail,
            outcome.duration
        );
    }
    println!(
        "📊 {} succeeded, {} failed, {} skipped",
        report.succeeded(),
        report.failed(),
        report.skipped
    );
}
