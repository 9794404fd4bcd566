use agency_packager::config::catalog_config::CatalogConfig;
use agency_packager::core::export::ExportSettings;
use agency_packager::utils::error::{ErrorSeverity, PackagerError};
use agency_packager::utils::money::format_money;
use agency_packager::utils::{logger, validation::Validate};
use agency_packager::{
    CliConfig, LocalStorage, Package, PackageCalculator, PackageRequest, PackagingEngine,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting agency-packager");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Packaging failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 依嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(config: &CliConfig) -> Result<(), PackagerError> {
    config.validate()?;

    tracing::info!("📁 Loading catalog from: {}", config.catalog);
    let catalog_config = CatalogConfig::from_file(&config.catalog)?;
    catalog_config.validate()?;
    tracing::info!("✅ Catalog loaded and validated successfully");

    let catalog = catalog_config.build_catalog()?;

    if config.list {
        print_catalog(&catalog_config);
        return Ok(());
    }

    let mut calculator =
        PackageCalculator::new(catalog).with_agency_name(catalog_config.agency.name.clone());
    let template_id = config.template_id()?;

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
        let package = calculator.create_package(
            template_id,
            &config.services,
            config.customization().as_ref(),
        )?;
        let proposal = calculator.generate_proposal(&package.id, &config.client_info())?;
        print_package(&package);
        println!();
        println!("{}", proposal.to_markdown());
        return Ok(());
    }

    let output_path = config
        .output_path
        .clone()
        .unwrap_or_else(|| catalog_config.output_path().to_string());
    let settings: ExportSettings = catalog_config.export_settings()?;

    let storage = LocalStorage::new(output_path.clone());
    let mut engine = PackagingEngine::new(calculator, storage, settings);
    let request = PackageRequest {
        template_id: template_id.to_string(),
        service_ids: config.services.clone(),
        customization: config.customization(),
        client: config.client_info(),
    };

    let outcome = engine.run(&request).await?;

    print_package(&outcome.package);
    println!();
    println!("✅ Package {} created", outcome.package.id);
    println!("📁 Output saved to: {}", output_path);
    for file in &outcome.written {
        println!("  - {}", file);
    }

    Ok(())
}

fn print_catalog(config: &CatalogConfig) {
    println!("📋 {} catalog", config.agency.name);
    println!();
    println!("Services:");
    for service in &config.services {
        let deps = if service.dependencies.is_empty() {
            String::new()
        } else {
            format!(" (after {})", service.dependencies.join(", "))
        };
        println!(
            "  {:<20} {:<28} {:>10} {:>4} days{}",
            service.id,
            service.name,
            service.list_price().map(format_money).unwrap_or_default(),
            service.duration_days,
            deps
        );
    }
    println!();
    println!("Templates:");
    for template in &config.templates {
        println!(
            "  {:<20} {:<28} {} / {}",
            template.id, template.name, template.pricing_strategy, template.payment_terms
        );
    }
}

fn print_package(package: &Package) {
    let quote = &package.pricing.quote;
    println!("📦 {} ({})", package.name, package.id);
    println!("  {}", package.copy.headline);
    println!("  {}", package.copy.subheadline);
    println!(
        "  Price: {} (individually {}, savings {} / {}%)",
        format_money(quote.package_price),
        format_money(quote.individual_sum),
        format_money(quote.savings),
        quote.savings_percentage
    );
    println!("  Duration: {} days", package.timeline.total_duration);
    for entry in &package.timeline.schedule {
        let marker = if package.timeline.critical_path.contains(&entry.service_id) {
            "*"
        } else {
            " "
        };
        println!(
            "  {} day {:>3} - {:>3}  {}",
            marker, entry.start_day, entry.end_day, entry.name
        );
    }
}
