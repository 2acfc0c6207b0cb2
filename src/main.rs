use anyhow::Context;
use clap::Parser;
use qb_terms::app::export::render_terms;
use qb_terms::utils::{logger, validation::Validate};
use qb_terms::{CliArgs, MemoryCompany, TermsReader};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting qb-terms");

    let config = args.resolve().context("failed to load configuration")?;
    if args.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let company = match config.company_data() {
        Some(path) => MemoryCompany::from_json_file(path)
            .with_context(|| format!("failed to load company data from {}", path))?,
        None => {
            tracing::warn!("No company data given, querying an empty company file");
            MemoryCompany::new()
        }
    };

    let reader = TermsReader::with_provider(company.provider(), config.gateway.clone());
    let outcome = reader.query_all_terms_detailed();

    let rendered = render_terms(&outcome.terms, config.output.format)?;
    println!("{}", rendered);

    if let Some(failure) = &outcome.failure {
        eprintln!("❌ {}", failure.user_friendly_message());
        std::process::exit(2);
    }

    Ok(())
}
