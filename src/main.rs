use albenv::cli::{normalize_legacy_flags, CliArgs, OutputFormat, OutputFormatter};
use albenv::util::logging::{self, LoggingConfig};
use albenv::{AwsControlPlane, EnvironmentResolver, ResolveError, ResolverConfig, NAME, VERSION};

use clap::Parser;
use std::env;
use std::process;
use tracing::{debug, warn, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse_from(normalize_legacy_flags(env::args()));
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match run(&args).await {
        Ok(()) => 0,
        Err(e) => {
            debug!(kind = ?e.kind(), code = e.exit_code(), "Resolution failed");
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        logging::parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("ALBENV_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        logging::parse_level(&level_str)
    };

    logging::init_logging(LoggingConfig {
        level,
        use_json: logging::json_from_env(),
        ..Default::default()
    });
}

async fn run(args: &CliArgs) -> Result<(), ResolveError> {
    let config = args.apply_to(ResolverConfig::default());
    config.validate()?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));

    if args.show_config {
        emit(formatter.format_config(&config));
        return Ok(());
    }

    if config.load_balancer_arn.is_empty() {
        warn!("No load balancer ARN given (--albarn or ALBENV_ALB_ARN); the request will be rejected");
    }

    let control_plane = AwsControlPlane::from_config(&config).await;
    let resolver = EnvironmentResolver::new(control_plane);
    let resolution = resolver.resolve(&config.load_balancer_arn).await?;

    emit(formatter.format(&resolution));
    Ok(())
}

fn emit(output: anyhow::Result<String>) {
    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: failed to format output: {:#}", e);
            process::exit(1);
        }
    }
}
