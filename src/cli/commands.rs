use crate::config::ResolverConfig;
use clap::{Parser, ValueEnum};

/// Long flags that existing pipeline scripts pass with a single dash
/// (`-region`, `-albarn`); rewritten to their double-dash form before parsing
const LEGACY_FLAGS: &[&str] = &["region", "albarn"];

/// Detects which blue/green environment is live behind an Application Load Balancer
#[derive(Parser, Debug)]
#[command(
    name = "albenv",
    about = "Detects which blue/green environment is live behind an Application Load Balancer",
    version,
    long_about = "albenv inspects the single listener of an Application Load Balancer, finds the \
                  rule forwarding /* to one target group, and reads that target group's Name tag. \
                  It prints 'blue' or 'green' so a deployment pipeline knows which environment \
                  is live and which one is idle.\n\n\
                  Examples:\n  \
                  albenv --albarn arn:aws:elasticloadbalancing:eu-central-1:123456789012:loadbalancer/app/web/abc\n  \
                  albenv -region us-east-1 -albarn <ARN>\n  \
                  albenv --albarn <ARN> --format json"
)]
pub struct CliArgs {
    #[arg(
        short = 'r',
        long,
        value_name = "REGION",
        help = "Region to search for the load balancer [default: eu-central-1]"
    )]
    pub region: Option<String>,

    #[arg(
        long = "albarn",
        visible_alias = "alb-arn",
        value_name = "ARN",
        help = "ARN of the load balancer where we look for the active environment"
    )]
    pub alb_arn: Option<String>,

    #[arg(
        long,
        value_name = "URL",
        help = "Override the ELBv2 endpoint (e.g. a local emulator)"
    )]
    pub endpoint_url: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Per-request timeout in seconds [default: 30]"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Print the effective configuration and exit")]
    pub show_config: bool,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => super::output::OutputFormat::Text,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
        }
    }
}

impl CliArgs {
    /// Layers command-line flags over a base configuration
    pub fn apply_to(&self, base: ResolverConfig) -> ResolverConfig {
        ResolverConfig {
            region: self.region.clone().unwrap_or(base.region),
            load_balancer_arn: self.alb_arn.clone().unwrap_or(base.load_balancer_arn),
            endpoint_url: self.endpoint_url.clone().or(base.endpoint_url),
            timeout_secs: self.timeout.unwrap_or(base.timeout_secs),
            log_level: self
                .log_level
                .as_ref()
                .map(|l| l.to_lowercase())
                .unwrap_or(base.log_level),
        }
    }
}

/// Rewrites `-region` / `-albarn` (optionally with `=value`) to `--region` / `--albarn`
pub fn normalize_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            let Some(rest) = arg.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split('=').next().unwrap_or(rest);
            if LEGACY_FLAGS.contains(&name) {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}
