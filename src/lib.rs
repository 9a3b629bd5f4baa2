//! albenv - live blue/green environment detection for Application Load Balancers
//!
//! A blue/green deployment keeps two copies of a service behind one load
//! balancer and flips traffic between them. Before deploying, a pipeline has
//! to know which copy is live so it can update the idle one. This library
//! answers that by reading the load balancer's configuration:
//!
//! - the load balancer must have exactly one listener
//! - the first listener rule forwarding `/*` to a single target group marks
//!   that target group as live
//! - the target group's `Name` tag names the environment (`blue` or `green`)
//!
//! # Example Usage
//!
//! ```ignore
//! use albenv::{AwsControlPlane, EnvironmentResolver, ResolverConfig};
//!
//! async fn live_environment(arn: &str) -> Result<String, albenv::ResolveError> {
//!     let config = ResolverConfig::default();
//!     let resolver = EnvironmentResolver::new(AwsControlPlane::from_config(&config).await);
//!     let resolution = resolver.resolve(arn).await?;
//!     Ok(resolution.environment.to_string())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`elb`]: control plane trait, AWS SDK adapter and in-memory mock
//! - [`resolver`]: the resolution chain and its matching rules
//! - [`config`]: environment-backed configuration
//! - [`cli`]: argument parsing and output formatting

pub mod cli;
pub mod config;
pub mod elb;
pub mod error;
pub mod resolver;
pub mod util;

pub use config::{ConfigError, ResolverConfig};
pub use elb::{AwsControlPlane, ControlPlane, MockControlPlane};
pub use error::{ErrorKind, ResolveError};
pub use resolver::{Environment, EnvironmentResolver, Resolution};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
