//! Load balancing control plane access
//!
//! The resolver only ever needs three read operations. They sit behind the
//! [`ControlPlane`] trait so the AWS client can be swapped for
//! [`MockControlPlane`] in tests.

pub mod aws;
pub mod mock;
pub mod types;

pub use aws::AwsControlPlane;
pub use mock::MockControlPlane;
pub use types::{Listener, Rule, RuleAction, RuleCondition, Tag, TagDescription};

use crate::error::ResolveError;
use async_trait::async_trait;

#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Lists every listener attached to a load balancer
    async fn describe_listeners(&self, load_balancer_arn: &str)
        -> Result<Vec<Listener>, ResolveError>;

    /// Lists every rule of a listener, in the order the API returns them
    async fn describe_rules(&self, listener_arn: &str) -> Result<Vec<Rule>, ResolveError>;

    /// Fetches tags for one or more resources
    async fn describe_tags(
        &self,
        resource_arns: &[String],
    ) -> Result<Vec<TagDescription>, ResolveError>;

    fn name(&self) -> &str;
}
