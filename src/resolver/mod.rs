//! Live environment resolution
//!
//! The resolver walks a fixed chain of control plane reads:
//!
//! 1. the single listener of the load balancer
//! 2. that listener's rules, to find the one routing `/*` to a single target group
//! 3. the target group's tags, whose `Name` says `blue` or `green`
//!
//! Every step depends on the previous one's answer. Any failure or any layout
//! the resolver cannot interpret ends the chain with a [`ResolveError`].

pub mod types;

pub use types::{Environment, Resolution};

use crate::elb::{ControlPlane, Listener, Rule, Tag, TagDescription};
use crate::error::ResolveError;
use tracing::{debug, info, warn};

pub struct EnvironmentResolver<C: ControlPlane> {
    control_plane: C,
}

impl<C: ControlPlane> EnvironmentResolver<C> {
    pub fn new(control_plane: C) -> Self {
        Self { control_plane }
    }

    pub fn control_plane(&self) -> &C {
        &self.control_plane
    }

    /// Determines which environment receives live traffic behind the load balancer
    pub async fn resolve(&self, load_balancer_arn: &str) -> Result<Resolution, ResolveError> {
        info!(
            backend = self.control_plane.name(),
            "Resolving live environment for {}", load_balancer_arn
        );

        let listener_arn = self.single_listener(load_balancer_arn).await?;
        debug!("Using listener {}", listener_arn);

        let rules = self.control_plane.describe_rules(&listener_arn).await?;
        debug!("Listener has {} rules", rules.len());

        let target_group_arn = select_live_target_group(&rules)
            .ok_or_else(|| ResolveError::NoLiveTargetGroup {
                listener_arn: listener_arn.clone(),
            })?
            .to_string();
        debug!("Live target group: {}", target_group_arn);

        let descriptions = self
            .control_plane
            .describe_tags(std::slice::from_ref(&target_group_arn))
            .await?;
        let tags = tags_for(&descriptions, &target_group_arn).ok_or_else(|| {
            ResolveError::NoTagDescription {
                target_group_arn: target_group_arn.clone(),
            }
        })?;

        let (environment, name_tag) = classify_tags(&target_group_arn, tags)?;
        info!(
            "Live environment is {} (target group Name tag '{}')",
            environment, name_tag
        );

        Ok(Resolution {
            environment,
            idle_environment: environment.other(),
            load_balancer_arn: load_balancer_arn.to_string(),
            listener_arn,
            target_group_arn,
            name_tag,
        })
    }

    async fn single_listener(&self, load_balancer_arn: &str) -> Result<String, ResolveError> {
        let listeners = self
            .control_plane
            .describe_listeners(load_balancer_arn)
            .await?;

        if listeners.len() > 1 {
            return Err(ResolveError::MultipleListeners {
                load_balancer_arn: load_balancer_arn.to_string(),
                count: listeners.len(),
                listeners: listeners
                    .iter()
                    .map(Listener::endpoint)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        listeners
            .into_iter()
            .next()
            .and_then(|listener| listener.listener_arn)
            .ok_or_else(|| ResolveError::NoListener {
                load_balancer_arn: load_balancer_arn.to_string(),
            })
    }
}

/// Picks the target group of the first rule that forwards `/*` through
/// exactly one action. Later matches are ignored.
pub fn select_live_target_group(rules: &[Rule]) -> Option<&str> {
    let mut live = rules
        .iter()
        .filter_map(|rule| rule.live_target_group().map(|tg| (rule, tg)));

    let (rule, target_group) = live.next()?;
    let ignored = live.count();
    if ignored > 0 {
        warn!(
            "{} more rules route /* to a single target group; using rule {} (priority {})",
            ignored,
            rule.rule_arn.as_deref().unwrap_or("<unknown>"),
            rule.priority.as_deref().unwrap_or("<unknown>")
        );
    }

    Some(target_group)
}

/// Classifies a target group from its tags. The first `Name` tag mentioning
/// `blue` or `green` decides; other tags are ignored.
pub fn classify_tags(
    target_group_arn: &str,
    tags: &[Tag],
) -> Result<(Environment, String), ResolveError> {
    let mut last_name = None;

    for tag in tags.iter().filter(|t| t.is_name()) {
        let value = tag.value.as_deref().unwrap_or_default();
        if let Some(environment) = Environment::from_name(value) {
            return Ok((environment, value.to_string()));
        }
        last_name = Some(value);
    }

    match last_name {
        Some(value) => Err(ResolveError::Unclassifiable {
            value: value.to_string(),
        }),
        None => Err(ResolveError::MissingNameTag {
            target_group_arn: target_group_arn.to_string(),
        }),
    }
}

fn tags_for<'a>(descriptions: &'a [TagDescription], resource_arn: &str) -> Option<&'a [Tag]> {
    descriptions
        .iter()
        .find(|d| d.resource_arn.as_deref() == Some(resource_arn))
        .or_else(|| descriptions.first())
        .map(|d| d.tags.as_slice())
}
