//! Load balancer entities as seen by the resolver
//!
//! These mirror the subset of the ELBv2 model the resolver reads. Fields the
//! API marks optional stay optional here; the resolver decides what a missing
//! value means.

use serde::Serialize;

pub const PATH_PATTERN_FIELD: &str = "path-pattern";
pub const CATCH_ALL_PATH: &str = "/*";
pub const NAME_TAG_KEY: &str = "Name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listener {
    pub listener_arn: Option<String>,
    pub port: Option<i32>,
    pub protocol: Option<String>,
}

impl Listener {
    pub fn new(listener_arn: impl Into<String>) -> Self {
        Self {
            listener_arn: Some(listener_arn.into()),
            port: None,
            protocol: None,
        }
    }

    /// `PROTOCOL:PORT`, with `?` for whatever the API left out
    pub fn endpoint(&self) -> String {
        let port = self
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string());
        format!("{}:{}", self.protocol.as_deref().unwrap_or("?"), port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCondition {
    pub field: Option<String>,
    pub values: Vec<String>,
}

impl RuleCondition {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            values: vec![value.into()],
        }
    }

    pub fn path_pattern(value: impl Into<String>) -> Self {
        Self::new(PATH_PATTERN_FIELD, value)
    }

    /// True for `path-pattern` conditions whose first value is `/*`
    pub fn is_catch_all(&self) -> bool {
        self.field.as_deref() == Some(PATH_PATTERN_FIELD)
            && self.values.first().map(String::as_str) == Some(CATCH_ALL_PATH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleAction {
    pub target_group_arn: Option<String>,
}

impl RuleAction {
    pub fn forward(target_group_arn: impl Into<String>) -> Self {
        Self {
            target_group_arn: Some(target_group_arn.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub rule_arn: Option<String>,
    pub priority: Option<String>,
    pub conditions: Vec<RuleCondition>,
    pub actions: Vec<RuleAction>,
}

impl Rule {
    pub fn new(conditions: Vec<RuleCondition>, actions: Vec<RuleAction>) -> Self {
        Self {
            conditions,
            actions,
            ..Default::default()
        }
    }

    /// Target group of a rule that routes `/*` through exactly one action
    pub fn live_target_group(&self) -> Option<&str> {
        if self.actions.len() != 1 {
            return None;
        }
        if !self.conditions.iter().any(RuleCondition::is_catch_all) {
            return None;
        }
        self.actions[0].target_group_arn.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    pub fn is_name(&self) -> bool {
        self.key.as_deref() == Some(NAME_TAG_KEY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDescription {
    pub resource_arn: Option<String>,
    pub tags: Vec<Tag>,
}
