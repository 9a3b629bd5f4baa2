use super::types::{Listener, Rule, Tag, TagDescription};
use super::ControlPlane;
use crate::error::ResolveError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A control plane call recorded by [`MockControlPlane`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    DescribeListeners(String),
    DescribeRules(String),
    DescribeTags(Vec<String>),
}

/// In-memory control plane holding a fixed infrastructure snapshot
pub struct MockControlPlane {
    listeners: HashMap<String, Vec<Listener>>,
    rules: HashMap<String, Vec<Rule>>,
    tags: HashMap<String, Vec<Tag>>,
    failures: HashMap<&'static str, String>,
    calls: Mutex<Vec<MockCall>>,
    name: String,
}

impl MockControlPlane {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            rules: HashMap::new(),
            tags: HashMap::new(),
            failures: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            name: "MockControlPlane".to_string(),
        }
    }

    pub fn with_listeners(
        mut self,
        load_balancer_arn: impl Into<String>,
        listeners: Vec<Listener>,
    ) -> Self {
        self.listeners.insert(load_balancer_arn.into(), listeners);
        self
    }

    pub fn with_rules(mut self, listener_arn: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.rules.insert(listener_arn.into(), rules);
        self
    }

    pub fn with_tags(mut self, resource_arn: impl Into<String>, tags: Vec<Tag>) -> Self {
        self.tags.insert(resource_arn.into(), tags);
        self
    }

    /// Makes the named operation (`DescribeListeners`, `DescribeRules` or
    /// `DescribeTags`) fail with the given message
    pub fn failing(mut self, operation: &'static str, message: impl Into<String>) -> Self {
        self.failures.insert(operation, message.into());
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, operation: &str) -> bool {
        self.calls().iter().any(|call| {
            matches!(
                (call, operation),
                (MockCall::DescribeListeners(_), "DescribeListeners")
                    | (MockCall::DescribeRules(_), "DescribeRules")
                    | (MockCall::DescribeTags(_), "DescribeTags")
            )
        })
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, operation: &str) -> Result<(), ResolveError> {
        match self.failures.get(operation) {
            Some(message) => Err(ResolveError::control_plane(operation, message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ControlPlane for MockControlPlane {
    async fn describe_listeners(
        &self,
        load_balancer_arn: &str,
    ) -> Result<Vec<Listener>, ResolveError> {
        self.record(MockCall::DescribeListeners(load_balancer_arn.to_string()));
        self.check_failure("DescribeListeners")?;

        match self.listeners.get(load_balancer_arn) {
            Some(listeners) => Ok(listeners.clone()),
            None => Err(ResolveError::control_plane(
                "DescribeListeners",
                format!("LoadBalancerNotFound: {}", load_balancer_arn),
            )),
        }
    }

    async fn describe_rules(&self, listener_arn: &str) -> Result<Vec<Rule>, ResolveError> {
        self.record(MockCall::DescribeRules(listener_arn.to_string()));
        self.check_failure("DescribeRules")?;

        match self.rules.get(listener_arn) {
            Some(rules) => Ok(rules.clone()),
            None => Err(ResolveError::control_plane(
                "DescribeRules",
                format!("ListenerNotFound: {}", listener_arn),
            )),
        }
    }

    async fn describe_tags(
        &self,
        resource_arns: &[String],
    ) -> Result<Vec<TagDescription>, ResolveError> {
        self.record(MockCall::DescribeTags(resource_arns.to_vec()));
        self.check_failure("DescribeTags")?;

        Ok(resource_arns
            .iter()
            .filter_map(|arn| {
                self.tags.get(arn).map(|tags| TagDescription {
                    resource_arn: Some(arn.clone()),
                    tags: tags.clone(),
                })
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
