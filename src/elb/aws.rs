//! ELBv2 control plane backed by the AWS SDK

use super::types::{Listener, Rule, RuleAction, RuleCondition, Tag, TagDescription};
use super::ControlPlane;
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_elasticloadbalancingv2::error::DisplayErrorContext;
use aws_sdk_elasticloadbalancingv2::types as elbv2;
use aws_sdk_elasticloadbalancingv2::Client;
use std::time::Duration;
use tracing::{debug, info};

pub struct AwsControlPlane {
    client: Client,
}

impl AwsControlPlane {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient credential chain, scoped to the
    /// configured region. Retries are disabled: a failed call aborts the run.
    pub async fn from_config(config: &ResolverConfig) -> Self {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.timeout_secs))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeouts);

        if let Some(endpoint) = &config.endpoint_url {
            debug!("Using control plane endpoint override: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        info!("Initialized ELBv2 client in region {}", config.region);

        Self::new(Client::new(&sdk_config))
    }
}

fn sdk_error<E>(operation: &str, err: E) -> ResolveError
where
    E: std::error::Error + 'static,
{
    ResolveError::control_plane(operation, DisplayErrorContext(&err).to_string())
}

fn next_marker(marker: Option<&str>) -> Option<String> {
    marker.filter(|m| !m.is_empty()).map(str::to_string)
}

impl From<&elbv2::Listener> for Listener {
    fn from(value: &elbv2::Listener) -> Self {
        Listener {
            listener_arn: value.listener_arn().map(str::to_string),
            port: value.port(),
            protocol: value.protocol().map(|p| p.as_str().to_string()),
        }
    }
}

impl From<&elbv2::RuleCondition> for RuleCondition {
    fn from(value: &elbv2::RuleCondition) -> Self {
        RuleCondition {
            field: value.field().map(str::to_string),
            values: value.values().to_vec(),
        }
    }
}

impl From<&elbv2::Action> for RuleAction {
    fn from(value: &elbv2::Action) -> Self {
        RuleAction {
            target_group_arn: value.target_group_arn().map(str::to_string),
        }
    }
}

impl From<&elbv2::Rule> for Rule {
    fn from(value: &elbv2::Rule) -> Self {
        Rule {
            rule_arn: value.rule_arn().map(str::to_string),
            priority: value.priority().map(str::to_string),
            conditions: value.conditions().iter().map(RuleCondition::from).collect(),
            actions: value.actions().iter().map(RuleAction::from).collect(),
        }
    }
}

impl From<&elbv2::Tag> for Tag {
    fn from(value: &elbv2::Tag) -> Self {
        Tag {
            key: value.key().map(str::to_string),
            value: value.value().map(str::to_string),
        }
    }
}

impl From<&elbv2::TagDescription> for TagDescription {
    fn from(value: &elbv2::TagDescription) -> Self {
        TagDescription {
            resource_arn: value.resource_arn().map(str::to_string),
            tags: value.tags().iter().map(Tag::from).collect(),
        }
    }
}

#[async_trait]
impl ControlPlane for AwsControlPlane {
    async fn describe_listeners(
        &self,
        load_balancer_arn: &str,
    ) -> Result<Vec<Listener>, ResolveError> {
        let mut listeners = Vec::new();
        let mut marker = None;

        loop {
            let resp = self
                .client
                .describe_listeners()
                .load_balancer_arn(load_balancer_arn)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| sdk_error("DescribeListeners", e))?;

            listeners.extend(resp.listeners().iter().map(Listener::from));

            marker = next_marker(resp.next_marker());
            if marker.is_none() {
                break;
            }
        }

        Ok(listeners)
    }

    async fn describe_rules(&self, listener_arn: &str) -> Result<Vec<Rule>, ResolveError> {
        let mut rules = Vec::new();
        let mut marker = None;

        loop {
            let resp = self
                .client
                .describe_rules()
                .listener_arn(listener_arn)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| sdk_error("DescribeRules", e))?;

            rules.extend(resp.rules().iter().map(Rule::from));

            marker = next_marker(resp.next_marker());
            if marker.is_none() {
                break;
            }
        }

        Ok(rules)
    }

    async fn describe_tags(
        &self,
        resource_arns: &[String],
    ) -> Result<Vec<TagDescription>, ResolveError> {
        let resp = self
            .client
            .describe_tags()
            .set_resource_arns(Some(resource_arns.to_vec()))
            .send()
            .await
            .map_err(|e| sdk_error("DescribeTags", e))?;

        Ok(resp
            .tag_descriptions()
            .iter()
            .map(TagDescription::from)
            .collect())
    }

    fn name(&self) -> &str {
        "aws-elbv2"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Environment, EnvironmentResolver};
    use aws_sdk_elasticloadbalancingv2::config::Credentials;
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;

    const XMLNS: &str = "http://elasticloadbalancing.amazonaws.com/doc/2015-12-01/";

    fn replay_control_plane(events: Vec<ReplayEvent>) -> (AwsControlPlane, StaticReplayClient) {
        let http_client = StaticReplayClient::new(events);
        let config = aws_sdk_elasticloadbalancingv2::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-central-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .retry_config(RetryConfig::disabled())
            .http_client(http_client.clone())
            .build();
        (AwsControlPlane::new(Client::from_conf(config)), http_client)
    }

    fn event(status: u16, body: String) -> ReplayEvent {
        ReplayEvent::new(
            http::Request::builder()
                .uri("https://elasticloadbalancing.eu-central-1.amazonaws.com/")
                .body(SdkBody::empty())
                .unwrap(),
            http::Response::builder()
                .status(status)
                .header("content-type", "text/xml")
                .body(SdkBody::from(body))
                .unwrap(),
        )
    }

    fn ok(operation: &str, result: &str) -> ReplayEvent {
        event(
            200,
            format!(
                "<{op}Response xmlns=\"{ns}\"><{op}Result>{result}</{op}Result>\
                 <ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata></{op}Response>",
                op = operation,
                ns = XMLNS,
                result = result
            ),
        )
    }

    fn marker(next: Option<&str>) -> String {
        next.map(|m| format!("<NextMarker>{}</NextMarker>", m))
            .unwrap_or_default()
    }

    fn listeners_page(arns: &[&str], next: Option<&str>) -> ReplayEvent {
        let members: String = arns
            .iter()
            .map(|arn| {
                format!(
                    "<member><ListenerArn>{}</ListenerArn><Port>80</Port><Protocol>HTTP</Protocol></member>",
                    arn
                )
            })
            .collect();
        ok(
            "DescribeListeners",
            &format!("<Listeners>{}</Listeners>{}", members, marker(next)),
        )
    }

    fn rules_page(rules: &[(&str, &str)], next: Option<&str>) -> ReplayEvent {
        let members: String = rules
            .iter()
            .map(|(path, target_group)| {
                format!(
                    "<member><RuleArn>arn:rule{path}</RuleArn><Priority>1</Priority>\
                     <Conditions><member><Field>path-pattern</Field><Values><member>{path}</member></Values></member></Conditions>\
                     <Actions><member><Type>forward</Type><TargetGroupArn>{tg}</TargetGroupArn></member></Actions></member>",
                    path = path,
                    tg = target_group
                )
            })
            .collect();
        ok(
            "DescribeRules",
            &format!("<Rules>{}</Rules>{}", members, marker(next)),
        )
    }

    fn tags_page(resource_arn: &str, name: &str) -> ReplayEvent {
        ok(
            "DescribeTags",
            &format!(
                "<TagDescriptions><member><ResourceArn>{}</ResourceArn><Tags>\
                 <member><Key>Name</Key><Value>{}</Value></member></Tags></member></TagDescriptions>",
                resource_arn, name
            ),
        )
    }

    fn request_body(http_client: &StaticReplayClient, index: usize) -> String {
        let request = http_client
            .actual_requests()
            .nth(index)
            .expect("request was not sent");
        String::from_utf8_lossy(request.body().bytes().unwrap_or_default()).to_string()
    }

    #[tokio::test]
    async fn test_describe_listeners_follows_next_marker() {
        let (control_plane, http_client) = replay_control_plane(vec![
            listeners_page(&["l1"], Some("m1")),
            listeners_page(&["l2"], None),
        ]);

        let listeners = control_plane.describe_listeners("arn:lb").await.unwrap();

        let arns: Vec<_> = listeners.iter().map(|l| l.listener_arn.as_deref()).collect();
        assert_eq!(arns, vec![Some("l1"), Some("l2")]);
        assert_eq!(listeners[0].endpoint(), "HTTP:80");
        assert_eq!(http_client.actual_requests().count(), 2);
        assert!(!request_body(&http_client, 0).contains("Marker="));
        assert!(request_body(&http_client, 1).contains("Marker=m1"));
    }

    #[tokio::test]
    async fn test_describe_rules_follows_next_marker() {
        let (control_plane, http_client) = replay_control_plane(vec![
            rules_page(&[("/api/*", "tg-api")], Some("r1")),
            rules_page(&[("/*", "tg-live")], None),
        ]);

        let rules = control_plane.describe_rules("arn:listener").await.unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].live_target_group(), None);
        assert_eq!(rules[1].live_target_group(), Some("tg-live"));
        assert_eq!(rules[1].priority.as_deref(), Some("1"));
        assert_eq!(http_client.actual_requests().count(), 2);
        assert!(request_body(&http_client, 1).contains("Marker=r1"));
    }

    #[tokio::test]
    async fn test_api_error_becomes_control_plane_error() {
        let (control_plane, _http_client) = replay_control_plane(vec![event(
            400,
            format!(
                "<ErrorResponse xmlns=\"{}\"><Error><Type>Sender</Type>\
                 <Code>LoadBalancerNotFound</Code><Message>One or more load balancers not found</Message>\
                 </Error><RequestId>req-1</RequestId></ErrorResponse>",
                XMLNS
            ),
        )]);

        let err = control_plane.describe_listeners("arn:lb").await.unwrap_err();

        match err {
            ResolveError::ControlPlane { operation, message } => {
                assert_eq!(operation, "DescribeListeners");
                assert!(message.contains("LoadBalancerNotFound"), "{}", message);
            }
            other => panic!("Expected ControlPlane error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_listener_page_counts_as_multiple_listeners() {
        let (control_plane, http_client) = replay_control_plane(vec![
            listeners_page(&["l1"], Some("m1")),
            listeners_page(&["l2"], None),
        ]);
        let resolver = EnvironmentResolver::new(control_plane);

        let err = resolver.resolve("arn:lb").await.unwrap_err();

        assert!(matches!(
            err,
            ResolveError::MultipleListeners { count: 2, .. }
        ));
        assert_eq!(http_client.actual_requests().count(), 2);
    }

    #[tokio::test]
    async fn test_resolve_over_paged_rules() {
        let (control_plane, http_client) = replay_control_plane(vec![
            listeners_page(&["l1"], None),
            rules_page(&[("/api/*", "tg-api")], Some("r1")),
            rules_page(&[("/*", "tg-live")], None),
            tags_page("tg-live", "Shop-Green"),
        ]);
        let resolver = EnvironmentResolver::new(control_plane);

        let resolution = resolver.resolve("arn:lb").await.unwrap();

        assert_eq!(resolution.environment, Environment::Green);
        assert_eq!(resolution.listener_arn, "l1");
        assert_eq!(resolution.target_group_arn, "tg-live");
        assert_eq!(http_client.actual_requests().count(), 4);
    }

    #[test]
    fn test_next_marker() {
        assert_eq!(next_marker(None), None);
        assert_eq!(next_marker(Some("")), None);
        assert_eq!(next_marker(Some("abc")), Some("abc".to_string()));
    }

    #[test]
    fn test_condition_conversion() {
        let sdk_condition = elbv2::RuleCondition::builder()
            .field("path-pattern")
            .values("/*")
            .values("/health")
            .build();

        let condition = RuleCondition::from(&sdk_condition);
        assert_eq!(condition.field.as_deref(), Some("path-pattern"));
        assert_eq!(condition.values, vec!["/*".to_string(), "/health".to_string()]);
        assert!(condition.is_catch_all());
    }

    #[test]
    fn test_listener_conversion() {
        let sdk_listener = elbv2::Listener::builder()
            .listener_arn("arn:listener")
            .port(443)
            .protocol(elbv2::ProtocolEnum::Https)
            .build();

        let listener = Listener::from(&sdk_listener);
        assert_eq!(listener.listener_arn.as_deref(), Some("arn:listener"));
        assert_eq!(listener.port, Some(443));
        assert_eq!(listener.protocol.as_deref(), Some("HTTPS"));
    }
}
