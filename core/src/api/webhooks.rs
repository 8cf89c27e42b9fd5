//! Webhooks API (`/webhooks/api/v1`).

use crate::client::TogglClient;
use crate::context::Context;
use crate::endpoint::encode_path_segment;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::types::webhooks::{
    CreateSubscriptionRequestBody, EventFilters, Subscription, UpdateSubscriptionRequestBody,
};

const PREFIX: &str = "webhooks/api/v1";

#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a> {
    client: &'a TogglClient,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a TogglClient) -> Self {
        Self { client }
    }

    pub async fn list_subscriptions(&self, ctx: &Context, workspace_id: i64) -> Result<Vec<Subscription>> {
        let path = format!("{PREFIX}/subscriptions/{workspace_id}");
        let subscriptions = self.client.get(ctx, &path).await?;
        Ok(subscriptions.unwrap_or_default())
    }

    pub async fn create_subscription(
        &self,
        ctx: &Context,
        workspace_id: i64,
        body: &CreateSubscriptionRequestBody,
    ) -> Result<Option<Subscription>> {
        let path = format!("{PREFIX}/subscriptions/{workspace_id}");
        self.client.post(ctx, &path, Some(body)).await
    }

    pub async fn update_subscription(
        &self,
        ctx: &Context,
        workspace_id: i64,
        subscription_id: i64,
        body: &UpdateSubscriptionRequestBody,
    ) -> Result<Option<Subscription>> {
        let path = format!("{PREFIX}/subscriptions/{workspace_id}/{subscription_id}");
        self.client.put(ctx, &path, Some(body)).await
    }

    pub async fn delete_subscription(&self, ctx: &Context, workspace_id: i64, subscription_id: i64) -> Result<()> {
        let path = format!("{PREFIX}/subscriptions/{workspace_id}/{subscription_id}");
        self.client.delete(ctx, &path).await
    }

    /// Asks the service to send a ping event to the subscription's callback.
    pub async fn ping_subscription(&self, ctx: &Context, workspace_id: i64, subscription_id: i64) -> Result<()> {
        let path = format!("{PREFIX}/ping/{workspace_id}/{subscription_id}");
        self.client
            .send_discarding::<(), ()>(ctx, HttpMethod::Post, &path, None, None)
            .await
    }

    /// Confirms ownership of a callback URL with the code the service sent to it.
    pub async fn validate_subscription(
        &self,
        ctx: &Context,
        workspace_id: i64,
        subscription_id: i64,
        validation_code: &str,
    ) -> Result<()> {
        let code = encode_path_segment(validation_code);
        let path = format!("{PREFIX}/validate/{workspace_id}/{subscription_id}/{code}");
        self.client
            .send_discarding::<(), ()>(ctx, HttpMethod::Get, &path, None, None)
            .await
    }

    pub async fn list_event_filters(&self, ctx: &Context) -> Result<EventFilters> {
        let filters = self
            .client
            .get(ctx, &format!("{PREFIX}/event_filters"))
            .await?;
        Ok(filters.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::testing::recording_client;
    use crate::types::webhooks::EventFilter;

    #[tokio::test]
    async fn create_posts_subscription() {
        let (client, recorder) = recording_client();
        recorder.push(HttpResponse::new(
            200,
            r#"{"subscription_id":11,"workspace_id":5,"enabled":false,"created_at":"2023-03-01T10:00:00Z"}"#,
        ));
        let body = CreateSubscriptionRequestBody {
            description: Some("hook".to_string()),
            event_filters: Some(vec![EventFilter {
                entity: Some("project".to_string()),
                action: Some("*".to_string()),
            }]),
            url_callback: Some("https://example.com/hook".to_string()),
            ..Default::default()
        };
        let sub = client
            .webhooks()
            .create_subscription(&Context::background(), 5, &body)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.subscription_id, Some(11));
        assert!(sub.created_at.is_some());

        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url.path(), "/webhooks/api/v1/subscriptions/5");
        assert_eq!(
            req.body.as_deref(),
            Some(
                r#"{"description":"hook","event_filters":[{"entity":"project","action":"*"}],"url_callback":"https://example.com/hook"}"#
            )
        );
    }

    #[tokio::test]
    async fn ping_and_validate_ignore_bodies() {
        let (client, recorder) = recording_client();
        recorder.push(HttpResponse::new(200, "not json"));
        recorder.push(HttpResponse::new(200, "not json"));
        let ctx = Context::background();
        client.webhooks().ping_subscription(&ctx, 5, 11).await.unwrap();
        client
            .webhooks()
            .validate_subscription(&ctx, 5, 11, "abc/123")
            .await
            .unwrap();

        let requests = recorder.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url.path(), "/webhooks/api/v1/ping/5/11");
        assert!(requests[0].body.is_none());
        assert_eq!(requests[1].method, HttpMethod::Get);
        assert_eq!(requests[1].url.path(), "/webhooks/api/v1/validate/5/11/abc%2F123");
    }

    #[tokio::test]
    async fn validation_code_stays_one_segment() {
        let (client, recorder) = recording_client();
        client
            .webhooks()
            .validate_subscription(&Context::background(), 5, 11, "a b+c")
            .await
            .unwrap();
        assert_eq!(recorder.last().url.path(), "/webhooks/api/v1/validate/5/11/a%20b%2Bc");
    }

    #[tokio::test]
    async fn update_puts_subscription() {
        let (client, recorder) = recording_client();
        recorder.push(HttpResponse::new(200, r#"{"subscription_id":11,"enabled":true}"#));
        let body = UpdateSubscriptionRequestBody {
            enabled: Some(true),
            url_callback: Some("https://example.com/hook".to_string()),
            ..Default::default()
        };
        let sub = client
            .webhooks()
            .update_subscription(&Context::background(), 5, 11, &body)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.enabled, Some(true));

        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url.path(), "/webhooks/api/v1/subscriptions/5/11");
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"enabled":true,"url_callback":"https://example.com/hook"}"#)
        );
    }

    #[tokio::test]
    async fn event_filters_decode_as_map() {
        let (client, recorder) = recording_client();
        recorder.push(HttpResponse::new(200, r#"{"project":["created","*"],"tag":["deleted"]}"#));
        let filters = client
            .webhooks()
            .list_event_filters(&Context::background())
            .await
            .unwrap();
        assert_eq!(filters["project"], ["created", "*"]);
        assert_eq!(filters.len(), 2);
    }
}
