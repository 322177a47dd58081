use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use watch::{DeliveryError, Message, Notifier};

/// Characters of an unexpected reply body kept in the log.
const REPLY_SNIPPET_CHARS: usize = 200;

/// Posts messages to a Feishu custom-bot webhook.
pub struct FeishuNotifier {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct TextPayload<'a> {
    msg_type: &'static str,
    content: TextContent<'a>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    text: &'a str,
}

/// Reply body. Current bots answer `{"code": 0, "msg": "success"}`; older
/// ones `{"StatusCode": 0, "StatusMessage": "success"}`.
#[derive(Debug, Default, Deserialize)]
struct BotReply {
    code: Option<i64>,
    msg: Option<String>,
    #[serde(rename = "StatusCode")]
    status_code: Option<i64>,
    #[serde(rename = "StatusMessage")]
    status_message: Option<String>,
}

impl BotReply {
    fn rejection(self) -> Option<DeliveryError> {
        let (code, message) = match (self.code, self.status_code) {
            (Some(code), _) => (code, self.msg),
            (None, Some(code)) => (code, self.status_message),
            (None, None) => return None,
        };
        (code != 0).then(|| DeliveryError::Rejected {
            code,
            message: message.unwrap_or_default(),
        })
    }
}

impl FeishuNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for FeishuNotifier {
    async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        let text = message.text();
        let payload = TextPayload {
            msg_type: "text",
            content: TextContent { text: &text },
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(%status, error = %e, "Could not read the Feishu reply body");
                String::new()
            }
        };
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<BotReply>(&body) {
            Ok(reply) => {
                if let Some(err) = reply.rejection() {
                    return Err(err);
                }
            }
            Err(e) => {
                warn!(
                    %status,
                    error = %e,
                    body = %snippet(&body),
                    "Feishu reply is not JSON; assuming delivered"
                );
            }
        }

        debug!(title = %message.title, "Delivered to Feishu");
        Ok(())
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(REPLY_SNIPPET_CHARS) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn message() -> Message {
        Message::new("📦 New Release: DeepEP v1.0", "Tag: v1.0")
    }

    fn notifier_for(server: &MockServer) -> FeishuNotifier {
        FeishuNotifier::new(format!("{}/open-apis/bot/v2/hook/abc", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn posts_text_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/open-apis/bot/v2/hook/abc"))
            .and(body_json(json!({
                "msg_type": "text",
                "content": { "text": "📦 New Release: DeepEP v1.0\n\nTag: v1.0" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "code": 0, "msg": "success", "data": {} })),
            )
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server).send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_a_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = notifier_for(&server).send(&message()).await.unwrap_err();
        match err {
            DeliveryError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "oops");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bot_rejection_is_a_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 19001,
                "msg": "param invalid: incoming webhook access token invalid"
            })))
            .mount(&server)
            .await;

        let err = notifier_for(&server).send(&message()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected { code: 19001, .. }));
    }

    #[tokio::test]
    async fn legacy_status_code_reply_is_understood() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Extra": null,
                "StatusCode": 0,
                "StatusMessage": "success"
            })))
            .mount(&server)
            .await;

        notifier_for(&server).send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn html_reply_with_success_status_counts_as_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>Not a bot</body></html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server).send(&message()).await.unwrap();
    }

    #[test]
    fn logged_reply_is_cut_on_a_char_boundary() {
        let body = "飞".repeat(REPLY_SNIPPET_CHARS + 10);
        assert_eq!(snippet(&body).chars().count(), REPLY_SNIPPET_CHARS);
        assert_eq!(snippet("short"), "short");
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_transport_error() {
        let notifier = FeishuNotifier::new("http://127.0.0.1:9/hook").unwrap();
        let err = notifier.send(&message()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport { .. }));
    }

    #[test]
    fn reply_without_code_is_accepted() {
        assert!(BotReply::default().rejection().is_none());
    }
}
