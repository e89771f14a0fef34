use serde_json::{json, Value};

use super::ServiceClient;
use crate::error::Result;
use crate::transport::Method;

const TEMPLATE: &str = "template";
const TEMPLATES: &str = "templates";
const TEMPLATE_CONTENTS: &str = "template/contents";
const TEMPLATE_EMAIL: &str = "template/email";
const TEMPLATE_EMAIL_GENERATE: &str = "template/email/generate";
const TEMPLATE_SMS: &str = "template/sms";
const TEMPLATE_SMS_GENERATE: &str = "template/sms/generate";

impl ServiceClient {
    pub async fn template_create(&self, data: Value) -> Result<Value> {
        self.request(Method::Create, TEMPLATE, data).await
    }

    /// All email and SMS content of a template, by type and locale
    pub async fn template_contents(&self, template_id: &str) -> Result<Value> {
        self.request(Method::Read, TEMPLATE_CONTENTS, json!({ "template": template_id }))
            .await
    }

    pub async fn template_delete(&self, id: &str) -> Result<Value> {
        self.request(Method::Delete, TEMPLATE, json!({ "_id": id })).await
    }

    pub async fn template_update(&self, data: Value) -> Result<Value> {
        self.request(Method::Update, TEMPLATE, data).await
    }

    pub async fn template_email_create(&self, data: Value) -> Result<Value> {
        self.request(Method::Create, TEMPLATE_EMAIL, data).await
    }

    /// Ask the service to render an email from unsaved content
    pub async fn template_email_generate(&self, data: Value) -> Result<Value> {
        self.request(Method::Create, TEMPLATE_EMAIL_GENERATE, data).await
    }

    pub async fn template_email_update(&self, data: Value) -> Result<Value> {
        self.request(Method::Update, TEMPLATE_EMAIL, data).await
    }

    pub async fn template_sms_create(&self, data: Value) -> Result<Value> {
        self.request(Method::Create, TEMPLATE_SMS, data).await
    }

    /// Ask the service to render an SMS from unsaved content
    pub async fn template_sms_generate(&self, data: Value) -> Result<Value> {
        self.request(Method::Create, TEMPLATE_SMS_GENERATE, data).await
    }

    pub async fn template_sms_update(&self, data: Value) -> Result<Value> {
        self.request(Method::Update, TEMPLATE_SMS, data).await
    }

    pub async fn templates(&self) -> Result<Value> {
        self.request(Method::Read, TEMPLATES, json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ServiceConfig;
    use crate::events::EventBus;
    use crate::transport::MemoryTransport;

    fn setup() -> (Arc<MemoryTransport>, ServiceClient) {
        let transport = Arc::new(MemoryTransport::new());
        let client = ServiceClient::new(transport.clone(), EventBus::new(), &ServiceConfig::default());
        (transport, client)
    }

    #[tokio::test]
    async fn test_template_lifecycle() {
        let (transport, client) = setup();

        let id = client
            .template_create(json!({"name": "welcome", "variables": {"first_name": "John"}}))
            .await
            .unwrap();
        let id = id.as_str().unwrap().to_string();

        client
            .template_update(json!({"_id": id, "name": "welcome_v2"}))
            .await
            .unwrap();
        assert_eq!(transport.count("mouth", "template"), 1);

        tokio_test::assert_ok!(client.template_delete(&id).await);
        assert_eq!(transport.count("mouth", "template"), 0);
        tokio_test::assert_err!(client.template_delete(&id).await);
    }

    #[tokio::test]
    async fn test_contents_are_filtered_by_template() {
        let (transport, client) = setup();

        client
            .template_email_create(json!({
                "template": "t1",
                "locale": "en-US",
                "subject": "Hello {first_name}",
                "text": "Welcome",
                "html": "<p>Welcome</p>"
            }))
            .await
            .unwrap();
        let sms_id = client
            .template_sms_create(json!({"template": "t1", "locale": "en-US", "content": "Hi"}))
            .await
            .unwrap();
        tokio_test::assert_ok!(
            client
                .template_sms_update(json!({"_id": sms_id, "content": "Hello"}))
                .await
        );
        tokio_test::assert_err!(
            client
                .template_email_update(json!({"_id": "missing", "subject": "x"}))
                .await
        );
        transport.insert(
            "mouth",
            "template/contents",
            [
                json!({"_id": "c1", "template": "t1", "type": "email", "locale": "en-US"}),
                json!({"_id": "c2", "template": "t2", "type": "sms", "locale": "fr-CA"}),
            ],
        );

        let contents = client.template_contents("t1").await.unwrap();
        assert_eq!(contents.as_array().unwrap().len(), 1);
        assert_eq!(contents[0]["_id"], "c1");
        assert_eq!(transport.count("mouth", "template/email"), 1);
        assert_eq!(transport.count("mouth", "template/sms"), 1);
    }

    #[tokio::test]
    async fn test_generate_goes_through_create() {
        let (transport, client) = setup();

        client
            .template_email_generate(json!({"subject": "s", "text": "t", "html": "h"}))
            .await
            .unwrap();
        client
            .template_sms_generate(json!({"content": "c"}))
            .await
            .unwrap();

        assert_eq!(transport.calls(Method::Create), 2);
        assert_eq!(transport.count("mouth", "template/email/generate"), 1);
        assert_eq!(transport.count("mouth", "template/sms/generate"), 1);
    }

    #[tokio::test]
    async fn test_templates_lists_everything() {
        let (transport, client) = setup();
        transport.insert(
            "mouth",
            "templates",
            [json!({"_id": "t1", "name": "welcome"}), json!({"_id": "t2", "name": "reset"})],
        );

        let all = client.templates().await.unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);
    }
}
