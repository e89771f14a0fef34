use async_trait::async_trait;
use serde_json::{json, Map, Value};

use super::ServiceClient;
use crate::error::Result;
use crate::locale::{Locale, LocaleSource};
use crate::transport::Method;

const LOCALE: &str = "locale";

impl ServiceClient {
    /// Create a new locale, returns its id
    pub async fn locale_create(&self, data: Value) -> Result<Value> {
        self.request(Method::Create, LOCALE, data).await
    }

    pub async fn locale_delete(&self, id: &str) -> Result<Value> {
        self.request(Method::Delete, LOCALE, json!({ "_id": id }))
            .await
    }

    /// Read one locale, or all of them when `id` is `None`
    pub async fn locale_read(&self, id: Option<&str>) -> Result<Value> {
        let mut filter = Map::new();
        if let Some(id) = id {
            filter.insert("_id".to_string(), Value::String(id.to_string()));
        }
        self.request(Method::Read, LOCALE, Value::Object(filter))
            .await
    }

    /// Update an existing locale; `data` must include its `_id`
    pub async fn locale_update(&self, data: Value) -> Result<Value> {
        self.request(Method::Update, LOCALE, data).await
    }

    pub async fn locale(&self, id: &str) -> Result<Locale> {
        let data = self.locale_read(Some(id)).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn locales(&self) -> Result<Vec<Locale>> {
        let data = self.locale_read(None).await?;
        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl LocaleSource for ServiceClient {
    async fn read_locales(&self) -> Result<Vec<Locale>> {
        self.locales().await
    }
}
