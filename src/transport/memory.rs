//! In-memory transport backed by DashMap.
//!
//! Records are kept per `service/noun` in insertion order and lost when the
//! transport is dropped. Useful offline and in tests, where scripted
//! responses can stand in for a misbehaving service.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{Method, Response, Transport};
use crate::error::{ClientError, ServiceError};

/// Request body was not an object or lacked a required field
pub const INVALID_REQUEST: i64 = 1001;
/// A record with the given `_id` already exists
pub const RECORD_EXISTS: i64 = 1101;
/// No record with the given `_id`
pub const RECORD_NOT_FOUND: i64 = 1104;

/// In-memory transport.
///
/// Uses `DashMap` for concurrent access to per-noun record lists.
#[derive(Default)]
pub struct MemoryTransport {
    /// `service/noun` -> records
    records: DashMap<String, Vec<Map<String, Value>>>,
    /// Calls seen per verb
    calls: DashMap<Method, usize>,
    /// Responses returned, in order, before the store is consulted
    scripted: Mutex<VecDeque<Response>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `service/noun` with records, bypassing the call counters
    pub fn insert(&self, service: &str, noun: &str, records: impl IntoIterator<Item = Value>) {
        let mut list = self.records.entry(key(service, noun)).or_default();
        for record in records {
            if let Value::Object(map) = record {
                list.push(map);
            }
        }
    }

    /// Queue a response to be returned by the next call instead of the store
    pub fn enqueue_response(&self, response: Response) {
        self.scripted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Make the next call fail with the given service error
    pub fn fail_next(&self, error: ServiceError) {
        self.enqueue_response(Response::error(error));
    }

    /// Number of calls made with `method`
    pub fn calls(&self, method: Method) -> usize {
        self.calls.get(&method).map(|c| *c).unwrap_or(0)
    }

    /// Number of records stored under `service/noun`
    pub fn count(&self, service: &str, noun: &str) -> usize {
        self.records
            .get(&key(service, noun))
            .map(|list| list.len())
            .unwrap_or(0)
    }

    fn next_scripted(&self) -> Option<Response> {
        self.scripted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }

    fn create_record(&self, key: String, mut record: Map<String, Value>) -> Response {
        let id = match record.get("_id") {
            Some(Value::String(id)) => id.clone(),
            Some(_) => return invalid("_id must be a string"),
            None => {
                let id = Uuid::new_v4().to_string();
                record.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut list = self.records.entry(key).or_default();
        if list.iter().any(|r| has_id(r, &id)) {
            return Response::error(ServiceError::new(RECORD_EXISTS, id));
        }
        list.push(record);

        Response::data(Value::String(id))
    }

    fn read_records(&self, key: &str, filter: Map<String, Value>) -> Response {
        let list = self.records.get(key);
        let records = list.as_deref().map(Vec::as_slice).unwrap_or(&[]);

        if let Some(id) = filter.get("_id") {
            let Some(id) = id.as_str() else {
                return invalid("_id must be a string");
            };
            return match records.iter().find(|r| has_id(r, id)) {
                Some(record) => Response::data(Value::Object(record.clone())),
                None => Response::error(ServiceError::new(RECORD_NOT_FOUND, id)),
            };
        }

        let matched: Vec<Value> = records
            .iter()
            .filter(|r| filter.iter().all(|(k, v)| r.get(k) == Some(v)))
            .cloned()
            .map(Value::Object)
            .collect();

        Response::data(Value::Array(matched))
    }

    fn update_record(&self, key: &str, changes: Map<String, Value>) -> Response {
        let Some(id) = changes.get("_id").and_then(Value::as_str).map(str::to_string) else {
            return invalid("_id is required");
        };

        let mut list = match self.records.get_mut(key) {
            Some(list) => list,
            None => return Response::error(ServiceError::new(RECORD_NOT_FOUND, id)),
        };

        match list.iter_mut().find(|r| has_id(r, &id)) {
            Some(record) => {
                for (field, value) in changes {
                    record.insert(field, value);
                }
                Response::data(Value::Bool(true))
            }
            None => Response::error(ServiceError::new(RECORD_NOT_FOUND, id)),
        }
    }

    fn delete_record(&self, key: &str, filter: Map<String, Value>) -> Response {
        let Some(id) = filter.get("_id").and_then(Value::as_str) else {
            return invalid("_id is required");
        };

        if let Some(mut list) = self.records.get_mut(key) {
            if let Some(pos) = list.iter().position(|r| has_id(r, id)) {
                list.remove(pos);
                return Response::data(Value::Bool(true));
            }
        }

        Response::error(ServiceError::new(RECORD_NOT_FOUND, id))
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn request(
        &self,
        method: Method,
        service: &str,
        noun: &str,
        body: Value,
    ) -> Result<Response, ClientError> {
        *self.calls.entry(method).or_insert(0) += 1;

        if let Some(response) = self.next_scripted() {
            tracing::debug!(%method, service, noun, "Returning scripted response");
            return Ok(response);
        }

        let body = match body {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Ok(invalid("body must be an object")),
        };

        let key = key(service, noun);
        let response = match method {
            Method::Create => self.create_record(key, body),
            Method::Read => self.read_records(&key, body),
            Method::Update => self.update_record(&key, body),
            Method::Delete => self.delete_record(&key, body),
        };

        tracing::trace!(%method, service, noun, ok = response.error.is_none(), "Memory request handled");
        Ok(response)
    }
}

fn key(service: &str, noun: &str) -> String {
    format!("{}/{}", service, noun)
}

fn has_id(record: &Map<String, Value>, id: &str) -> bool {
    record.get("_id").and_then(Value::as_str) == Some(id)
}

fn invalid(reason: &str) -> Response {
    Response::error(ServiceError {
        code: INVALID_REQUEST,
        msg: Some(json!(reason)),
    })
}
