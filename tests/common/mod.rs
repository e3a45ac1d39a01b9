//! Shared fixtures for the integration tests.
//!
//! `FakeMonday` is an in-memory `GraphqlTransport` that answers the three
//! query shapes (first page, next page, item details) from canned data and
//! records every request it sees.

#![allow(dead_code)]

use async_trait::async_trait;
use monday_board_report::client::{
    GraphqlRequest, GraphqlTransport, MondayClient, RetryPolicy, TransportResponse,
};
use monday_board_report::config::BoardConfig;
use monday_board_report::models::Filter;
use monday_board_report::Result;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct FakeMonday {
    first_pages: HashMap<String, Value>,
    next_pages: HashMap<String, Value>,
    items: HashMap<String, Value>,
    queued: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<GraphqlRequest>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

fn page(ids: &[&str], cursor: Option<&str>) -> Value {
    json!({
        "cursor": cursor,
        "items": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
    })
}

impl FakeMonday {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_page(mut self, filter: &Filter, ids: &[&str], cursor: Option<&str>) -> Self {
        self.first_pages
            .insert(filter.to_rules().to_string(), page(ids, cursor));
        self
    }

    pub fn next_page(mut self, cursor: &str, ids: &[&str], next: Option<&str>) -> Self {
        self.next_pages.insert(cursor.to_string(), page(ids, next));
        self
    }

    pub fn item(mut self, item: Value) -> Self {
        let id = item["id"].as_str().expect("item id").to_string();
        self.items.insert(id, item);
        self
    }

    /// Served (in order) before any canned data.
    pub fn respond_first_with(self, response: TransportResponse) -> Self {
        self.queued.lock().unwrap().push_back(response);
        self
    }

    /// Every request sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Most requests that were ever in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_containing(&self, needle: &str) -> Vec<GraphqlRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.query.contains(needle))
            .collect()
    }

    pub fn into_client(self) -> (Arc<FakeMonday>, MondayClient) {
        let fake = Arc::new(self);
        let client = MondayClient::new(fake.clone(), RetryPolicy::default());
        (fake, client)
    }

    fn answer(&self, request: &GraphqlRequest) -> Value {
        let vars = &request.variables;
        if request.query.contains("next_items_page") {
            let cursor = vars["cursor"].as_str().unwrap_or_default();
            let page = self
                .next_pages
                .get(cursor)
                .cloned()
                .unwrap_or_else(|| page(&[], None));
            json!({"data": {"next_items_page": page}})
        } else if request.query.contains("items_page") {
            let page = self
                .first_pages
                .get(&vars["rules"].to_string())
                .cloned()
                .unwrap_or_else(|| page(&[], None));
            json!({"data": {"boards": [{"items_page": page}]}})
        } else {
            let items: Vec<Value> = vars["ids"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|id| id.as_str().and_then(|id| self.items.get(id)).cloned())
                .collect();
            json!({"data": {"items": items}})
        }
    }
}

#[async_trait]
impl GraphqlTransport for FakeMonday {
    async fn send(&self, request: &GraphqlRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(queued) = self.queued.lock().unwrap().pop_front() {
            return Ok(queued);
        }
        Ok(TransportResponse::ok(self.answer(request)))
    }
}

/// An item as returned by the details query for the default board columns.
pub fn item(id: &str, name: &str, label: Option<&str>, sum: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "column_values": [
            {"id": "formula_mkmp4x00", "type": "formula", "text": "", "display_value": sum},
            {"id": "status6", "type": "status", "text": label.unwrap_or(""), "label": label},
            {"id": "date8", "type": "date", "text": "2024-04-18", "date": "2024-04-18"}
        ]
    })
}

pub fn default_filter() -> Filter {
    BoardConfig::default().filters[0].clone()
}

pub fn small_board(page_size: u32, batch_size: usize) -> BoardConfig {
    BoardConfig {
        page_size,
        batch_size,
        ..BoardConfig::default()
    }
}
