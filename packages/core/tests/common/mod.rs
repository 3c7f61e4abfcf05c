//! Shared test helpers
//!
//! - `MockConnection`: scripted `Connection` that records every statement and
//!   answers from canned rows or errors, matched by SQL fragment
//! - `init_tracing`: route `tracing` output through the test writer

#![allow(dead_code)]

use async_trait::async_trait;
use cmsdb_core::db::{Connection, DriverError, Row};
use cmsdb_core::models::FieldValue;
use serde_json::Value;
use std::sync::Mutex;

/// Install a subscriber honoring `RUST_LOG`; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One executed statement
#[derive(Debug, Clone)]
pub struct Executed {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

type Response = Result<Vec<Row>, DriverError>;

/// Scripted connection for dialect and inspector tests
#[derive(Default)]
pub struct MockConnection {
    rules: Vec<(String, Response)>,
    executed: Mutex<Vec<Executed>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer statements containing `fragment` with `rows`
    ///
    /// Rules are matched in the order they were added.
    pub fn on(mut self, fragment: &str, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.as_object().cloned().unwrap_or_default())
            .collect();
        self.rules.push((fragment.to_string(), Ok(rows)));
        self
    }

    /// Fail statements containing `fragment` with `error`
    pub fn fail(mut self, fragment: &str, error: DriverError) -> Self {
        self.rules.push((fragment.to_string(), Err(error)));
        self
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.executed.lock().unwrap().clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|e| e.sql).collect()
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn raw(&self, sql: &str, params: &[FieldValue]) -> Result<Vec<Row>, DriverError> {
        self.executed.lock().unwrap().push(Executed {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        self.rules
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
