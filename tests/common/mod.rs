//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use filter_search::models::BaseEntity;
use filter_search::search::{InMemoryExecutor, SearchService};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const TEPIX_INDEX: &str = "tepix";

/// Stock index reading, keyed by its capture instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tepix {
    #[serde(flatten)]
    pub base: BaseEntity<String>,
    pub date_time: NaiveDateTime,
    pub insert_date_time: NaiveDateTime,
    pub index_value: String,
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

/// Reading whose id follows the `y-M-d-H-m-s` convention
pub fn tepix(date_time: NaiveDateTime, index_value: &str) -> Tepix {
    tepix_inserted(date_time, date_time, index_value)
}

pub fn tepix_inserted(
    date_time: NaiveDateTime,
    insert_date_time: NaiveDateTime,
    index_value: &str,
) -> Tepix {
    let id = date_time.format("%Y-%-m-%-d-%-H-%-M-%-S").to_string();
    Tepix {
        base: BaseEntity::with_timestamp(id, Utc.from_utc_datetime(&insert_date_time)),
        date_time,
        insert_date_time,
        index_value: index_value.to_string(),
    }
}

pub fn ids(readings: &[Tepix]) -> Vec<&str> {
    readings.iter().map(|t| t.base.id.as_str()).collect()
}

/// Service over a fresh in-memory executor holding `documents`
pub async fn create_test_service(documents: &[Tepix]) -> (SearchService, Arc<InMemoryExecutor>) {
    let executor = Arc::new(InMemoryExecutor::new());
    executor
        .index_documents(TEPIX_INDEX, documents)
        .await
        .unwrap();
    (SearchService::new(executor.clone()), executor)
}

/// Parse Prometheus exposition text into metric name -> lines
pub fn parse_prometheus_output(output: &str) -> HashMap<String, Vec<String>> {
    let mut metrics = HashMap::new();
    let mut current_metric = String::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("# HELP") || line.starts_with("# TYPE") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 3 {
                current_metric = parts[2].to_string();
                metrics
                    .entry(current_metric.clone())
                    .or_insert_with(Vec::new)
                    .push(line.to_string());
            }
        } else if !line.starts_with('#') && !current_metric.is_empty() {
            metrics
                .entry(current_metric.clone())
                .or_insert_with(Vec::new)
                .push(line.to_string());
        }
    }

    metrics
}
