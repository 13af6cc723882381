// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Integration tests for the Garmin provider.
//!
//! These tests verify activity resolution, document retrieval, and
//! degraded-fetch behavior using mocked HTTP responses.

use anyhow::Result;
use garmin_report_bot::providers::garmin::GarminClient;
use garmin_report_bot::providers::FitnessDataSource;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

/// Helper to create a mock activity list response with one entry.
fn mock_activity_list_response(activity_id: u64) -> serde_json::Value {
    json!([
        {
            "activityId": activity_id,
            "activityName": "Morning Run",
            "startTimeLocal": "2026-08-20 07:31:02"
        }
    ])
}

/// Helper to create a mock activity detail response.
fn mock_activity_detail_response(activity_id: u64) -> serde_json::Value {
    json!({
        "activityId": activity_id,
        "locationName": "Collserola",
        "activityTypeDTO": {"typeKey": "running"},
        "summaryDTO": {
            "distance": 8000.0,
            "duration": 2400.0,
            "averageSpeed": 3.33
        }
    })
}

fn mock_zones_response() -> serde_json::Value {
    json!([
        {"zoneNumber": 1, "zoneLowBoundary": 100, "secsInZone": 1800},
        {"zoneNumber": 2, "zoneLowBoundary": 140, "secsInZone": 600}
    ])
}

fn mock_splits_response() -> serde_json::Value {
    json!({
        "lapDTOs": [
            {"distance": 1000.0, "duration": 300.0, "averageSpeed": 3.33}
        ]
    })
}

/// An authenticated client pointed at the mock server.
fn client_for(server: &ServerGuard) -> GarminClient {
    let mut client = GarminClient::with_base_url(server.url());
    client.authenticate("test_access_token");
    client
}

fn list_query(index: usize) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("start".into(), index.to_string()),
        Matcher::UrlEncoded("limit".into(), "1".into()),
    ])
}

#[tokio::test]
async fn test_fetch_activity_documents() -> Result<()> {
    let mut server = Server::new_async().await;

    let list_mock = server
        .mock("GET", "/activitylist-service/activities/search/activities")
        .match_query(list_query(0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_activity_list_response(1001).to_string())
        .create_async()
        .await;
    let detail_mock = server
        .mock("GET", "/activity-service/activity/1001")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_activity_detail_response(1001).to_string())
        .create_async()
        .await;
    let zones_mock = server
        .mock("GET", "/activity-service/activity/1001/hrTimeInZones")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_zones_response().to_string())
        .create_async()
        .await;
    let splits_mock = server
        .mock("GET", "/activity-service/activity/1001/splits")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_splits_response().to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let docs = client
        .fetch_activity_documents(0)
        .await?
        .expect("expected an activity at index 0");

    assert_eq!(docs.detail["activityId"], json!(1001));
    assert_eq!(docs.detail["summaryDTO"]["distance"], json!(8000.0));
    let zones = docs.zones.expect("zones should be present");
    assert_eq!(zones.as_array().map(Vec::len), Some(2));
    let splits = docs.splits.expect("splits should be present");
    assert_eq!(splits["lapDTOs"][0]["distance"], json!(1000.0));

    list_mock.assert_async().await;
    detail_mock.assert_async().await;
    zones_mock.assert_async().await;
    splits_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_bearer_token_is_sent() -> Result<()> {
    let mut server = Server::new_async().await;

    let list_mock = server
        .mock("GET", "/activitylist-service/activities/search/activities")
        .match_query(list_query(0))
        .match_header("authorization", "Bearer test_access_token")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    let docs = client.fetch_activity_documents(0).await?;
    assert!(docs.is_none());

    list_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_sub_document_failures_degrade_to_none() -> Result<()> {
    let mut server = Server::new_async().await;

    let _list = server
        .mock("GET", "/activitylist-service/activities/search/activities")
        .match_query(list_query(2))
        .with_status(200)
        .with_body(mock_activity_list_response(2002).to_string())
        .create_async()
        .await;
    let _detail = server
        .mock("GET", "/activity-service/activity/2002")
        .with_status(200)
        .with_body(mock_activity_detail_response(2002).to_string())
        .create_async()
        .await;
    let _zones = server
        .mock("GET", "/activity-service/activity/2002/hrTimeInZones")
        .with_status(500)
        .create_async()
        .await;
    let _splits = server
        .mock("GET", "/activity-service/activity/2002/splits")
        .with_status(404)
        .create_async()
        .await;

    let client = client_for(&server);
    let docs = client
        .fetch_activity_documents(2)
        .await?
        .expect("detail fetch succeeded, so the result must be present");

    assert_eq!(docs.detail["activityId"], json!(2002));
    assert!(docs.zones.is_none());
    assert!(docs.splits.is_none());
    Ok(())
}

#[tokio::test]
async fn test_empty_activity_list_yields_none() -> Result<()> {
    let mut server = Server::new_async().await;

    let _list = server
        .mock("GET", "/activitylist-service/activities/search/activities")
        .match_query(list_query(99))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.fetch_activity_documents(99).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_detail_failure_is_an_error() -> Result<()> {
    let mut server = Server::new_async().await;

    let _list = server
        .mock("GET", "/activitylist-service/activities/search/activities")
        .match_query(list_query(0))
        .with_status(200)
        .with_body(mock_activity_list_response(3003).to_string())
        .create_async()
        .await;
    let _detail = server
        .mock("GET", "/activity-service/activity/3003")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.fetch_activity_documents(0).await;
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to fetch activity 3003"));
    Ok(())
}

#[tokio::test]
async fn test_unauthenticated_client_fails() -> Result<()> {
    let server = Server::new_async().await;

    let client = GarminClient::with_base_url(server.url());
    let result = client.fetch_activity_documents(0).await;
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Not authenticated"));
    Ok(())
}
