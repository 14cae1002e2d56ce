//! Integration tests for the estimation job workflow: submit, poll
//! until ready, download and extract the result archive.

mod common;

use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Form, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use common::{error, fail, success, MockServer};
use tetres_client::{ClientConfig, EstimationClient, EstimationError, HttpGateway, JobEvent};
use tetres_core::estimation::{
    EstimationRequestInfo, OperatingConditionParameterInfo, ReliabilityEstimationModeInfo,
    WeekdayConditionInfo,
};

/// Mock estimation backend: a job becomes ready after a fixed number of
/// result polls.
struct EstState {
    polls_until_ready: u32,
    polls_seen: AtomicU32,
    reject_submit: bool,
}

type EstForm = Form<std::collections::HashMap<String, String>>;

async fn est_submit(State(state): State<Arc<EstState>>, Form(params): EstForm) -> Json<Value> {
    if state.reject_submit {
        return Json(fail("Invalid Request (no oc_param)"));
    }
    if !params.contains_key("routeIDs") || !params.contains_key("param") {
        return Json(error("missing routeIDs or param"));
    }
    // The param field must decode as an estimation request.
    let Ok(request) = serde_json::from_str::<EstimationRequestInfo>(&params["param"]) else {
        return Json(error("malformed param"));
    };
    if request.oc_param.is_none() {
        return Json(error("Invalid Request (no oc_param)"));
    }
    Json(success(json!({"uid": "est_0001"})))
}

async fn est_result(State(state): State<Arc<EstState>>, Form(params): EstForm) -> Json<Value> {
    if params.get("uid").map(String::as_str) != Some("est_0001") {
        return Json(error("invalid uid"));
    }
    let seen = state.polls_seen.fetch_add(1, Ordering::SeqCst) + 1;
    if seen >= state.polls_until_ready {
        Json(success(json!("file is ready")))
    } else {
        Json(fail("process is running"))
    }
}

async fn est_download(Query(params): Query<std::collections::HashMap<String, String>>) -> Vec<u8> {
    assert_eq!(params.get("uid").map(String::as_str), Some("est_0001"));
    result_zip()
}

/// A small result archive with one spreadsheet-like file.
fn result_zip() -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file("traveltime.csv", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(b"date,tt\n2019-01-01,12.5\n")
            .unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

fn estimation_app(polls_until_ready: u32, reject_submit: bool) -> Router {
    let state = Arc::new(EstState {
        polls_until_ready,
        polls_seen: AtomicU32::new(0),
        reject_submit,
    });
    Router::new()
        .route("/tetres/user/estimation", post(est_submit))
        .route("/tetres/user/estimation/result", post(est_result))
        .route("/tetres/user/estimation/download", get(est_download))
        .with_state(state)
}

fn request() -> EstimationRequestInfo {
    EstimationRequestInfo {
        start_date: Some("2019-01-01".into()),
        end_date: Some("2019-03-31".into()),
        start_time: Some("06:00:00".into()),
        end_time: Some("09:00:00".into()),
        weekdays: Some(WeekdayConditionInfo::weekdays_only()),
        estimation_mode: Some(ReliabilityEstimationModeInfo {
            mode_daily: true,
            ..Default::default()
        }),
        oc_param: Some(OperatingConditionParameterInfo::default()),
        write_spreadsheets: Some(true),
        write_graph_images: Some(false),
        write_moe_spreadsheet: Some(false),
        ..Default::default()
    }
}

fn client_for(server: &MockServer, data_dir: &std::path::Path) -> EstimationClient {
    let mut config = ClientConfig::for_server(&server.base_url);
    config.data_dir = data_dir.to_path_buf();
    // Keep the polling loop fast under test.
    config.poll_interval_secs = 0;
    let gateway = Arc::new(HttpGateway::new(&config).unwrap());
    EstimationClient::new(gateway, server.urls(), &config)
}

#[tokio::test]
async fn full_workflow_downloads_and_extracts() {
    let server = MockServer::spawn(estimation_app(3, false)).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server, dir.path());
    let mut rx = client.subscribe();

    let output_dir = client
        .estimate(&[1, 2], &request(), &CancellationToken::new())
        .await
        .unwrap();

    // The archive is extracted and removed.
    let extracted = output_dir.join("traveltime.csv");
    let content = std::fs::read_to_string(&extracted).unwrap();
    assert!(content.contains("2019-01-01"));
    assert!(!dir.path().join("results/est_0001.zip").exists());

    // Progress events: submitted, polled while running, ready, downloaded.
    assert_matches!(rx.try_recv().unwrap(), JobEvent::Submitted { .. });
    assert_matches!(rx.try_recv().unwrap(), JobEvent::Polled { attempt: 1, .. });
    assert_matches!(rx.try_recv().unwrap(), JobEvent::Polled { attempt: 2, .. });
    assert_matches!(rx.try_recv().unwrap(), JobEvent::Ready { .. });
    assert_matches!(rx.try_recv().unwrap(), JobEvent::Downloaded { .. });
}

#[tokio::test]
async fn immediate_ready_skips_waiting() {
    let server = MockServer::spawn(estimation_app(1, false)).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server, dir.path());

    let uid = client.submit(&[7], &request()).await.unwrap();
    client
        .wait_until_ready(&uid, &CancellationToken::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_submission_is_an_error() {
    let server = MockServer::spawn(estimation_app(1, true)).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server, dir.path());

    let err = client.submit(&[1], &request()).await.unwrap_err();
    assert_matches!(err, EstimationError::Rejected(_));
}

#[tokio::test]
async fn invalid_request_fails_before_submission() {
    let server = MockServer::spawn(estimation_app(1, false)).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server, dir.path());

    let mut bad = request();
    bad.oc_param = None;
    let err = client
        .estimate(&[1], &bad, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(err, EstimationError::Invalid(_));
}

#[tokio::test]
async fn unknown_uid_aborts_polling() {
    let server = MockServer::spawn(estimation_app(99, false)).await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server, dir.path());

    let err = client
        .wait_until_ready("est_bogus", &CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(err, EstimationError::Rejected(_));
}

#[tokio::test]
async fn cancellation_stops_the_wait() {
    // Never becomes ready.
    let server = MockServer::spawn(estimation_app(u32::MAX, false)).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = ClientConfig::for_server(&server.base_url);
    config.data_dir = dir.path().to_path_buf();
    config.poll_interval_secs = 60;
    let gateway = Arc::new(HttpGateway::new(&config).unwrap());
    let client = EstimationClient::new(gateway, server.urls(), &config);
    let mut rx = client.subscribe();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let uid = client.submit(&[1], &request()).await.unwrap();
    let err = client.wait_until_ready(&uid, &cancel).await.unwrap_err();
    assert_matches!(err, EstimationError::Cancelled(_));

    assert_matches!(rx.try_recv().unwrap(), JobEvent::Submitted { .. });
    assert_matches!(rx.try_recv().unwrap(), JobEvent::Polled { .. });
    assert_matches!(rx.try_recv().unwrap(), JobEvent::Cancelled { .. });
}
