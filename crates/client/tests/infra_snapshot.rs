//! Integration tests for the roadway-network snapshot loader and its
//! disk-cache fallback.

mod common;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use common::MockServer;
use tetres_client::{ApiUrls, ClientConfig, HttpGateway, InfraLoader, InfraSource};

fn snapshot_json() -> Value {
    json!({
        "config": {"infra_cfg_date": "2020-01-01"},
        "corridor_list": [{
            "name": "I-35W (NB)",
            "route": "I-35W",
            "dir": "NB",
            "rnodes": ["rnd_1", "rnd_2"],
            "stations": ["rnd_1", "rnd_2"]
        }],
        "rnode_list": {
            "rnd_1": {
                "name": "rnd_1", "corridor": "I-35W (NB)", "n_type": "Station",
                "station_id": "S100", "lat": 44.90, "lon": -93.26
            },
            "rnd_2": {
                "name": "rnd_2", "corridor": "I-35W (NB)", "n_type": "Station",
                "station_id": "S101", "lat": 44.95, "lon": -93.27
            }
        },
        "detector_list": {},
        "meter_list": {},
        "api_urls": {"TTROUTE_LIST": "/tetres/adm/route/list"}
    })
}

fn infra_app() -> Router {
    Router::new().route("/ticas/infra", get(|| async { Json(snapshot_json()) }))
}

#[tokio::test]
async fn load_from_server_builds_index_and_caches() {
    let server = MockServer::spawn(infra_app()).await;
    let dir = tempfile::tempdir().unwrap();

    let loader = InfraLoader::new(server.gateway(), &server.urls(), dir.path().to_path_buf());
    let (infra, source) = loader.load().await.unwrap();

    assert_eq!(source, InfraSource::Server);
    assert_eq!(infra.corridors().len(), 1);
    assert_eq!(infra.rnode("S101").unwrap().name, "rnd_2");
    assert_eq!(infra.config_stamp(), Some("2020-01-01"));
    assert!(dir.path().join("infra.json").exists());
}

#[tokio::test]
async fn unreachable_server_falls_back_to_cache() {
    let dir = tempfile::tempdir().unwrap();

    // Warm the cache from a live server.
    {
        let server = MockServer::spawn(infra_app()).await;
        let loader = InfraLoader::new(server.gateway(), &server.urls(), dir.path().to_path_buf());
        loader.load().await.unwrap();
    }

    // Nothing listens on this port.
    let dead_url = "http://127.0.0.1:9";
    let mut config = ClientConfig::for_server(dead_url);
    config.connect_timeout_secs = 1;
    let gateway = Arc::new(HttpGateway::new(&config).unwrap());
    let loader = InfraLoader::new(gateway, &ApiUrls::new(dead_url), dir.path().to_path_buf());

    let (infra, source) = loader.load().await.unwrap();
    assert_eq!(source, InfraSource::Cache);
    assert_eq!(infra.corridors().len(), 1);
}

#[tokio::test]
async fn unreachable_server_without_cache_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let dead_url = "http://127.0.0.1:9";
    let mut config = ClientConfig::for_server(dead_url);
    config.connect_timeout_secs = 1;
    let gateway = Arc::new(HttpGateway::new(&config).unwrap());
    let loader = InfraLoader::new(gateway, &ApiUrls::new(dead_url), dir.path().to_path_buf());

    assert!(loader.load().await.is_err());
}
