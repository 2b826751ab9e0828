/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
mod common;

use std::sync::Arc;
use axum::{body::{to_bytes, Body}, http::{header, Request, StatusCode}, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

use common::*;
use edr_explorer::{server::build_router, EdrExplorer};

fn router ()->Router {
    let explorer = EdrExplorer::new( Some(SERVER), mock_server());
    build_router( Arc::new( Mutex::new( explorer)))
}

fn post_json (uri: &str, body: Value)->Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header( header::CONTENT_TYPE, "application/json")
        .body( Body::from( body.to_string()))
        .unwrap()
}

fn get (uri: &str)->Request<Body> {
    Request::builder().uri(uri).body( Body::empty()).unwrap()
}

async fn body_json (resp: axum::response::Response)->Value {
    let bytes = to_bytes( resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice( &bytes).unwrap()
}

#[tokio::test]
async fn test_index_and_state() {
    let app = router();

    let resp = app.clone().oneshot( get("/")).await.unwrap();
    assert_eq!( resp.status(), StatusCode::OK);
    let bytes = to_bytes( resp.into_body(), usize::MAX).await.unwrap();
    assert!( String::from_utf8_lossy( &bytes).contains("EDR Explorer"));

    let resp = app.oneshot( get("/api/state")).await.unwrap();
    assert_eq!( resp.status(), StatusCode::OK);
    let state = body_json( resp).await;
    assert_eq!( state["server_uri"], SERVER);
    assert_eq!( state["submit_disabled"], true);
    assert_eq!( state["has_plot"], false);
}

#[tokio::test]
async fn test_style_rejects_invalid_values() {
    let app = router();

    let resp = app.clone().oneshot( post_json( "/api/style", json!({"alpha": 2.0}))).await.unwrap();
    assert_eq!( resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.clone().oneshot( post_json( "/api/style", json!({"cmap": "no_such_map"}))).await.unwrap();
    assert_eq!( resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.oneshot( post_json( "/api/style", json!({"cmap": "magma", "alpha": 0.4}))).await.unwrap();
    assert_eq!( resp.status(), StatusCode::OK);
    let state = body_json( resp).await;
    assert_eq!( state["cmap"], "magma");
    assert_eq!( state["alpha"], 0.4);
}

#[tokio::test]
async fn test_plot_workflow() {
    let app = router();

    let resp = app.clone().oneshot( get("/api/plot.png")).await.unwrap();
    assert_eq!( resp.status(), StatusCode::NO_CONTENT);

    let resp = app.clone().oneshot( post_json( "/api/connect", json!({}))).await.unwrap();
    let state = body_json( resp).await;
    assert_eq!( state["connect_error"]["visible"], false);
    assert_eq!( state["collections"]["value"], "uk_model");

    let resp = app.clone().oneshot( post_json( "/api/start_time", json!({"value": "2021-01-01T06:00:00Z"}))).await.unwrap();
    assert_eq!( resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot( post_json( "/api/selection", json!({"datasets": ["no_such_param"]}))).await.unwrap();
    assert_eq!( resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.clone().oneshot( post_json( "/api/selection", json!({"datasets": ["air_temperature"]}))).await.unwrap();
    assert_eq!( resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot( post_json( "/api/submit", json!({}))).await.unwrap();
    let state = body_json( resp).await;
    assert_eq!( state["has_plot"], true);
    assert_eq!( state["data_key"], "name=air_temperature,t=2021-01-01T06:00:00Z");

    let resp = app.oneshot( get("/api/plot.png")).await.unwrap();
    assert_eq!( resp.status(), StatusCode::OK);
    assert_eq!( resp.headers()[header::CONTENT_TYPE], "image/png");
}
