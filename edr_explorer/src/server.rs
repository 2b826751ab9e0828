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
//! the web UI of the explorer. The dashboard page is served as a single asset and talks to the
//! explorer through a small JSON API. Each API call returns the new widget layout

use std::{net::SocketAddr, sync::Arc};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router
};
use serde::Deserialize;
use tokio::{sync::Mutex, task::JoinHandle};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{EdrExplorer, EdrExplorerError, ExplorerLayout, ServerConfig};

pub type SharedExplorer = Arc<Mutex<EdrExplorer>>;

const EXPLORER_PAGE: &str = include_str!("../assets/explorer.html");

type ApiResult = std::result::Result<Json<ExplorerLayout>,(StatusCode,String)>;

fn bad_request (e: EdrExplorerError)->(StatusCode,String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

#[derive(Deserialize,Debug)]
pub struct ConnectRequest {
    pub server_uri: Option<String>,
}

#[derive(Deserialize,Debug)]
pub struct ValueRequest {
    pub value: String,
}

#[derive(Deserialize,Debug)]
pub struct SelectionRequest {
    pub location: Option<String>,
    pub datasets: Option<Vec<String>>,
    pub end_time: Option<String>,
}

#[derive(Deserialize,Debug)]
pub struct PlotControlRequest {
    pub time: Option<String>,
    pub param: Option<String>,
}

#[derive(Deserialize,Debug)]
pub struct StyleRequest {
    pub cmap: Option<String>,
    pub alpha: Option<f64>,
}

pub fn build_router (explorer: SharedExplorer)->Router {
    Router::new()
        .route( "/", get(index_page))
        .route( "/api/state", get(get_state))
        .route( "/api/connect", post(connect))
        .route( "/api/collection", post(select_collection))
        .route( "/api/start_time", post(select_start_time))
        .route( "/api/selection", post(set_selection))
        .route( "/api/submit", post(submit))
        .route( "/api/plot_control", post(set_plot_control))
        .route( "/api/style", post(set_style))
        .route( "/api/plot.png", get(get_plot))
        .layer( TraceLayer::new_for_http())
        .with_state(explorer)
}

pub fn spawn_server_task (config: &ServerConfig, router: Router)->JoinHandle<()> {
    let sock_addr = config.sock_addr;

    tokio::spawn( async move {
        match tokio::net::TcpListener::bind(sock_addr).await {
            Ok(listener) => {
                info!("serving http://{}", sock_addr);
                if let Err(e) = axum::serve( listener, router).await {
                    error!("server terminated: {}", e);
                }
            }
            Err(e) => error!("failed to bind {}: {}", sock_addr, e)
        }
    })
}

async fn index_page ()->Html<&'static str> {
    Html(EXPLORER_PAGE)
}

async fn get_state (State(explorer): State<SharedExplorer>)->Json<ExplorerLayout> {
    Json( explorer.lock().await.layout())
}

async fn connect (State(explorer): State<SharedExplorer>, Json(req): Json<ConnectRequest>)->Json<ExplorerLayout> {
    let mut explorer = explorer.lock().await;
    if let Some(uri) = req.server_uri {
        explorer.server_uri = uri;
    }
    explorer.connect().await;
    Json( explorer.layout())
}

async fn select_collection (State(explorer): State<SharedExplorer>, Json(req): Json<ValueRequest>)->Json<ExplorerLayout> {
    let mut explorer = explorer.lock().await;
    explorer.select_collection( &req.value).await;
    Json( explorer.layout())
}

async fn select_start_time (State(explorer): State<SharedExplorer>, Json(req): Json<ValueRequest>)->ApiResult {
    let mut explorer = explorer.lock().await;
    explorer.select_start_time( &req.value).map_err( bad_request)?;
    Ok( Json( explorer.layout()) )
}

async fn set_selection (State(explorer): State<SharedExplorer>, Json(req): Json<SelectionRequest>)->ApiResult {
    let mut explorer = explorer.lock().await;
    if let Some(location) = &req.location {
        explorer.select_location( location).map_err( bad_request)?;
    }
    if let Some(datasets) = &req.datasets {
        explorer.select_datasets( datasets.as_slice()).map_err( bad_request)?;
    }
    if let Some(end_time) = &req.end_time {
        explorer.select_end_time( end_time).map_err( bad_request)?;
    }
    Ok( Json( explorer.layout()) )
}

async fn submit (State(explorer): State<SharedExplorer>)->Json<ExplorerLayout> {
    let mut explorer = explorer.lock().await;
    explorer.submit().await;
    Json( explorer.layout())
}

async fn set_plot_control (State(explorer): State<SharedExplorer>, Json(req): Json<PlotControlRequest>)->ApiResult {
    let mut explorer = explorer.lock().await;
    if let Some(time) = &req.time {
        explorer.select_plot_time( time).map_err( bad_request)?;
    }
    if let Some(param) = &req.param {
        explorer.select_plot_param( param).map_err( bad_request)?;
    }
    Ok( Json( explorer.layout()) )
}

async fn set_style (State(explorer): State<SharedExplorer>, Json(req): Json<StyleRequest>)->ApiResult {
    let mut explorer = explorer.lock().await;
    if let Some(cmap) = &req.cmap {
        explorer.set_cmap( cmap).map_err( bad_request)?;
    }
    if let Some(alpha) = req.alpha {
        explorer.set_alpha( alpha).map_err( bad_request)?;
    }
    Ok( Json( explorer.layout()) )
}

/// the current plot, or `204 No Content` if there is nothing to show
async fn get_plot (State(explorer): State<SharedExplorer>)->Response {
    let mut explorer = explorer.lock().await;
    match explorer.plot().await {
        Some(png) => ([(header::CONTENT_TYPE, "image/png"), (header::CACHE_CONTROL, "no-store")], png).into_response(),
        None => StatusCode::NO_CONTENT.into_response()
    }
}
