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
#![allow(unused)]

use std::sync::Arc;
use tokio::{self, sync::Mutex};
use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use edr_client::{EdrClientConfig, HttpTransport};
use edr_common::config::load_config_path;
use edr_explorer::{load_config, server::{build_router, spawn_server_task}, EdrExplorer, ExplorerConfig};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "serve an interactive explorer for OGC EDR servers")]
pub struct Args {
    /// EDR server to pre-populate the server address with
    #[arg(short,long)]
    pub server_uri: Option<String>,

    /// explorer config file (RON)
    #[arg(short,long)]
    pub config: Option<String>,

    /// open the explorer in a browser
    #[arg(long)]
    pub show: bool,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let config: ExplorerConfig = match &args.config {
        Some(path) => load_config_path( path)?,
        None => load_config("edr_explorer.ron").unwrap_or_else( |e| {
            warn!("using default explorer config ({e})");
            ExplorerConfig::default()
        })
    };
    let client_config: EdrClientConfig = edr_client::load_config("edr_client.ron").unwrap_or_default();

    let transport = HttpTransport::shared( &client_config)?;
    let explorer = EdrExplorer::from_config( &config, args.server_uri.as_deref(), transport)?.with_locale( &client_config.locale);
    let explorer = Arc::new( Mutex::new( explorer));

    let server_task = spawn_server_task( &config.server, build_router( explorer));

    let url = config.server.url();
    println!("serving EDR explorer on {url}");
    if args.show {
        if let Err(e) = open::that( &url) {
            warn!("failed to open browser: {e}");
        }
    }

    server_task.await?;
    Ok(())
}
