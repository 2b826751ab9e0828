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

//! client side access to OGC Environmental Data Retrieval (EDR) servers. The main types are
//! - [`EdrInterface`]: navigates the collection metadata of a server and submits data queries
//! - [`DataHandler`]: wraps the CoverageJSON response of a data query, retrieves (tiled) data
//!   arrays and caches them
//! - [`GridDataset`]: self-describing n-dimensional datasets built from query responses

use std::{sync::Arc, time::Duration};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize,Serialize};
use serde_json::Value;

use edr_common::{datetime::{deserialize_duration, secs}, define_load_config, net::get_json};

mod errors;
pub use errors::*;

pub mod lookup;
pub mod metadata;

mod interface;
pub use interface::*;

mod data;
pub use data::*;

mod dataset;
pub use dataset::*;

define_load_config!{}

#[derive(Clone,Serialize,Deserialize,Debug)]
pub struct EdrClientConfig {
    /// request timeout
    #[serde(deserialize_with="deserialize_duration")]
    pub timeout: Duration,

    pub user_agent: String,

    /// preferred locale for labels that are provided in several languages
    pub locale: String,
}

impl Default for EdrClientConfig {
    fn default()->Self {
        EdrClientConfig {
            timeout: secs(30),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            locale: "en".to_string(),
        }
    }
}

/// abstraction of how we get JSON documents from the server. The main purpose of this trait is
/// to decouple interface and data handler logic from reqwest so that they can be used with
/// recorded responses
#[async_trait]
pub trait EdrTransport: Send + Sync {
    async fn get_json (&self, uri: &str)->Result<Value>;
}

/// the reqwest based transport we use for real servers
pub struct HttpTransport {
    client: Client
}

impl HttpTransport {
    pub fn new (config: &EdrClientConfig)->Result<Self> {
        let client = Client::builder()
            .timeout( config.timeout)
            .user_agent( config.user_agent.as_str())
            .build()?;
        Ok( HttpTransport { client } )
    }

    pub fn shared (config: &EdrClientConfig)->Result<Arc<dyn EdrTransport>> {
        Ok( Arc::new( Self::new(config)?) )
    }
}

#[async_trait]
impl EdrTransport for HttpTransport {
    async fn get_json (&self, uri: &str)->Result<Value> {
        Ok( get_json( &self.client, uri).await? )
    }
}
