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

//! an interactive explorer for the data of OGC Environmental Data Retrieval (EDR) servers.
//! [`EdrExplorer`] holds the state of all selector widgets and implements their callbacks,
//! the [`server`] module provides the web UI that drives it

use std::{net::SocketAddr, sync::Arc};
use serde::{Deserialize,Serialize};
use tracing::{debug, info, warn};

use edr_common::define_load_config;
use edr_client::{CoordSelection, DataHandler, EdrInterface, EdrTransport};

pub mod errors;
pub use errors::*;

pub mod render;
use render::Colormap;

pub mod server;

define_load_config!{}

pub const DEFAULT_CMAP: &str = "viridis";
pub const DEFAULT_ALPHA: f64 = 0.85;

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,
}

impl ServerConfig {
    pub fn url (&self)->String {
        format!("http://{}", self.sock_addr)
    }
}

impl Default for ServerConfig {
    fn default()->Self {
        ServerConfig { sock_addr: SocketAddr::from( ([127,0,0,1], 5006)) }
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ExplorerConfig {
    pub server: ServerConfig,

    /// EDR server to pre-populate the server address with
    pub default_server: Option<String>,

    pub cmap: String,
    pub alpha: f64,
}

impl Default for ExplorerConfig {
    fn default()->Self {
        ExplorerConfig { server: ServerConfig::default(), default_server: None, cmap: DEFAULT_CMAP.to_string(), alpha: DEFAULT_ALPHA }
    }
}

/* #region widgets ***************************************************************************************/

#[derive(Serialize,Debug,Clone,PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new (label: impl ToString, value: impl ToString)->Self {
        SelectOption { label: label.to_string(), value: value.to_string() }
    }

    /// option where label and value are the same
    pub fn plain (value: impl ToString)->Self {
        let value = value.to_string();
        SelectOption { label: value.clone(), value }
    }
}

/// single value selector (dropdown, selection slider)
#[derive(Serialize,Debug,Clone)]
pub struct Select {
    pub description: &'static str,
    pub options: Vec<SelectOption>,
    pub value: Option<String>,
    pub disabled: bool,
}

impl Select {
    fn new (description: &'static str)->Self {
        Select { description, options: Vec::new(), value: None, disabled: true }
    }

    fn clear (&mut self) {
        self.options.clear();
        self.value = None;
        self.disabled = true;
    }

    /// set options and select the first one
    fn set_options (&mut self, options: Vec<SelectOption>) {
        self.value = options.first().map( |o| o.value.clone());
        self.options = options;
    }

    pub fn has_option (&self, value: &str)->bool {
        self.options.iter().any( |o| o.value == value)
    }

    pub fn values (&self)->Vec<&str> {
        self.options.iter().map( |o| o.value.as_str()).collect()
    }

    fn select (&mut self, value: &str)->Result<()> {
        if self.has_option(value) {
            self.value = Some(value.to_string());
            Ok(())
        } else {
            Err( invalid_selection( format!("{}: no option {:?}", self.description, value)))
        }
    }
}

/// multi value selector
#[derive(Serialize,Debug,Clone)]
pub struct MultiSelect {
    pub description: &'static str,
    pub options: Vec<SelectOption>,
    pub value: Vec<String>,
    pub disabled: bool,
}

impl MultiSelect {
    fn new (description: &'static str)->Self {
        MultiSelect { description, options: Vec::new(), value: Vec::new(), disabled: true }
    }

    fn clear (&mut self) {
        self.options.clear();
        self.value.clear();
        self.disabled = true;
    }

    fn select<S: AsRef<str>> (&mut self, values: &[S])->Result<()> {
        for v in values {
            let v = v.as_ref();
            if !self.options.iter().any( |o| o.value == v) {
                return Err( invalid_selection( format!("{}: no option {:?}", self.description, v)))
            }
        }
        self.value = values.iter().map( |v| v.as_ref().to_string()).collect();
        Ok(())
    }
}

/// error display. Hidden while there is no message
#[derive(Serialize,Debug,Clone,Default)]
pub struct ErrorBox {
    pub message: String,
    pub visible: bool,
}

impl ErrorBox {
    fn set (&mut self, msg: impl ToString) {
        self.message = msg.to_string();
        self.visible = !self.message.is_empty();
    }

    fn clear (&mut self) {
        self.set("");
    }
}

/// serializable snapshot of the explorer widgets
#[derive(Serialize,Debug,Clone)]
pub struct ExplorerLayout {
    pub server_uri: String,
    pub connect_error: ErrorBox,

    pub collections: Select,
    pub locations: Select,
    pub datasets: MultiSelect,
    pub start_time: Select,
    pub end_time: Select,
    pub submit_disabled: bool,
    pub data_error: ErrorBox,

    pub plot_times: Select,
    pub plot_params: Select,
    pub cmap: String,
    pub alpha: f64,
    pub data_key: String,
    pub has_plot: bool,
}

/* #endregion widgets */

/// the explorer dashboard state. The server address field is populated either at construction
/// time or later, `connect()` retrieves the collections of the server and enables the query
/// controls, `submit()` runs a locations query with the selected values and enables the plot
/// controls, which determine the data shown by `plot()`
pub struct EdrExplorer {
    pub server_uri: String,
    cmap: String,
    alpha: f64,

    collections: Select,
    locations: Select,
    datasets: MultiSelect,
    start_time: Select,
    end_time: Select,
    submit_disabled: bool,

    plot_times: Select,
    plot_params: Select,

    connect_error: ErrorBox,
    data_error: ErrorBox,

    data_key: String,
    locale: String,

    transport: Arc<dyn EdrTransport>,
    interface: Option<EdrInterface>,
    data_handler: Option<DataHandler>,
}

impl EdrExplorer {

    /// create a new explorer, optionally pre-populating the server address
    pub fn new (server_uri: Option<&str>, transport: Arc<dyn EdrTransport>)->Self {
        EdrExplorer {
            server_uri: server_uri.unwrap_or_default().to_string(),
            cmap: DEFAULT_CMAP.to_string(),
            alpha: DEFAULT_ALPHA,

            collections: Select::new("Collections"),
            locations: Select::new("Locations"),
            datasets: MultiSelect::new("Datasets"),
            start_time: Select::new("Start Date"),
            end_time: Select::new("End Date"),
            submit_disabled: true,

            plot_times: Select::new("Timestep"),
            plot_params: Select::new("Parameter"),

            connect_error: ErrorBox::default(),
            data_error: ErrorBox::default(),

            data_key: String::new(),
            locale: "en".to_string(),

            transport,
            interface: None,
            data_handler: None,
        }
    }

    pub fn from_config (config: &ExplorerConfig, server_uri: Option<&str>, transport: Arc<dyn EdrTransport>)->Result<Self> {
        let mut explorer = EdrExplorer::new( server_uri.or( config.default_server.as_deref()), transport);
        explorer.set_cmap( &config.cmap)?;
        explorer.set_alpha( config.alpha)?;
        Ok(explorer)
    }

    pub fn with_locale (mut self, locale: impl ToString)->Self {
        self.locale = locale.to_string();
        self
    }

    pub fn cmap (&self)->&str { &self.cmap }

    pub fn set_cmap (&mut self, cmap: &str)->Result<()> {
        Colormap::from_name(cmap)?;
        self.cmap = cmap.to_string();
        Ok(())
    }

    pub fn alpha (&self)->f64 { self.alpha }

    pub fn set_alpha (&mut self, alpha: f64)->Result<()> {
        if (0.0..=1.0).contains(&alpha) {
            self.alpha = alpha;
            Ok(())
        } else {
            Err( EdrExplorerError::InvalidAlpha(alpha))
        }
    }

    pub fn data_key (&self)->&str { &self.data_key }

    pub fn interface (&self)->Option<&EdrInterface> { self.interface.as_ref() }

    pub fn data_handler (&self)->Option<&DataHandler> { self.data_handler.as_ref() }

    pub fn connect_error (&self)->&str { &self.connect_error.message }

    pub fn data_error (&self)->&str { &self.data_error.message }

    pub fn layout (&self)->ExplorerLayout {
        ExplorerLayout {
            server_uri: self.server_uri.clone(),
            connect_error: self.connect_error.clone(),
            collections: self.collections.clone(),
            locations: self.locations.clone(),
            datasets: self.datasets.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            submit_disabled: self.submit_disabled,
            data_error: self.data_error.clone(),
            plot_times: self.plot_times.clone(),
            plot_params: self.plot_params.clone(),
            cmap: self.cmap.clone(),
            alpha: self.alpha,
            data_key: self.data_key.clone(),
            has_plot: !self.data_key.is_empty(),
        }
    }

    /* #region callbacks ***************************************************************************/

    fn clear_controls (&mut self) {
        self.collections.clear();
        self.locations.clear();
        self.datasets.clear();
        self.start_time.clear();
        self.end_time.clear();
        self.plot_times.clear();
        self.plot_params.clear();
        self.submit_disabled = true;

        self.connect_error.clear();
        self.data_error.clear();
        self.data_key.clear();
        self.data_handler = None;
    }

    fn enable_controls (&mut self) {
        self.collections.disabled = false;
        self.locations.disabled = false;
        self.datasets.disabled = false;
        self.start_time.disabled = false;
        self.end_time.disabled = false;
        self.submit_disabled = false;
    }

    fn enable_plot_controls (&mut self) {
        self.plot_times.disabled = false;
        self.plot_params.disabled = false;
    }

    /// connect to the EDR server at `server_uri` and populate the query controls with the
    /// contents of its first collection. Errors are shown in the connect error box
    pub async fn connect (&mut self) {
        self.clear_controls();
        self.interface = None;

        match EdrInterface::connect( &self.server_uri, self.transport.clone()).await {
            Ok(edr) => {
                let edr = edr.with_locale( &self.locale);
                let options: Vec<SelectOption> = edr.collections.iter().map( |c| SelectOption::new( &c.title, &c.id)).collect();
                let first = options.first().map( |o| o.value.clone());
                self.collections.set_options( options);
                self.interface = Some(edr);

                if let Some(id) = first {
                    self.select_collection( &id).await;
                }
                self.enable_controls();
                info!("connected to {}", self.server_uri);
            }
            Err(e) => {
                warn!("failed to connect to {:?}: {}", self.server_uri, e);
                self.connect_error.set(e);
            }
        }
    }

    /// populate datasets, locations and times for the selected collection. On errors all
    /// controls keep their previous state and the error is shown in the data error box
    pub async fn select_collection (&mut self, id: &str) {
        match self.populate_contents(id).await {
            Ok(()) => self.data_error.clear(),
            Err(e) => {
                warn!("failed to select collection {:?}: {}", id, e);
                self.data_error.set(e);
            }
        }
    }

    async fn populate_contents (&mut self, id: &str)->Result<()> {
        let mut collections = self.collections.clone();
        collections.select(id)?;
        let edr = self.interface.as_ref().ok_or( EdrExplorerError::NotConnected)?;

        let datasets: Vec<SelectOption> = edr.get_collection_parameters(id)?.into_iter()
            .map( |(id,info)| SelectOption::new( info.description(), id))
            .collect();
        let locations: Vec<SelectOption> = edr.get_locations(id).await?.into_iter().map( SelectOption::plain).collect();
        let (times,_) = edr.get_temporal_extent(id)?;
        let times: Vec<SelectOption> = times.into_iter().map( SelectOption::plain).collect();

        self.collections = collections;
        self.datasets.options = datasets;
        self.datasets.value.clear();
        self.locations.set_options( locations);
        self.start_time.set_options( times.clone());
        self.end_time.value = times.last().map( |o| o.value.clone());
        self.end_time.options = times;

        Ok(())
    }

    /// only show end times that are not earlier than the selected start time
    pub fn select_start_time (&mut self, time: &str)->Result<()> {
        self.start_time.select(time)?;

        if let Some(idx) = self.start_time.options.iter().position( |o| o.value == time) {
            let end_options = self.start_time.options[idx..].to_vec();
            let keep = self.end_time.value.as_ref().map( |v| end_options.iter().any( |o| o.value == *v)).unwrap_or(false);
            if !keep {
                self.end_time.value = end_options.last().map( |o| o.value.clone());
            }
            self.end_time.options = end_options;
        }
        Ok(())
    }

    pub fn select_end_time (&mut self, time: &str)->Result<()> {
        self.end_time.select(time)
    }

    pub fn select_location (&mut self, location: &str)->Result<()> {
        self.locations.select(location)
    }

    pub fn select_datasets<S: AsRef<str>> (&mut self, ids: &[S])->Result<()> {
        self.datasets.select(ids)
    }

    /// request data for the selected collection, location, datasets and time range. On success the
    /// plot controls are populated with the times of the response and the requested datasets
    pub async fn submit (&mut self) {
        match self.request_plot_data().await {
            Ok(()) => {
                self.data_error.clear();
                self.enable_plot_controls();
                self.update_data_key();
            }
            Err(e) => {
                warn!("data request failed: {}", e);
                self.data_error.set(e);
            }
        }
    }

    async fn request_plot_data (&mut self)->Result<()> {
        let edr = self.interface.as_ref().ok_or( EdrExplorerError::NotConnected)?;

        let coll_id = self.collections.value.as_deref().ok_or_else( || invalid_selection("no collection selected"))?;
        let location = self.locations.value.as_deref().ok_or_else( || invalid_selection("no location selected"))?;
        let start = self.start_time.value.as_deref().ok_or_else( || invalid_selection("no start date selected"))?;
        let end = self.end_time.value.as_deref().ok_or_else( || invalid_selection("no end date selected"))?;
        let params = &self.datasets.value;
        if params.is_empty() {
            return Err( invalid_selection("no datasets selected"))
        }

        let handler = edr.query_locations( coll_id, location, params.as_slice(), start, end).await?;

        let times: Vec<SelectOption> = handler.coord("t").map( |c| c.strings()).unwrap_or_default()
            .into_iter().map( SelectOption::plain).collect();
        let plot_params: Vec<SelectOption> = self.datasets.options.iter()
            .filter( |o| params.contains( &o.value))
            .cloned()
            .collect();
        let first_param = params[0].clone();

        self.plot_times.set_options( times);
        self.plot_params.options = plot_params;
        self.plot_params.value = Some(first_param);
        self.data_handler = Some(handler);
        self.data_key.clear();

        Ok(())
    }

    pub fn select_plot_time (&mut self, time: &str)->Result<()> {
        self.plot_times.select(time)?;
        self.update_data_key();
        Ok(())
    }

    pub fn select_plot_param (&mut self, param: &str)->Result<()> {
        self.plot_params.select(param)?;
        self.update_data_key();
        Ok(())
    }

    /// the key of the data to plot. Selection axes other than time are fixed at their first point
    fn update_data_key (&mut self) {
        if let (Some(handler),Some(param)) = (&self.data_handler, &self.plot_params.value) {
            let mut coords = CoordSelection::new();
            for axis in handler.selection_axes() {
                let value = if axis == "t" {
                    self.plot_times.value.clone()
                } else {
                    handler.coord(axis).and_then( |c| c.value_string(0))
                };
                match value {
                    Some(v) if !v.is_empty() => { coords.insert( axis.to_string(), v); }
                    _ => return // not fully populated yet
                }
            }
            self.data_key = DataHandler::make_key( param, &coords);
            debug!("data key: {}", self.data_key);
        }
    }

    /// render the currently selected data as PNG. Returns `None` if there is nothing to plot
    /// or the data could not be retrieved, in which case the data error box shows the reason
    pub async fn plot (&mut self)->Option<Vec<u8>> {
        if self.data_key.is_empty() {
            return None
        }

        match self.render_plot().await {
            Ok(png) => {
                self.data_error.clear();
                Some(png)
            }
            Err(e) => {
                warn!("plot failed: {}", e);
                self.data_error.set(e);
                None
            }
        }
    }

    async fn render_plot (&mut self)->Result<Vec<u8>> {
        let handler = self.data_handler.as_mut().ok_or_else( || invalid_selection("no data"))?;
        let (param,coords) = DataHandler::from_key( &self.data_key)?;

        let layer = handler.to_map_layer( &param, &coords).await?;
        let clim = handler.get_colours(&param).map( |c| (c.vmin, c.vmax));
        let cmap = Colormap::from_name( &self.cmap)?;

        render::render_png( &layer, &cmap, self.alpha, clim)
    }

    /* #endregion callbacks */
}
