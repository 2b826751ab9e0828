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
use std::{fmt, sync::Arc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use edr_common::{
    BoundingBox,
    collections::LookupError,
    datetime::{expand_datetime_values, Iso8601Interval},
    net::{join_uri, value_text}
};
use crate::{
    errors::{invalid_argument, missing_field, EdrClientError, Result},
    lookup::{Calendar, Crs},
    metadata::{bbox_values, parameter_info, Collection, CollectionsResponse, ParameterInfo},
    DataHandler, EdrTransport
};

const COLLECTIONS_QUERY: &str = "collections/?f=json";

lazy_static! {
    static ref CRS_RE: Regex = Regex::new( r#"DATUM\["(?P<crsref>[\w_]+)"#).unwrap();
    static ref TRS_RE: Regex = Regex::new( r#"TDATUM\["(?P<trsref>[\w ]+)"#).unwrap();
}

/// how to select a collection: by position in the collection list, or by id or title
#[derive(Debug,Clone,PartialEq)]
pub enum CollectionKey {
    Index(usize),
    Name(String),
}

impl From<usize> for CollectionKey {
    fn from (idx: usize)->Self { CollectionKey::Index(idx) }
}

impl From<&str> for CollectionKey {
    fn from (name: &str)->Self { CollectionKey::Name(name.to_string()) }
}

impl From<&String> for CollectionKey {
    fn from (name: &String)->Self { CollectionKey::Name(name.clone()) }
}

impl fmt::Display for CollectionKey {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        match self {
            CollectionKey::Index(idx) => write!(f, "{idx}"),
            CollectionKey::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// reference to links embedded in collection metadata
#[derive(Debug,Clone)]
pub enum LinkRef<'a> {
    /// position in the `links` list
    Index(usize),
    /// all `links` hrefs that contain the given text
    Containing(&'a str),
    /// the link of a named data query (e.g. "locations")
    DataQuery(&'a str),
}

/// an interface to an EDR server that navigates the collection metadata and submits data
/// queries, which return CoverageJSON payloads wrapped into `DataHandler`s
pub struct EdrInterface {
    pub server_host: String,

    /// the raw response of the `collections` query
    pub json: Value,

    pub collections: Vec<Collection>,

    locale: String,
    transport: Arc<dyn EdrTransport>,
}

impl EdrInterface {

    /// connect to the EDR server at `server_host` and request its `collections` metadata
    pub async fn connect (server_host: &str, transport: Arc<dyn EdrTransport>)->Result<Self> {
        let server_host = server_host.trim().trim_end_matches('/').to_string();
        if server_host.is_empty() {
            return Err( invalid_argument("no EDR server specified"))
        }

        let uri = join_uri( &server_host, COLLECTIONS_QUERY);
        let json = transport.get_json( &uri).await?;
        let response: CollectionsResponse = serde_json::from_value( json.clone())?;
        info!("connected to {} with {} collections", server_host, response.collections.len());

        Ok( EdrInterface { server_host, json, collections: response.collections, locale: "en".to_string(), transport } )
    }

    pub fn with_locale (mut self, locale: impl ToString)->Self {
        self.locale = locale.to_string();
        self
    }

    pub fn transport (&self)->Arc<dyn EdrTransport> {
        self.transport.clone()
    }

    pub fn collection_ids (&self)->Vec<&str> {
        self.collections.iter().map( |c| c.id.as_str()).collect()
    }

    pub fn collection_titles (&self)->Vec<&str> {
        self.collections.iter().map( |c| c.title.as_str()).collect()
    }

    async fn get_covjson (&self, query: &str)->Result<Value> {
        let uri = join_uri( &self.server_host, query);
        self.transport.get_json( &uri).await
    }

    /// get the metadata of a collection, identified by list index, collection id or collection title
    pub fn get_collection (&self, key: impl Into<CollectionKey>)->Result<&Collection> {
        let key = key.into();
        let coll = match &key {
            CollectionKey::Index(idx) => self.collections.get(*idx),
            CollectionKey::Name(name) => self.collections.iter().find( |c| c.id == *name || c.title == *name)
        };
        coll.ok_or_else( || EdrClientError::CollectionNotFound( key.to_string()))
    }

    /// retrieve link URLs embedded in collection metadata. These typically describe how to
    /// retrieve specific data from the server
    pub fn get_link (&self, key: impl Into<CollectionKey>, link_ref: LinkRef)->Result<Vec<String>> {
        let coll = self.get_collection(key)?;

        match link_ref {
            LinkRef::Index(idx) => {
                coll.links.get(idx)
                    .map( |l| vec![l.href.clone()])
                    .ok_or_else( || EdrClientError::InvalidLink( format!("{idx}")))
            }
            LinkRef::Containing(s) => {
                Ok( coll.links.iter().filter( |l| l.href.contains(s)).map( |l| l.href.clone()).collect() )
            }
            LinkRef::DataQuery(query_type) => {
                coll.data_queries.get(query_type)
                    .and_then( |q| q.get("link"))
                    .and_then( |l| l.get("href"))
                    .and_then( |h| h.as_str())
                    .map( |h| vec![h.to_string()])
                    .ok_or_else( || EdrClientError::InvalidLink( query_type.to_string()))
            }
        }
    }

    /// the `locations` query link of a collection is a template that uses the literal `name`
    /// path segment in place of the collection id
    fn locations_uri (&self, coll: &Collection)->Result<String> {
        let href = self.get_link( &coll.id, LinkRef::DataQuery("locations"))?.remove(0);
        let id_segment = format!("/{}/", coll.id);

        let uri = if href.contains("/name/") {
            href.replacen( "/name/", &id_segment, 1)
        } else if href.ends_with("/name") {
            format!("{}/{}", &href[..href.len()-5], coll.id)
        } else {
            href
        };
        Ok(uri)
    }

    async fn get_locations_json (&self, key: impl Into<CollectionKey>)->Result<geojson::FeatureCollection> {
        let coll = self.get_collection(key)?;
        let uri = self.locations_uri( coll)?;
        let json = self.transport.get_json( &uri).await?;
        Ok( serde_json::from_value(json)? )
    }

    /// make a `locations` request and return the ids of the locations defined for a collection
    pub async fn get_locations (&self, key: impl Into<CollectionKey>)->Result<Vec<String>> {
        let fc = self.get_locations_json(key).await?;
        Ok( fc.features.iter().filter_map( |f| f.id.as_ref().map( feature_id_string)).collect() )
    }

    /// make a `locations` request and return the geometry of a specific location
    pub async fn get_location_extents (&self, key: impl Into<CollectionKey>, feature_id: &str)->Result<geojson::Geometry> {
        let fc = self.get_locations_json(key).await?;
        let feature = fc.features.into_iter()
            .find( |f| f.id.as_ref().map( feature_id_string).as_deref() == Some(feature_id))
            .ok_or_else( || LookupError::NotFound( "id".to_string(), feature_id.to_string()))?;

        feature.geometry.ok_or_else( || missing_field( format!("geometry of location {feature_id}")))
    }

    /// the spatial (bounding box) extent and coordinate reference system of a collection
    pub fn get_spatial_extent (&self, key: impl Into<CollectionKey>)->Result<(BoundingBox<f64>,Crs)> {
        let coll = self.get_collection(key)?;
        let spatial = coll.extent.spatial.as_ref().ok_or_else( || missing_field("extent.spatial"))?;

        let wsen = bbox_values( &spatial.bbox).ok_or_else( || missing_field("extent.spatial.bbox"))?;
        let bbox = BoundingBox::from_wsen( &wsen);

        let crs_name = match CRS_RE.captures( &spatial.crs) {
            Some(caps) => caps["crsref"].to_string(),
            None => spatial.crs.trim().to_string() // not a WKT, maybe a plain name
        };
        let crs = Crs::lookup( &crs_name).ok_or_else( || EdrClientError::UnknownReferenceSystem(crs_name))?;

        Ok( (bbox, crs) )
    }

    /// the time coordinate points and temporal reference system of a collection.
    /// Explicit values are preferred, intervals are expanded
    pub fn get_temporal_extent (&self, key: impl Into<CollectionKey>)->Result<(Vec<String>,Calendar)> {
        let coll = self.get_collection(key)?;
        let temporal = coll.extent.temporal.as_ref().ok_or_else( || missing_field("extent.temporal"))?;

        let times = if !temporal.values.is_empty() {
            expand_datetime_values( &temporal.values)?
        } else if let Some(interval) = &temporal.interval {
            interval_datetime_strings( interval)?
        } else {
            Vec::new()
        };

        let trs = match TRS_RE.captures( &temporal.trs) {
            Some(caps) => {
                let name = &caps["trsref"];
                Calendar::lookup(name).ok_or_else( || EdrClientError::UnknownReferenceSystem(name.to_string()))?
            }
            None => Calendar::Gregorian // no TDATUM given
        };

        Ok( (times, trs) )
    }

    /// the query types supported for a collection
    pub fn get_query_types (&self, key: impl Into<CollectionKey>)->Result<Vec<String>> {
        let coll = self.get_collection(key)?;
        Ok( coll.data_queries.keys().cloned().collect() )
    }

    /// descriptions of the datasets (environmental quantities / parameters / phenomena) provided by
    /// a collection, in server order
    pub fn get_collection_parameters (&self, key: impl Into<CollectionKey>)->Result<Vec<(String,ParameterInfo)>> {
        let coll = self.get_collection(key)?;
        coll.parameter_names.iter()
            .map( |(id,desc)| Ok( (id.clone(), parameter_info( id, desc, &self.locale)?) ))
            .collect()
    }

    fn check_query_type (&self, coll: &Collection, query_type: &str)->Result<()> {
        if coll.data_queries.contains_key(query_type) {
            Ok(())
        } else {
            Err( EdrClientError::UnsupportedQuery( query_type.to_string()))
        }
    }

    /// request data for a predefined location of a collection. The response describes the
    /// coordinates of all requested data, values are either inline or retrieved on demand by
    /// the returned `DataHandler`
    pub async fn query_locations<S: AsRef<str>> (&self, key: impl Into<CollectionKey>, location: &str,
                                                 param_names: &[S], start_date: &str, end_date: &str)->Result<DataHandler> {
        let coll = self.get_collection(key)?;
        self.check_query_type( coll, "locations")?;

        let params = join_names( param_names);
        let query = format!("collections/{}/locations/{}?parameter-name={}&datetime={}/{}",
                            coll.id, location, params, start_date, end_date);

        let json = self.get_covjson( &query).await?;
        DataHandler::new( json, self.transport.clone())
    }

    /// request data at a position given as WKT (e.g. `POINT(-3.5 50.7)`)
    pub async fn query_position<S: AsRef<str>> (&self, key: impl Into<CollectionKey>, coords: &str,
                                                param_names: &[S], datetime: Option<&str>)->Result<DataHandler> {
        let params = join_names( param_names);
        let mut query_params: Vec<(&str,&str)> = vec![ ("coords", coords), ("parameter-name", params.as_str()) ];
        if let Some(dt) = datetime {
            query_params.push( ("datetime", dt));
        }
        self.query( key, "position", &query_params).await
    }

    /// request the predefined data objects of a collection
    pub async fn query_items (&self, key: impl Into<CollectionKey>)->Result<geojson::FeatureCollection> {
        let coll = self.get_collection(key)?;
        let json = self.get_covjson( &format!("collections/{}/items?f=json", coll.id)).await?;
        Ok( serde_json::from_value(json)? )
    }

    /// submit a generic query (`radius`, `area`, `cube`, `trajectory`, `corridor`, ..). Query
    /// parameters are passed on as they are - it is up to the caller to provide values that
    /// are valid for the query type
    pub async fn query (&self, key: impl Into<CollectionKey>, query_type: &str, query_params: &[(&str,&str)])->Result<DataHandler> {
        let coll = self.get_collection(key)?;
        self.check_query_type( coll, query_type)?;

        let qs: Vec<String> = query_params.iter().map( |(k,v)| format!("{k}={v}")).collect();
        let query = format!("collections/{}/{}?{}", coll.id, query_type, qs.join("&"));
        debug!("query: {}", query);

        let json = self.get_covjson( &query).await?;
        DataHandler::new( json, self.transport.clone())
    }
}

impl fmt::Display for EdrInterface {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        let n = self.collections.len();
        let w = self.collections.iter().map( |c| c.id.len()).max().unwrap_or(2).max(2);

        writeln!(f, "EDR Interface to {} collection{}:", n, if n == 1 {""} else {"s"})?;
        writeln!(f, "  #  {:<w$}  Title", "ID")?;
        for (i,c) in self.collections.iter().enumerate() {
            writeln!(f, "  {}  {:<w$}  {}", i, c.id, c.title)?;
        }
        Ok(())
    }
}

fn feature_id_string (id: &geojson::feature::Id)->String {
    match id {
        geojson::feature::Id::String(s) => s.clone(),
        geojson::feature::Id::Number(n) => n.to_string(),
    }
}

fn join_names<S: AsRef<str>> (names: &[S])->String {
    names.iter().map( |s| s.as_ref()).collect::<Vec<&str>>().join(",")
}

/// temporal intervals are either `[[start,end],..]` (with open ends as null) or `["start/end",..]`
fn interval_datetime_strings (interval: &Value)->Result<Vec<String>> {
    let mut list = Vec::new();

    for e in interval.as_array().ok_or_else( || missing_field("extent.temporal.interval"))? {
        match e {
            Value::String(s) => {
                list.extend( Iso8601Interval::parse(s)?.datetime_strings()?);
            }
            Value::Array(bounds) => {
                let bounds: Vec<String> = bounds.iter().filter( |b| !b.is_null()).map( value_text).collect();
                list.extend( expand_datetime_values( &bounds)?);
            }
            _ => return Err( missing_field("extent.temporal.interval"))
        }
    }
    Ok(list)
}
