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

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use serde_json::{json, Value};

use edr_common::net::EdrNetError;
use edr_client::{EdrTransport, Result};

pub const SERVER: &str = "http://edr.test";

pub const COVERAGE_URI: &str = "http://edr.test/collections/uk_model/locations/exeter?parameter-name=air_temperature&datetime=2021-01-01T06:00:00Z/2021-01-01T12:00:00Z";

/// in-memory EDR server
pub struct MockServer {
    responses: HashMap<String,Value>,
}

#[async_trait]
impl EdrTransport for MockServer {
    async fn get_json (&self, uri: &str)->Result<Value> {
        match self.responses.get(uri) {
            Some(json) => Ok( json.clone() ),
            None => Err( EdrNetError::ServerError( "no such resource".to_string(), "404".to_string()).into() )
        }
    }
}

pub fn mock_server()->Arc<MockServer> {
    let mut responses = HashMap::new();

    responses.insert( "http://edr.test/collections/?f=json".to_string(), json!({
        "collections": [
            {
                "id": "uk_model",
                "title": "UK model",
                "extent": {
                    "spatial": { "bbox": [-12.0, 48.0, 4.0, 62.0], "crs": "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\"]]" },
                    "temporal": { "values": ["R2/2021-01-01T00:00:00Z/PT6H"], "trs": "TIMECRS[\"DateTime\",TDATUM[\"Gregorian Calendar\"]]" }
                },
                "data_queries": {
                    "locations": { "link": {"href": "http://edr.test/collections/name/locations"} }
                },
                "parameter_names": {
                    "air_temperature": { "observedProperty": {"label": "Air Temperature"}, "unit": {"symbol": "K"} },
                    "cloud_type": { "observedProperty": {"label": "Cloud Type"}, "unit": {"symbol": "1"} }
                }
            },
            {
                "id": "empty",
                "title": "Empty",
                "data_queries": {},
                "parameter_names": {}
            }
        ]
    }));

    responses.insert( "http://edr.test/collections/uk_model/locations".to_string(), json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "id": "exeter", "geometry": {"type": "Point", "coordinates": [-3.5, 50.7]}, "properties": {} },
            { "type": "Feature", "id": "leeds", "geometry": {"type": "Point", "coordinates": [-1.5, 53.8]}, "properties": {} }
        ]
    }));

    responses.insert( COVERAGE_URI.to_string(), json!({
        "type": "Coverage",
        "domain": {
            "type": "Domain",
            "axes": {
                "x": {"start": -4.0, "stop": -3.0, "num": 2},
                "y": {"start": 50.0, "stop": 51.0, "num": 2},
                "t": {"values": ["2021-01-01T06:00:00Z", "2021-01-01T12:00:00Z"]}
            },
            "referencing": [
                { "coordinates": ["x", "y"], "system": {"type": "GeographicCRS"} },
                { "coordinates": ["t"], "system": {"type": "TemporalRS", "calendar": "Gregorian"} }
            ]
        },
        "parameters": {
            "air_temperature": { "observedProperty": {"label": "Air Temperature"}, "unit": {"symbol": "K"} }
        },
        "ranges": {
            "air_temperature": {
                "type": "TiledNdArray",
                "axisNames": ["t", "y", "x"],
                "shape": [2, 2, 2],
                "tileSets": [ {"urlTemplate": "http://edr.test/tiles/{t}.json"} ]
            }
        }
    }));

    responses.insert( "http://edr.test/tiles/0.json".to_string(), json!({
        "type": "NdArray", "shape": [1, 2, 2], "values": [270.0, 271.0, null, 273.0]
    }));
    // tile 1 is missing

    Arc::new( MockServer { responses } )
}
