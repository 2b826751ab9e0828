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

use std::{collections::HashMap, sync::{Arc, Mutex}};
use async_trait::async_trait;
use serde_json::{json, Value};

use edr_common::net::EdrNetError;
use edr_client::{EdrTransport, Result};

pub const SERVER: &str = "http://edr.test";

/// transport that answers from a fixed URI -> JSON map and records all requests
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String,Value>,
    pub requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new()->Self { Self::default() }

    pub fn with (mut self, uri: &str, json: Value)->Self {
        self.responses.insert( uri.to_string(), json);
        self
    }

    pub fn n_requests (&self)->usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request (&self)->Option<String> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EdrTransport for MockTransport {
    async fn get_json (&self, uri: &str)->Result<Value> {
        self.requests.lock().unwrap().push( uri.to_string());
        match self.responses.get(uri) {
            Some(json) => Ok( json.clone() ),
            None => Err( EdrNetError::ServerError( "not found".to_string(), "404".to_string()).into() )
        }
    }
}

pub fn collections_json()->Value {
    json!({
        "links": [ {"href": "http://edr.test/collections", "rel": "self"} ],
        "collections": [
            {
                "id": "metoffice_global",
                "title": "Global model",
                "description": "global forecast",
                "links": [
                    {"href": "http://edr.test/collections/metoffice_global", "rel": "self", "type": "application/json"},
                    {"href": "http://edr.test/collections/metoffice_global/locations", "rel": "data"}
                ],
                "extent": {
                    "spatial": {
                        "bbox": [[-180.0, -90.0, 180.0, 90.0]],
                        "crs": "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563]],PRIMEM[\"Greenwich\",0],UNIT[\"degree\",0.0174532925199433]]"
                    },
                    "temporal": {
                        "interval": [["2021-01-01T00:00:00Z", "2021-01-01T18:00:00Z"]],
                        "values": ["R3/2021-01-01T00:00:00Z/PT6H"],
                        "trs": "TIMECRS[\"DateTime\",TDATUM[\"Gregorian Calendar\"],CS[TemporalDateTime,1],AXIS[\"Time (T)\",future]"
                    }
                },
                "data_queries": {
                    "locations": { "link": {"href": "http://edr.test/collections/name/locations", "rel": "data"} },
                    "position": { "link": {"href": "http://edr.test/collections/metoffice_global/position", "rel": "data"} }
                },
                "parameter_names": {
                    "air_temperature": {
                        "type": "Parameter",
                        "observedProperty": { "label": {"en": "Air Temperature", "de": "Lufttemperatur"} },
                        "unit": { "symbol": {"value": "K", "type": "http://www.opengis.net/def/uom/UCUM/"} }
                    },
                    "cloud_type": {
                        "type": "Parameter",
                        "observedProperty": { "label": "Cloud Type" },
                        "unit": { "symbol": "1" }
                    }
                }
            },
            {
                "id": "obs",
                "title": "Observations",
                "extent": {
                    "temporal": { "interval": [["2021-01-01T00:00:00Z", "2021-01-02T00:00:00Z"]] }
                },
                "data_queries": {
                    "items": { "link": {"href": "http://edr.test/collections/obs/items", "rel": "data"} }
                },
                "parameter_names": {}
            }
        ]
    })
}

pub fn locations_json()->Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "exeter",
                "geometry": { "type": "Polygon", "coordinates": [[[-4.0, 50.0], [-3.0, 50.0], [-3.0, 51.0], [-4.0, 51.0], [-4.0, 50.0]]] },
                "properties": { "name": "Exeter" }
            },
            {
                "type": "Feature",
                "id": 42,
                "geometry": { "type": "Point", "coordinates": [0.0, 51.5] },
                "properties": { "name": "London" }
            }
        ]
    })
}

pub const COVERAGE_URI: &str = "http://edr.test/collections/metoffice_global/locations/exeter?parameter-name=air_temperature,cloud_type&datetime=2021-01-01T00:00:00Z/2021-01-01T06:00:00Z";

/// grid coverage with one tiled and one inline parameter over t:2, z:2, y:2, x:3
pub fn coverage_json()->Value {
    let cloud_values: Vec<Value> = (0..24).map( |i| if i == 7 { Value::Null } else { json!(i % 4) }).collect();

    json!({
        "type": "Coverage",
        "domain": {
            "type": "Domain",
            "domainType": "Grid",
            "axes": {
                "x": {"start": -10.0, "stop": 10.0, "num": 3},
                "y": {"start": 40.0, "stop": 50.0, "num": 2},
                "z": {"values": [2.0, 10.0]},
                "t": {"values": ["2021-01-01T00:00:00Z", "2021-01-01T06:00:00Z"]}
            },
            "referencing": [
                { "coordinates": ["x", "y"], "system": {"type": "GeographicCRS", "id": "http://www.opengis.net/def/crs/OGC/1.3/CRS84"} },
                { "coordinates": ["z"], "system": {"type": "VerticalCRS"} },
                { "coordinates": ["t"], "system": {"type": "TemporalRS", "calendar": "Gregorian"} }
            ]
        },
        "parameters": {
            "air_temperature": {
                "type": "Parameter",
                "observedProperty": { "label": {"en": "Air Temperature"} },
                "unit": { "symbol": {"value": "K"} }
            },
            "cloud_type": {
                "type": "Parameter",
                "observedProperty": { "label": "Cloud Type" },
                "unit": { "symbol": "1" },
                "categoryEncoding": { "#ff0000": 1, "#00ff00": 2, "#0000ff": 3 }
            }
        },
        "ranges": {
            "air_temperature": {
                "type": "TiledNdArray",
                "dataType": "float",
                "axisNames": ["t", "z", "y", "x"],
                "shape": [2, 2, 2, 3],
                "tileSets": [ { "tileShape": [1, 1, null, null], "urlTemplate": "http://edr.test/tiles/air_temperature/{t}/{z}.json" } ]
            },
            "cloud_type": {
                "type": "NdArray",
                "dataType": "integer",
                "axisNames": ["t", "z", "y", "x"],
                "shape": [2, 2, 2, 3],
                "values": cloud_values
            }
        }
    })
}

/// inline coverage with x before y in the range axes. Values are `10*xi + yi`
pub fn x_first_coverage_json()->Value {
    let mut values = Vec::new();
    for xi in 0..3 {
        for yi in 0..2 {
            values.push( json!( 10*xi + yi));
        }
    }

    json!({
        "type": "Coverage",
        "domain": {
            "type": "Domain",
            "domainType": "Grid",
            "axes": {
                "x": {"values": [0.0, 1.0, 2.0]},
                "y": {"values": [50.0, 51.0]},
                "t": {"values": ["2021-01-01T00:00:00Z"]}
            },
            "referencing": [
                { "coordinates": ["x", "y"], "system": {"type": "GeographicCRS"} },
                { "coordinates": ["t"], "system": {"type": "TemporalRS"} }
            ]
        },
        "parameters": {
            "rainfall": { "type": "Parameter", "observedProperty": { "label": "Rainfall" }, "unit": { "symbol": "mm" } }
        },
        "ranges": {
            "rainfall": {
                "type": "NdArray",
                "dataType": "float",
                "axisNames": ["t", "x", "y"],
                "shape": [1, 3, 2],
                "values": values
            }
        }
    })
}

pub fn tile_uri (t: usize, z: usize)->String {
    format!("http://edr.test/tiles/air_temperature/{t}/{z}.json")
}

/// tile values are `100*t + 10*z + i`
pub fn tile_json (t: usize, z: usize)->Value {
    let base = (100*t + 10*z) as f64;
    let values: Vec<f64> = (0..6).map( |i| base + i as f64).collect();
    json!({
        "type": "NdArray",
        "dataType": "float",
        "axisNames": ["t", "z", "y", "x"],
        "shape": [1, 1, 2, 3],
        "values": values
    })
}

pub fn mock_server()->MockTransport {
    let mut mock = MockTransport::new()
        .with( "http://edr.test/collections/?f=json", collections_json())
        .with( "http://edr.test/collections/metoffice_global/locations", locations_json())
        .with( "http://edr.test/collections/obs/items?f=json", locations_json())
        .with( COVERAGE_URI, coverage_json());

    for t in 0..2 {
        for z in 0..2 {
            mock = mock.with( &tile_uri(t,z), tile_json(t,z));
        }
    }
    mock
}
