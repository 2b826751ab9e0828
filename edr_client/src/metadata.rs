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
//! collection metadata as returned by the `collections` query of an EDR server.
//! We only type what we navigate - everything else stays available as JSON

use serde::{Deserialize,Serialize};
use serde_json::{Map, Value};

use crate::errors::{missing_field, Result};

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct CollectionsResponse {
    pub collections: Vec<Collection>,

    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct Collection {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default)]
    pub extent: Extent,

    /// query type name -> query description (with link). Server order is preserved
    #[serde(default)]
    pub data_queries: Map<String,Value>,

    /// parameter id -> parameter description. Server order is preserved
    #[serde(default)]
    pub parameter_names: Map<String,Value>,
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct Link {
    pub href: String,

    #[serde(default)]
    pub rel: Option<String>,

    #[serde(default, rename="type")]
    pub media_type: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize,Serialize,Debug,Clone,Default)]
pub struct Extent {
    #[serde(default)]
    pub spatial: Option<SpatialExtent>,

    #[serde(default)]
    pub temporal: Option<TemporalExtent>,

    #[serde(default)]
    pub vertical: Option<Value>,
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct SpatialExtent {
    /// either `[w,s,e,n]` or `[[w,s,e,n],..]`
    pub bbox: Value,

    /// WKT (or name) of the coordinate reference system
    #[serde(default)]
    pub crs: String,
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct TemporalExtent {
    /// either `[[start,end],..]` or `["start/end",..]`
    #[serde(default)]
    pub interval: Option<Value>,

    /// explicit time values (which can be ISO 8601 intervals themselves)
    #[serde(default)]
    pub values: Vec<String>,

    /// WKT of the temporal reference system
    #[serde(default)]
    pub trs: String,
}

/// label and units of a parameter (dataset) provided by a collection
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct ParameterInfo {
    pub label: String,
    pub units: String,
}

impl ParameterInfo {
    /// the descriptive text we use in selection lists
    pub fn description (&self)->String {
        format!("{} ({})", self.label, self.units)
    }
}

/// labels are either provided directly or as a map of one or more locales:
/// ```text
///   "label": "my_label"
///   "label": {"en": "my_label", ...}
/// ```
/// return the label for the requested locale, falling back to the first one provided
pub fn localized_label (label: &Value, locale: &str)->Option<String> {
    match label {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            map.get(locale)
                .or_else( || map.values().next())
                .and_then( |v| v.as_str())
                .map( |s| s.to_string())
        }
        _ => None
    }
}

/// unit symbols are either strings or objects with a `value` member
pub fn unit_symbol (unit: &Value)->Option<String> {
    match unit.get("symbol") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(sym)) => sym.get("value").and_then(|v| v.as_str()).map( |s| s.to_string()),
        _ => unit.get("label").and_then( |l| localized_label(l, "en"))
    }
}

pub fn parameter_info (id: &str, desc: &Value, locale: &str)->Result<ParameterInfo> {
    let label = desc.get("observedProperty")
        .and_then( |op| op.get("label"))
        .and_then( |l| localized_label( l, locale))
        .ok_or_else( || missing_field( format!("parameter_names.{id}.observedProperty.label")))?;

    let units = desc.get("unit")
        .and_then( unit_symbol)
        .ok_or_else( || missing_field( format!("parameter_names.{id}.unit.symbol")))?;

    Ok( ParameterInfo { label, units } )
}

/// parse a bbox value that is either `[w,s,e,n]` or a list thereof (in which case we use the first one)
pub fn bbox_values (bbox: &Value)->Option<[f64;4]> {
    let list = bbox.as_array()?;
    let coords = match list.first()? {
        Value::Array(inner) => inner,
        _ => list
    };
    let vs: Vec<f64> = coords.iter().map( |v| v.as_f64()).collect::<Option<Vec<f64>>>()?;

    match vs.len() {
        4 => Some( [vs[0], vs[1], vs[2], vs[3]] ),
        6 => Some( [vs[0], vs[1], vs[3], vs[4]] ), // [minx,miny,minz,maxx,maxy,maxz]
        _ => None
    }
}
