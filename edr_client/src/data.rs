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
//! handling of CoverageJSON responses to EDR data queries

use std::{collections::{BTreeMap, HashMap}, fmt, sync::Arc};
use itertools::Itertools;
use ndarray::{Array2, ArrayD, Axis, IxDyn, Slice};
use serde::{Deserialize,Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use edr_common::{collections::{find_by_any_key, find_by_key}, net::value_text};
use crate::{
    errors::{invalid_argument, missing_field, EdrClientError, Result},
    lookup::{axis_order, is_horizontal_axis, Calendar, Crs, Vrs},
    metadata::unit_symbol,
    EdrTransport
};

/// the coordinate values of a selection, axis name -> coordinate value string.
/// Sorted by axis name, which is also the order we use in data keys
pub type CoordSelection = BTreeMap<String,String>;

/// the points of a domain axis
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum CoordValues {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl CoordValues {
    /// build from a CoverageJSON axis, which is either `{start,stop,num}` or `{values:[..]}`
    pub fn from_axis (axis: &Value)->Result<Self> {
        if let (Some(start),Some(stop),Some(num)) = (axis.get("start"), axis.get("stop"), axis.get("num")) {
            let start = start.as_f64().ok_or_else( || invalid_argument("non-numeric axis start"))?;
            let stop = stop.as_f64().ok_or_else( || invalid_argument("non-numeric axis stop"))?;
            let num = num.as_u64().ok_or_else( || invalid_argument("invalid axis num"))? as usize;
            Ok( CoordValues::Numeric( linspace( start, stop, num)) )

        } else if let Some(Value::Array(values)) = axis.get("values") {
            if values.iter().all( |v| v.is_number()) {
                Ok( CoordValues::Numeric( values.iter().filter_map( |v| v.as_f64()).collect()) )
            } else {
                Ok( CoordValues::Text( values.iter().map( value_text).collect()) )
            }

        } else {
            let keys: Vec<&str> = axis.as_object().map( |o| o.keys().map( |k| k.as_str()).collect()).unwrap_or_default();
            Err( invalid_argument( format!("Could not build coordinate from keys: {:?}.", keys.join(", "))))
        }
    }

    pub fn len (&self)->usize {
        match self {
            CoordValues::Numeric(v) => v.len(),
            CoordValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty (&self)->bool { self.len() == 0 }

    /// the string we use for the coordinate point at `idx` in selections and keys
    pub fn value_string (&self, idx: usize)->Option<String> {
        match self {
            CoordValues::Numeric(v) => v.get(idx).map( |x| x.to_string()),
            CoordValues::Text(v) => v.get(idx).cloned(),
        }
    }

    pub fn strings (&self)->Vec<String> {
        (0..self.len()).filter_map( |i| self.value_string(i)).collect()
    }

    pub fn numeric (&self)->Option<&[f64]> {
        match self {
            CoordValues::Numeric(v) => Some(v.as_slice()),
            CoordValues::Text(_) => None,
        }
    }

    /// the index of a coordinate point given as string. The string is converted into the
    /// value type of the coordinate before comparison
    pub fn index_of (&self, value: &str)->Option<usize> {
        match self {
            CoordValues::Numeric(v) => {
                let x: f64 = value.trim().parse().ok()?;
                let eps = 1e-9 * x.abs().max(1.0);
                v.iter().position( |c| (c - x).abs() <= eps)
            }
            CoordValues::Text(v) => v.iter().position( |c| c == value),
        }
    }
}

fn linspace (start: f64, stop: f64, num: usize)->Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map( |i| if i == num-1 { stop } else { start + i as f64 * step }).collect()
        }
    }
}

/// category colours and levels of a parameter
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Colours {
    /// colour specs (hex strings) in category order
    pub colours: Vec<String>,

    /// category levels plus one extra step beyond the last one
    pub values: Vec<f64>,

    pub vmin: f64,
    pub vmax: f64,
}

/// a 2D horizontal data layer ready to be rendered. Rows are ordered by `y`, columns by `x`.
/// Missing values are NaN
#[derive(Debug,Clone)]
pub struct MapLayer {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub values: Array2<f64>,
    pub crs: Crs,
}

impl MapLayer {
    pub fn width (&self)->usize { self.values.ncols() }
    pub fn height (&self)->usize { self.values.nrows() }
}

/// handles the CoverageJSON response of an EDR data query. This includes the coordinates of
/// the domain, data values that are provided inline, on-demand retrieval of tiled data arrays
/// (which are cached) and assembling full nD data arrays
pub struct DataHandler {
    pub json: Value,

    param_names: Vec<String>,
    coords: Vec<(String,CoordValues)>,

    /// data provided inline with the response, in their original shape and axis order
    inline: HashMap<String,ArrayD<f64>>,

    /// successfully retrieved tiles
    cache: HashMap<String,ArrayD<f64>>,
    colours: HashMap<String,Option<Colours>>,

    transport: Arc<dyn EdrTransport>,
}

impl fmt::Debug for DataHandler {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        f.debug_struct("DataHandler")
            .field("param_names", &self.param_names)
            .field("coords", &self.coords)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl DataHandler {
    pub fn new (json: Value, transport: Arc<dyn EdrTransport>)->Result<Self> {
        let param_names: Vec<String> = json.get("parameters")
            .and_then( |p| p.as_object())
            .ok_or_else( || missing_field("parameters"))?
            .keys().cloned().collect();

        let axes = json.pointer("/domain/axes")
            .and_then( |a| a.as_object())
            .ok_or_else( || missing_field("domain.axes"))?;
        let mut coords = Vec::with_capacity( axes.len());
        for (name,axis) in axes {
            coords.push( (name.clone(), CoordValues::from_axis(axis)?));
        }

        let mut inline = HashMap::new();
        if let Some(ranges) = json.get("ranges").and_then( |r| r.as_object()) {
            for (name,range) in ranges {
                if range.get("values").is_some() {
                    inline.insert( name.clone(), nd_array_from_json( range)?);
                }
            }
        }

        Ok( DataHandler { json, param_names, coords, inline, cache: HashMap::new(), colours: HashMap::new(), transport } )
    }

    pub fn param_names (&self)->&[String] {
        &self.param_names
    }

    /// domain axes in response order
    pub fn coords (&self)->&[(String,CoordValues)] {
        &self.coords
    }

    pub fn coord (&self, axis: &str)->Option<&CoordValues> {
        self.coords.iter().find( |(name,_)| name == axis).map( |(_,c)| c)
    }

    pub fn has_inline_data (&self, param: &str)->bool {
        self.inline.contains_key(param)
    }

    /// parameter name -> unit symbol
    pub fn units (&self)->Result<Vec<(String,String)>> {
        self.param_names.iter()
            .map( |name| {
                let unit = self.json.pointer( &format!("/parameters/{name}/unit"))
                    .and_then( unit_symbol)
                    .ok_or_else( || missing_field( format!("parameters.{name}.unit.symbol")))?;
                Ok( (name.clone(), unit) )
            })
            .collect()
    }

    pub fn unit (&self, param: &str)->Option<String> {
        self.json.pointer( &format!("/parameters/{param}/unit")).and_then( unit_symbol)
    }

    /// all domain axis names sorted into `t,z,y,x` order
    pub fn ordered_axes (&self)->Vec<&str> {
        let mut axes: Vec<&str> = self.coords.iter().map( |(name,_)| name.as_str()).collect();
        axes.sort_by_key( |a| axis_order(a));
        axes
    }

    /// the number of points of each axis, in `t,z,y,x` order
    pub fn shape (&self)->Vec<usize> {
        self.ordered_axes().iter().filter_map( |a| self.coord(a)).map( |c| c.len()).collect()
    }

    /// all axes for which a data array can be selected (all non-horizontal axes), in `t,z` order
    pub fn selection_axes (&self)->Vec<&str> {
        self.ordered_axes().into_iter().filter( |a| !is_horizontal_axis(a)).collect()
    }

    fn referencing (&self)->Result<&[Value]> {
        self.json.pointer("/domain/referencing")
            .and_then( |r| r.as_array())
            .map( |r| r.as_slice())
            .ok_or_else( || missing_field("domain.referencing"))
    }

    /// the horizontal coordinate reference system common to all data of the response
    pub fn crs (&self)->Result<Crs> {
        let mut crs_axes: Vec<&str> = self.coords.iter()
            .map( |(name,_)| name.as_str())
            .filter( |a| is_horizontal_axis(a))
            .collect();
        crs_axes.sort();
        let reversed: Vec<&str> = crs_axes.iter().rev().cloned().collect();

        let rs = find_by_any_key( self.referencing()?, "coordinates", &[json!(crs_axes), json!(reversed)])?;
        let crs_type = rs.pointer("/system/type").and_then( |t| t.as_str()).ok_or_else( || missing_field("system.type"))?;
        Crs::lookup( crs_type).ok_or_else( || EdrClientError::UnknownReferenceSystem( crs_type.to_string()))
    }

    /// the vertical reference system common to all data of the response
    pub fn vrs (&self)->Result<Vrs> {
        let rs = find_by_key( self.referencing()?, "coordinates", &json!(["z"]))?;
        let vrs_type = rs.pointer("/system/type").and_then( |t| t.as_str()).ok_or_else( || missing_field("system.type"))?;
        Vrs::lookup( vrs_type).ok_or_else( || EdrClientError::UnknownReferenceSystem( vrs_type.to_string()))
    }

    /// the calendar of the time axis. Temporal reference systems without calendar are Gregorian
    pub fn trs (&self)->Result<Calendar> {
        let rs = find_by_key( self.referencing()?, "coordinates", &json!(["t"]))?;
        match rs.pointer("/system/calendar").and_then( |c| c.as_str()) {
            Some(cal) => Calendar::lookup(cal).ok_or_else( || EdrClientError::UnknownReferenceSystem( cal.to_string())),
            None => Ok(Calendar::Gregorian)
        }
    }

    /// the standard form of keys for data items:  `name={param},{axis}={value},..` with axes sorted by name
    pub fn make_key (param: &str, coords: &CoordSelection)->String {
        let mut key = format!("name={param}");
        for (axis,value) in coords {
            key.push(',');
            key.push_str(axis);
            key.push('=');
            key.push_str(value);
        }
        key
    }

    /// the inverse of [`DataHandler::make_key`]
    pub fn from_key (key: &str)->Result<(String,CoordSelection)> {
        let mut parts = key.split(',');
        let param = parts.next()
            .and_then( |p| p.strip_prefix("name="))
            .filter( |p| !p.is_empty())
            .ok_or_else( || EdrClientError::InvalidKey( key.to_string()))?;

        let mut coords = CoordSelection::new();
        for part in parts {
            let (axis,value) = part.split_once('=').ok_or_else( || EdrClientError::InvalidKey( key.to_string()))?;
            coords.insert( axis.to_string(), value.to_string());
        }
        Ok( (param.to_string(), coords) )
    }

    fn coord_index (&self, axis: &str, value: &str)->Result<usize> {
        self.coord(axis)
            .and_then( |c| c.index_of(value))
            .ok_or_else( || invalid_argument( format!("no coordinate point {value:?} on axis {axis:?}")))
    }

    fn range (&self, param: &str)->Result<&Value> {
        self.json.pointer( &format!("/ranges/{param}")).ok_or_else( || EdrClientError::InvalidKey( param.to_string()))
    }

    /// the axis names of a parameter range, defaulting to the domain axes in `t,z,y,x` order
    fn range_axis_names (&self, param: &str)->Vec<String> {
        match self.range(param).ok().and_then( |r| r.get("axisNames")).and_then( |a| a.as_array()) {
            Some(names) => names.iter().filter_map( |n| n.as_str()).map( |n| n.to_string()).collect(),
            None => self.ordered_axes().iter().map( |a| a.to_string()).collect()
        }
    }

    /// get the data array for a parameter at the given selection coordinates. Inline data is sliced
    /// from the response, tiled data is looked up in the cache and otherwise requested from the server.
    /// Length-1 dimensions are dropped from the result
    pub async fn get_item (&mut self, param: &str, coords: &CoordSelection)->Result<ArrayD<f64>> {
        if let Some(a) = self.inline.get(param) {
            let axis_names = self.range_axis_names(param);
            let mut view = a.view();
            for (axis,value) in coords {
                let idx = self.coord_index( axis, value)?;
                if let Some(i) = axis_names.iter().position( |n| n == axis) {
                    view.slice_axis_inplace( Axis(i), Slice::from(idx..idx+1));
                }
            }
            return Ok( squeeze( view.to_owned())? )
        }

        let key = Self::make_key( param, coords);
        if let Some(a) = self.cache.get(&key) {
            return Ok( a.clone() )
        }

        let a = self.request_data( param, coords).await?;
        self.cache.insert( key, a.clone());
        Ok(a)
    }

    /// get the data array for a key created by [`DataHandler::make_key`]
    pub async fn get (&mut self, key: &str)->Result<ArrayD<f64>> {
        let (param,coords) = Self::from_key(key)?;
        self.get_item( &param, &coords).await
    }

    async fn request_data (&self, param: &str, coords: &CoordSelection)->Result<ArrayD<f64>> {
        let range = self.range(param)?;
        let param_type = range.get("type").and_then( |t| t.as_str()).unwrap_or_default();
        if param_type != "TiledNdArray" {
            return Err( EdrClientError::UnsupportedParameterType( param_type.to_string()))
        }

        let mut url = range.pointer("/tileSets/0/urlTemplate")
            .and_then( |t| t.as_str())
            .ok_or_else( || missing_field( format!("ranges.{param}.tileSets[0].urlTemplate")))?
            .to_string();
        for (axis,value) in coords {
            let idx = self.coord_index( axis, value)?;
            url = url.replace( &format!("{{{axis}}}"), &idx.to_string());
        }

        debug!("requesting tile {}", url);
        let tile = self.transport.get_json( &url).await?;
        squeeze( nd_array_from_json( &tile)?)
    }

    /// the category colours of a parameter, `None` if it does not define a `categoryEncoding`
    pub fn get_colours (&mut self, param: &str)->Option<Colours> {
        if let Some(c) = self.colours.get(param) {
            return c.clone()
        }
        let c = self.json.pointer( &format!("/parameters/{param}/categoryEncoding"))
            .and_then( |e| e.as_object())
            .and_then( category_colours);
        self.colours.insert( param.to_string(), c.clone());
        c
    }

    /// the horizontal layer of a parameter at the given selection coordinates. Values below the lowest
    /// category level are masked if the parameter has category colours
    pub async fn to_map_layer (&mut self, param: &str, coords: &CoordSelection)->Result<MapLayer> {
        let data = self.get_item( param, coords).await?;
        let data = self.to_ordered_axes( param, coords, data)?;
        let mut values = data.into_dimensionality::<ndarray::Ix2>()
            .map_err( |_| invalid_argument( format!("data for {param} is not a 2D horizontal layer")))?;

        if let Some(colours) = self.get_colours(param) {
            values.mapv_inplace( |v| if v < colours.vmin { f64::NAN } else { v });
        }

        let x = self.horizontal_coord( &["x", "longitude"])?;
        let y = self.horizontal_coord( &["y", "latitude"])?;
        if values.dim() != (y.len(), x.len()) {
            return Err( invalid_argument( format!("data shape {:?} does not match coordinates ({},{})", values.dim(), y.len(), x.len())))
        }

        Ok( MapLayer { name: param.to_string(), x, y, values, crs: self.crs()? } )
    }

    /// permute a squeezed item of `param` from the axis order of its range into `t,z,y,x` order.
    /// The item has all range axes that are neither selected nor of length 1
    fn to_ordered_axes (&self, param: &str, coords: &CoordSelection, item: ArrayD<f64>)->Result<ArrayD<f64>> {
        let axes: Vec<String> = self.range_axis_names(param).into_iter()
            .filter( |a| !coords.contains_key(a))
            .filter( |a| self.coord(a).map( |c| c.len() != 1).unwrap_or(true))
            .collect();
        if axes.len() != item.ndim() {
            return Err( invalid_argument( format!("data for {param} has {} dimensions, expected axes {:?}", item.ndim(), axes)))
        }

        let mut perm: Vec<usize> = (0..axes.len()).collect();
        perm.sort_by_key( |i| axis_order( &axes[*i]));
        Ok( item.permuted_axes( IxDyn(&perm)).as_standard_layout().into_owned() )
    }

    fn horizontal_coord (&self, names: &[&str])->Result<Vec<f64>> {
        names.iter()
            .find_map( |n| self.coord(n))
            .and_then( |c| c.numeric())
            .map( |v| v.to_vec())
            .ok_or_else( || missing_field( format!("domain.axes.{}", names[0])))
    }

    /// all possible (parameter, selection) combinations of this response, i.e. the cartesian
    /// product of parameter names and the points of all selection axes
    pub fn all_query_keys (&self)->Vec<(String,CoordSelection)> {
        let axes = self.selection_axes();
        let selections: Vec<CoordSelection> = if axes.is_empty() {
            vec![ CoordSelection::new() ]
        } else {
            axes.iter()
                .map( |a| self.coord(a).map( |c| c.strings()).unwrap_or_default())
                .multi_cartesian_product()
                .map( |values| axes.iter().map( |a| a.to_string()).zip( values).collect())
                .collect()
        };

        self.param_names.iter()
            .cartesian_product( selections)
            .map( |(p,s)| (p.clone(), s))
            .collect()
    }

    /// the full nD data array of a parameter over all selection coordinates, in `t,z,y,x` axis order
    pub async fn build_data_array (&mut self, param: &str)->Result<ArrayD<f64>> {
        let axes: Vec<String> = self.ordered_axes().iter().map( |a| a.to_string()).collect();
        let mut data = ArrayD::<f64>::from_elem( IxDyn( &self.shape()), f64::NAN);

        let keys: Vec<CoordSelection> = self.all_query_keys().into_iter()
            .filter( |(p,_)| p == param)
            .map( |(_,s)| s)
            .collect();

        for coords in keys {
            let item = self.get_item( param, &coords).await?;
            let item = self.to_ordered_axes( param, &coords, item)?;

            let mut idx = Vec::with_capacity( axes.len());
            for axis in &axes {
                match coords.get(axis) {
                    Some(value) => { let i = self.coord_index( axis, value)?; idx.push( Some(i)) }
                    None => idx.push(None)
                }
            }

            let mut view = data.slice_each_axis_mut( |ad| match idx[ad.axis.index()] {
                Some(i) => Slice::from(i..i+1),
                None => Slice::from(..)
            });
            let shape = view.shape().to_vec();
            view.assign( &item.into_shape_with_order( IxDyn(&shape))?);
        }

        Ok(data)
    }

    /// full data arrays of all parameters, in parameter order
    pub async fn get_all_data (&mut self)->Result<Vec<(String,ArrayD<f64>)>> {
        let mut list = Vec::with_capacity( self.param_names.len());
        for param in self.param_names.clone() {
            let data = self.build_data_array( &param).await?;
            list.push( (param, data));
        }
        Ok(list)
    }
}

/// an `NdArray` JSON object with `values` and `shape`. `null` values become NaN
fn nd_array_from_json (json: &Value)->Result<ArrayD<f64>> {
    let values: Vec<f64> = json.get("values")
        .and_then( |v| v.as_array())
        .ok_or_else( || missing_field("values"))?
        .iter()
        .map( |v| v.as_f64().unwrap_or(f64::NAN))
        .collect();

    let shape: Vec<usize> = match json.get("shape").and_then( |s| s.as_array()) {
        Some(shape) => shape.iter().filter_map( |s| s.as_u64()).map( |s| s as usize).collect(),
        None => vec![values.len()]
    };

    Ok( ArrayD::from_shape_vec( IxDyn(&shape), values)? )
}

/// drop length-1 dimensions
fn squeeze (a: ArrayD<f64>)->Result<ArrayD<f64>> {
    let shape: Vec<usize> = a.shape().iter().cloned().filter( |n| *n != 1).collect();
    let a = a.as_standard_layout().to_owned();
    Ok( a.into_shape_with_order( IxDyn(&shape))? )
}

/// `categoryEncoding` maps colours to category levels, which are either numbers or lists of numbers
fn category_colours (encoding: &Map<String,Value>)->Option<Colours> {
    if encoding.is_empty() {
        return None
    }

    let colours: Vec<String> = encoding.keys().cloned().collect();
    let mut values: Vec<f64> = Vec::with_capacity( colours.len() + 1);
    for v in encoding.values() {
        let level = match v {
            Value::Array(list) => list.first().and_then( |x| x.as_f64()),
            _ => v.as_f64()
        };
        match level {
            Some(level) => values.push(level),
            None => {
                warn!("ignoring category encoding with non-numeric level {}", v);
                return None
            }
        }
    }

    let vmin = values.iter().cloned().fold( f64::INFINITY, f64::min);
    let vmax = values.iter().cloned().fold( f64::NEG_INFINITY, f64::max);
    let n = values.len();
    let step = if n > 1 { values[n-1] - values[n-2] } else { 1.0 };
    values.push( values[n-1] + step);

    Some( Colours { colours, values, vmin, vmax } )
}
