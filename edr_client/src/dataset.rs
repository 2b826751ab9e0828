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
//! conversion of data query responses into self-describing n-dimensional datasets

use std::fmt;
use ndarray::ArrayD;
use serde::{Deserialize,Serialize};

use edr_common::datetime::{days_since_epoch, parse_datetime};
use crate::{
    errors::{invalid_argument, missing_field, EdrClientError, Result},
    lookup::{is_horizontal_axis, Calendar, Crs, GEOG_CS_UNITS, TIME_UNITS, WGS84_EARTH_RADIUS},
    CoordValues, DataHandler
};

/// coordinate systems of dimension coordinates
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum CoordSystem {
    /// geographic coordinates on a spherical earth with the given radius (in meters)
    GeogCS { semi_major_axis: f64 },
}

#[derive(Debug,Clone,PartialEq)]
pub struct DimCoord {
    pub name: String,
    pub points: Vec<f64>,
    pub units: Option<String>,
    pub calendar: Option<Calendar>,
    pub coord_system: Option<CoordSystem>,
}

/// an n-dimensional data array of a single parameter with one dimension coordinate per axis
#[derive(Debug,Clone)]
pub struct GridDataset {
    pub name: String,
    pub units: String,
    pub data: ArrayD<f64>,
    pub dim_coords: Vec<DimCoord>,
}

impl GridDataset {
    pub fn coord (&self, name: &str)->Option<&DimCoord> {
        self.dim_coords.iter().find( |c| c.name == name)
    }

    pub fn shape (&self)->&[usize] {
        self.data.shape()
    }
}

impl fmt::Display for GridDataset {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        let dims: Vec<String> = self.dim_coords.iter().map( |c| format!("{}: {}", c.name, c.points.len())).collect();
        writeln!(f, "{} / ({})  ({})", self.name, self.units, dims.join("; "))?;
        writeln!(f, "    Dimension coordinates:")?;
        for c in &self.dim_coords {
            write!(f, "        {}", c.name)?;
            if let Some(units) = &c.units { write!(f, " [{units}]")?; }
            if let Some(cal) = &c.calendar { write!(f, " calendar={cal}")?; }
            if let Some(CoordSystem::GeogCS{semi_major_axis}) = &c.coord_system { write!(f, " GeogCS({semi_major_axis})")?; }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// the kinds of datasets we can produce
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum DatasetTarget {
    Grid,
}

impl std::str::FromStr for DatasetTarget {
    type Err = EdrClientError;

    fn from_str (s: &str)->Result<Self> {
        match s {
            "grid" => Ok(DatasetTarget::Grid),
            _ => Err( invalid_argument( format!("`to` must be one of: 'grid'; got {s}.")))
        }
    }
}

#[derive(Debug)]
pub enum Datasets {
    Single(GridDataset),
    List(Vec<GridDataset>),
}

impl Datasets {
    pub fn len (&self)->usize {
        match self {
            Datasets::Single(_) => 1,
            Datasets::List(list) => list.len(),
        }
    }

    pub fn is_empty (&self)->bool { self.len() == 0 }

    pub fn into_vec (self)->Vec<GridDataset> {
        match self {
            Datasets::Single(ds) => vec![ds],
            Datasets::List(list) => list,
        }
    }
}

fn build_coord (handler: &DataHandler, axis: &str, values: &CoordValues)->Result<DimCoord> {
    let name = axis.to_string();

    if is_horizontal_axis(axis) {
        let coord_system = match handler.crs()? {
            Crs::PlateCarree => CoordSystem::GeogCS { semi_major_axis: WGS84_EARTH_RADIUS }
        };
        let points = values.numeric().ok_or_else( || invalid_argument( format!("non-numeric horizontal axis {axis}")))?.to_vec();
        Ok( DimCoord { name, points, units: Some(GEOG_CS_UNITS.to_string()), calendar: None, coord_system: Some(coord_system) } )

    } else if axis == "t" {
        let calendar = handler.trs()?;
        if !calendar.is_gregorian() {
            return Err( EdrClientError::UnknownReferenceSystem( calendar.to_string()))
        }
        let mut points = Vec::with_capacity( values.len());
        for s in values.strings() {
            let dt = parse_datetime(&s).ok_or_else( || invalid_argument( format!("invalid time coordinate {s:?}")))?;
            points.push( days_since_epoch(&dt));
        }
        Ok( DimCoord { name, points, units: Some(TIME_UNITS.to_string()), calendar: Some(calendar), coord_system: None } )

    } else {
        let points = values.numeric().ok_or_else( || invalid_argument( format!("non-numeric axis {axis}")))?.to_vec();
        Ok( DimCoord { name, points, units: None, calendar: None, coord_system: None } )
    }
}

/// build the dataset for the parameter `key_name`, named `friendly_name`. This retrieves all
/// data of the parameter
pub async fn build_grid_dataset (handler: &mut DataHandler, key_name: &str, friendly_name: &str)->Result<GridDataset> {
    let mut dim_coords = Vec::new();
    for axis in handler.ordered_axes() {
        let values = handler.coord(axis).ok_or_else( || missing_field( format!("domain.axes.{axis}")))?;
        dim_coords.push( build_coord( handler, axis, values)?);
    }

    let units = handler.unit(key_name)
        .ok_or_else( || missing_field( format!("parameters.{key_name}.unit.symbol")))?
        .replace('/', " ");
    let data = handler.build_data_array( key_name).await?;

    Ok( GridDataset { name: friendly_name.to_string(), units, data, dim_coords } )
}

/// build datasets from the data of a query response. `names` are (parameter key, friendly name) pairs,
/// a single name produces a single dataset, more names produce a list
pub async fn make_dataset (handler: &mut DataHandler, names: &[(String,String)], to: DatasetTarget)->Result<Datasets> {
    match to {
        DatasetTarget::Grid => {
            match names.len() {
                0 => Err( invalid_argument( "Number of parameters must be greater than or equal to 1, got 0.")),
                1 => {
                    let (key,name) = &names[0];
                    Ok( Datasets::Single( build_grid_dataset( handler, key, name).await?) )
                }
                _ => {
                    let mut list = Vec::with_capacity( names.len());
                    for (key,name) in names {
                        list.push( build_grid_dataset( handler, key, name).await?);
                    }
                    Ok( Datasets::List(list) )
                }
            }
        }
    }
}
