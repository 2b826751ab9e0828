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
//! reference system lookups and axis conventions of CoverageJSON domains

use std::fmt;
use serde::{Serialize,Deserialize};

/// canonical order of domain axes in assembled data arrays
pub const AXES_ORDER: [&str;4] = ["t", "z", "y", "x"];

/// axis names that describe horizontal position. All other axes are selection axes
pub const HORIZONTAL_AXES: [&str;4] = ["x", "y", "latitude", "longitude"];

pub const WGS84_EARTH_RADIUS: f64 = 6_378_137.0;

/// units of horizontal coordinates in a geographic coordinate system
pub const GEOG_CS_UNITS: &str = "degrees";

pub const TIME_UNITS: &str = "days since 1970-01-01";

pub fn is_horizontal_axis (name: &str)->bool {
    HORIZONTAL_AXES.contains(&name)
}

/// position of axis in `AXES_ORDER` (unknown axes go last). Named lat/lon axes sort as y/x
pub fn axis_order (name: &str)->usize {
    let name = match name {
        "latitude" => "y",
        "longitude" => "x",
        other => other
    };
    AXES_ORDER.iter().position( |a| *a == name).unwrap_or( AXES_ORDER.len())
}

/// horizontal coordinate reference systems we know how to handle
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Crs {
    /// geographic lon/lat on the WGS84 datum
    PlateCarree,
}

impl Crs {
    pub fn lookup (name: &str)->Option<Crs> {
        match name {
            "WGS_1984" | "WGS84" | "GeographicCRS" | "CRS84" | "EPSG:4326" => Some(Crs::PlateCarree),
            _ => None
        }
    }
}

impl fmt::Display for Crs {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        match self {
            Crs::PlateCarree => write!(f, "PlateCarree")
        }
    }
}

/// vertical reference systems
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Vrs {
    Vertical,
}

impl Vrs {
    pub fn lookup (name: &str)->Option<Vrs> {
        match name {
            "VerticalCRS" | "VerticalRS" => Some(Vrs::Vertical),
            _ => None
        }
    }
}

/// temporal reference systems (calendars)
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum Calendar {
    Gregorian,
    ProlepticGregorian,
    NoLeap,
    Day360,
}

impl Calendar {
    pub fn lookup (name: &str)->Option<Calendar> {
        match name.to_lowercase().as_str() {
            "gregorian calendar" | "gregorian" | "standard" => Some(Calendar::Gregorian),
            "proleptic_gregorian" => Some(Calendar::ProlepticGregorian),
            "noleap" | "365_day" => Some(Calendar::NoLeap),
            "360_day" => Some(Calendar::Day360),
            _ => None
        }
    }

    pub fn as_str (&self)->&'static str {
        match self {
            Calendar::Gregorian => "gregorian",
            Calendar::ProlepticGregorian => "proleptic_gregorian",
            Calendar::NoLeap => "noleap",
            Calendar::Day360 => "360_day",
        }
    }

    /// can we convert datetimes of this calendar with the real-world (chrono) calendar
    pub fn is_gregorian (&self)->bool {
        matches!( self, Calendar::Gregorian | Calendar::ProlepticGregorian)
    }
}

impl fmt::Display for Calendar {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
