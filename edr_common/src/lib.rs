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

//! shared utilities for the EDR crates: error definition macros, RON config loading,
//! datetime helpers (including ISO 8601 interval expansion), HTTP JSON retrieval and
//! JSON list lookup

use serde::{Serialize,Deserialize};
use num::{Num,ToPrimitive};

pub mod macros;
pub mod datetime;
pub mod collections;
pub mod config;
pub mod net;

/// a generic bounding box without semantics for the coordinate type
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + ToPrimitive + PartialOrd> BoundingBox<T> {
    pub fn new (west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north }
    }

    pub fn from_wsen<N> (wsen: &[N;4]) -> BoundingBox<T> where N: Num + Copy + Into<T> {
        BoundingBox::<T>{
            west: wsen[0].into(),
            south: wsen[1].into(),
            east: wsen[2].into(),
            north: wsen[3].into()
        }
    }

    pub fn to_minmax_array (&self) -> [T;4] {
        [self.west,self.south,self.east,self.north]
    }
}

/// a simple incremental min/max accumulator that ignores NaNs
#[derive(Debug,Clone,Copy)]
pub struct MinMax {
    pub n: usize,
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn new()->Self { MinMax { n: 0, min: f64::MAX, max: f64::MIN } }

    pub fn add (&mut self, x: f64) {
        if x.is_nan() { return }

        self.n += 1;
        if x < self.min { self.min = x }
        if x > self.max { self.max = x }
    }

    pub fn is_empty (&self)->bool { self.n == 0 }

    pub fn from_values<'a,I> (it: I)->Self where I: IntoIterator<Item=&'a f64> {
        let mut mm = MinMax::new();
        for v in it { mm.add(*v) }
        mm
    }
}
