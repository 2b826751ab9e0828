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
//! colormaps and rasterization of horizontal data layers into (PNG) images

use std::io::Cursor;
use image::{ImageFormat, Rgba, RgbaImage};

use edr_client::MapLayer;
use edr_common::MinMax;
use crate::errors::{EdrExplorerError, Result};

const VIRIDIS: &[u32] = &[0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b, 0xfde725];
const PLASMA: &[u32] = &[0x0d0887, 0x41049d, 0x6a00a8, 0x8f0da4, 0xb12a90, 0xcc4778, 0xe16462, 0xf2844b, 0xfca636, 0xfcce25, 0xf0f921];
const INFERNO: &[u32] = &[0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d, 0xfcffa4];
const MAGMA: &[u32] = &[0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d, 0xfcfdbf];
const CIVIDIS: &[u32] = &[0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8779, 0xa69d75, 0xc4b56c, 0xe4cf5b, 0xfee838];
const GREYS: &[u32] = &[0xffffff, 0xd9d9d9, 0x969696, 0x525252, 0x000000];
const BLUES: &[u32] = &[0xf7fbff, 0xc6dbef, 0x6baed6, 0x2171b5, 0x08306b];
const REDS: &[u32] = &[0xfff5f0, 0xfcbba1, 0xfb6a4a, 0xcb181d, 0x67000d];
const GREENS: &[u32] = &[0xf7fcf5, 0xc7e9c0, 0x74c476, 0x238b45, 0x00441b];
const COOLWARM: &[u32] = &[0x3b4cc0, 0x7396f5, 0xb0cbfc, 0xdddddd, 0xf6bfa6, 0xee8468, 0xb40426];
const RDYLBU: &[u32] = &[0xa50026, 0xf46d43, 0xfee090, 0xffffbf, 0xe0f3f8, 0x74add1, 0x313695];
const JET: &[u32] = &[0x00007f, 0x0000ff, 0x007fff, 0x00ffff, 0x7fff7f, 0xffff00, 0xff7f00, 0xff0000, 0x7f0000];
const TURBO: &[u32] = &[0x30123b, 0x4145ab, 0x4675ed, 0x39a2fc, 0x1bcfd4, 0x24eca6, 0x61fc6c, 0xa4fc3b, 0xd1e834, 0xf3c63a, 0xfe9b2d, 0xf36315, 0xd93806, 0xb11901, 0x7a0403];

/// names of the predefined colormaps. Each of them can be reversed with a `_r` suffix
pub const COLORMAP_NAMES: [&str;13] = [
    "viridis", "plasma", "inferno", "magma", "cividis", "greys", "blues", "reds", "greens", "coolwarm", "rdylbu", "jet", "turbo"
];

fn named_anchors (name: &str)->Option<&'static [u32]> {
    match name {
        "viridis" => Some(VIRIDIS),
        "plasma" => Some(PLASMA),
        "inferno" => Some(INFERNO),
        "magma" => Some(MAGMA),
        "cividis" => Some(CIVIDIS),
        "greys" | "grays" => Some(GREYS),
        "blues" => Some(BLUES),
        "reds" => Some(REDS),
        "greens" => Some(GREENS),
        "coolwarm" => Some(COOLWARM),
        "rdylbu" => Some(RDYLBU),
        "jet" => Some(JET),
        "turbo" => Some(TURBO),
        _ => None
    }
}

#[inline]
fn rgb_of (c: u32)->[u8;3] {
    [(c >> 16) as u8, (c >> 8 & 0xff) as u8, (c & 0xff) as u8]
}

/// parse `#rrggbb` or `rrggbb` colour specs
pub fn hex_rgb (spec: &str)->Option<[u8;3]> {
    let hex = spec.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None
    }
    u32::from_str_radix( hex, 16).ok().map( rgb_of)
}

/// a colormap maps normalized values in `[0,1]` to colours. Continuous colormaps interpolate
/// linearly between equidistant anchor colours, categorical colormaps pick one of their colours
#[derive(Debug,Clone,PartialEq)]
pub struct Colormap {
    pub name: String,
    colours: Vec<[u8;3]>,
    categorical: bool,
}

impl Colormap {
    /// look up a colormap by (case insensitive) name. Names can also be comma separated lists
    /// of hex colours, which produce categorical colormaps
    pub fn from_name (name: &str)->Result<Self> {
        let key = name.trim().to_lowercase();

        if key.contains('#') || key.contains(',') {
            let specs: Vec<String> = key.split(',').map( |s| s.trim().to_string()).filter( |s| !s.is_empty()).collect();
            return Self::categorical( &specs).map_err( |_| EdrExplorerError::InvalidColormap( name.to_string()))
        }

        let (base,reversed) = match key.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (key.as_str(), false)
        };
        let anchors = named_anchors(base).ok_or_else( || EdrExplorerError::InvalidColormap( name.to_string()))?;

        let mut colours: Vec<[u8;3]> = anchors.iter().map( |c| rgb_of(*c)).collect();
        if reversed {
            colours.reverse();
        }
        Ok( Colormap { name: key, colours, categorical: false } )
    }

    /// a colormap with one colour per category, e.g. from the `categoryEncoding` of a parameter
    pub fn categorical<S: AsRef<str>> (hex_colours: &[S])->Result<Self> {
        let mut colours = Vec::with_capacity( hex_colours.len());
        for spec in hex_colours {
            let spec = spec.as_ref();
            colours.push( hex_rgb(spec).ok_or_else( || EdrExplorerError::InvalidColormap( spec.to_string()))?);
        }
        if colours.is_empty() {
            return Err( EdrExplorerError::InvalidColormap( String::new()))
        }

        let name = hex_colours.iter().map( |s| s.as_ref()).collect::<Vec<&str>>().join(",");
        Ok( Colormap { name, colours, categorical: true } )
    }

    pub fn is_categorical (&self)->bool { self.categorical }

    /// the colour for a normalized value. Values outside `[0,1]` are clamped
    pub fn rgb (&self, t: f64)->[u8;3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.colours.len();
        if n == 1 {
            return self.colours[0]
        }

        if self.categorical {
            let i = ((t * n as f64) as usize).min(n-1);
            self.colours[i]
        } else {
            let x = t * (n-1) as f64;
            let i = (x.floor() as usize).min(n-2);
            let f = x - i as f64;
            let (c0,c1) = (self.colours[i], self.colours[i+1]);
            [ lerp(c0[0], c1[0], f), lerp(c0[1], c1[1], f), lerp(c0[2], c1[2], f) ]
        }
    }
}

#[inline]
fn lerp (a: u8, b: u8, f: f64)->u8 {
    (a as f64 + (b as f64 - a as f64) * f).round() as u8
}

/// rasterize a map layer into an RGBA image with north up and west left. Missing (NaN) values
/// are transparent. Values are scaled into `clim` or, if not set, into the data range
pub fn render_layer (layer: &MapLayer, cmap: &Colormap, alpha: f64, clim: Option<(f64,f64)>)->RgbaImage {
    let (w,h) = (layer.width(), layer.height());
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;

    let (lo,hi) = match clim {
        Some(lim) => lim,
        None => {
            let mm = MinMax::from_values( layer.values.iter());
            if mm.is_empty() { (0.0, 1.0) } else { (mm.min, mm.max) }
        }
    };
    let range = hi - lo;

    let north_up = layer.y.len() < 2 || layer.y[0] <= layer.y[layer.y.len()-1];
    let west_left = layer.x.len() < 2 || layer.x[0] <= layer.x[layer.x.len()-1];

    let mut img = RgbaImage::new( w as u32, h as u32);
    for ((j,i),v) in layer.values.indexed_iter() {
        let px = if west_left { i } else { w - 1 - i };
        let py = if north_up { h - 1 - j } else { j };

        let pixel = if v.is_nan() {
            Rgba([0,0,0,0])
        } else {
            let t = if range > 0.0 { (v - lo) / range } else { 0.5 };
            let [r,g,b] = cmap.rgb(t);
            Rgba([r,g,b,a])
        };
        img.put_pixel( px as u32, py as u32, pixel);
    }
    img
}

pub fn encode_png (img: &RgbaImage)->Result<Vec<u8>> {
    let mut buf = Cursor::new( Vec::new());
    img.write_to( &mut buf, ImageFormat::Png)?;
    Ok( buf.into_inner() )
}

/// render and encode in one step
pub fn render_png (layer: &MapLayer, cmap: &Colormap, alpha: f64, clim: Option<(f64,f64)>)->Result<Vec<u8>> {
    encode_png( &render_layer( layer, cmap, alpha, clim))
}
