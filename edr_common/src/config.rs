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
//! RON based configuration loading. Config files are looked up (first match) in
//! ```text
//!   $EDR_HOME/configs/<crate>/<file>
//!   $HOME/.edr/configs/<crate>/<file>
//!   ./configs/<file>
//!   <crate-manifest-dir>/configs/<file>
//! ```
//! Crates that define configs expand `define_load_config!{}` in their lib.rs, which provides
//! a crate specific `load_config(filename)` function

use std::{env, fs, path::{Path,PathBuf}};
use serde::de::DeserializeOwned;
use tracing::debug;
use crate::{define_error, map_to_opaque_error};

pub const CONFIGS: &str = "configs";

define_error!{ pub ConfigError =
    IOError( #[from] std::io::Error) : "config IO error: {0}",
    ParseError(String) : "config parse error: {0}",
    NotFound(String) : "config not found: {0}"
}

map_to_opaque_error!{ ron::error::SpannedError => ConfigError::ParseError }

pub type Result<T> = std::result::Result<T,ConfigError>;

/// locate a config file for given crate
pub fn find_config_file (crate_name: &str, manifest_dir: &str, filename: &str)->Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::with_capacity(4);

    if let Ok(edr_home) = env::var("EDR_HOME") {
        candidates.push( Path::new(&edr_home).join(CONFIGS).join(crate_name).join(filename));
    }
    if let Ok(usr_home) = env::var("HOME") {
        candidates.push( Path::new(&usr_home).join(".edr").join(CONFIGS).join(crate_name).join(filename));
    }
    candidates.push( Path::new(CONFIGS).join(filename));
    candidates.push( Path::new(manifest_dir).join(CONFIGS).join(filename));

    candidates.into_iter().find( |p| p.is_file())
}

/// load a config from an explicit path
pub fn load_config_path<C,P> (path: P)->Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let path = path.as_ref();
    debug!("loading config {:?}", path);
    let data = fs::read_to_string(path)?;
    Ok( ron::from_str( data.as_str())? )
}

/// load a config by filename using the lookup order of this module. Explicit paths (containing a
/// separator) are loaded as is
pub fn load_crate_config<C> (crate_name: &str, manifest_dir: &str, filename: &str)->Result<C> where C: DeserializeOwned {
    let p = Path::new(filename);
    if p.components().count() > 1 {
        return load_config_path(p)
    }

    match find_config_file( crate_name, manifest_dir, filename) {
        Some(path) => load_config_path(path),
        None => Err( ConfigError::NotFound( format!("{filename} for crate {crate_name}")))
    }
}

/// the main macro to be expanded at the top of crates that define configs. Config users call
/// the generated `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        pub fn load_config<C> (filename: &str)->$crate::config::Result<C> where C: serde::de::DeserializeOwned {
            $crate::config::load_crate_config( env!("CARGO_PKG_NAME"), env!("CARGO_MANIFEST_DIR"), filename)
        }
    }
}
