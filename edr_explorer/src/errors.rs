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
use thiserror::Error;
use edr_client::EdrClientError;
use edr_common::config::ConfigError;

pub type Result<T> = std::result::Result<T, EdrExplorerError>;

#[derive(Error,Debug)]
pub enum EdrExplorerError {
    #[error("{0}")]
    ClientError( #[from] EdrClientError),

    #[error("config error {0}")]
    ConfigError( #[from] ConfigError),

    #[error("image error {0}")]
    ImageError( #[from] image::ImageError),

    #[error("IO error {0}")]
    IoError( #[from] std::io::Error),

    #[error("unknown colormap {0:?}")]
    InvalidColormap(String),

    #[error("alpha must be within [0,1], got {0}")]
    InvalidAlpha(f64),

    #[error("not connected to an EDR server")]
    NotConnected,

    #[error("{0}")]
    InvalidSelection(String),

    #[error("operation failed {0}")]
    OpFailed(String)
}

pub fn op_failed (msg: impl ToString)->EdrExplorerError {
    EdrExplorerError::OpFailed(msg.to_string())
}

pub fn invalid_selection (msg: impl ToString)->EdrExplorerError {
    EdrExplorerError::InvalidSelection(msg.to_string())
}
