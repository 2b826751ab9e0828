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
use edr_common::{collections::LookupError, config::ConfigError, datetime::Iso8601Error, net::EdrNetError};

pub type Result<T> = std::result::Result<T, EdrClientError>;

/// note that server originated errors are displayed without prefix since they are
/// shown to the user as they are
#[derive(Error,Debug)]
pub enum EdrClientError {
    #[error("{0}")]
    NetError( #[from] EdrNetError),

    #[error("config error {0}")]
    ConfigError( #[from] ConfigError),

    #[error("{0}")]
    DateTimeError( #[from] Iso8601Error),

    #[error("{0}")]
    LookupError( #[from] LookupError),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("array shape error {0}")]
    ShapeError( #[from] ndarray::ShapeError),

    #[error("Collection {0} could not be found.")]
    CollectionNotFound(String),

    #[error("Query type {0:?} not supported by server.")]
    UnsupportedQuery(String),

    #[error("Invalid link reference: {0}")]
    InvalidLink(String),

    #[error("missing field {0}")]
    MissingField(String),

    #[error("unknown reference system {0:?}")]
    UnknownReferenceSystem(String),

    #[error("Cannot process parameter type {0:?}")]
    UnsupportedParameterType(String),

    #[error("invalid data key {0:?}")]
    InvalidKey(String),

    #[error("{0}")]
    InvalidArgument(String),

    /// a generic error
    #[error("operation failed {0}")]
    OpFailed(String)
}

pub fn op_failed (msg: impl ToString)->EdrClientError {
    EdrClientError::OpFailed(msg.to_string())
}

pub fn missing_field (path: impl ToString)->EdrClientError {
    EdrClientError::MissingField(path.to_string())
}

pub fn invalid_argument (msg: impl ToString)->EdrClientError {
    EdrClientError::InvalidArgument(msg.to_string())
}
