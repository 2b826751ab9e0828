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
//! common utility functions for retrieving JSON documents from (EDR) servers

use reqwest::{Client, header::{ACCEPT, HeaderValue}};
use serde_json::Value;
use tracing::debug;

use crate::define_error;

define_error!{ pub EdrNetError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    ServerError(String,String) : "{0} ({1})",
    InvalidResponse(u16,String) : "invalid response ({0}): {1}"
}

pub type Result<T> = std::result::Result<T, EdrNetError>;

/// GET a JSON document. EDR servers report errors as JSON objects with a `code` member and a
/// message member, which we turn into `EdrNetError::ServerError`s
pub async fn get_json (client: &Client, uri: &str)->Result<Value> {
    debug!("GET {}", uri);

    let response = client.get(uri)
        .header( ACCEPT, HeaderValue::from_static("application/json"))
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?;

    json_from_response( status, &body)
}

/// turn a response body into a JSON value, detecting server error objects. Other JSON bodies
/// of error responses (status >= 400) are reported as `InvalidResponse`
pub fn json_from_response (status: u16, body: &[u8])->Result<Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => match server_error(&json) {
            Some(e) => Err(e),
            None if status >= 400 => Err( EdrNetError::InvalidResponse( status, value_text(&json))),
            None => Ok(json)
        }
        Err(e) => Err( EdrNetError::InvalidResponse( status, e.to_string()))
    }
}

/// check if a JSON value is an error object of the form `{"code": .., "<msg-key>": ..}`
pub fn server_error (json: &Value)->Option<EdrNetError> {
    let obj = json.as_object()?;
    let code = obj.get("code")?;
    let message = obj.iter()
        .find( |(k,_)| k.as_str() != "code")
        .map( |(_,v)| value_text(v))
        .unwrap_or_default();

    Some( EdrNetError::ServerError( message, value_text(code)) )
}

/// plain text of a JSON value (without quotes for strings)
pub fn value_text (v: &Value)->String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string()
    }
}

/// join a server base URI and a relative query path
pub fn join_uri (base: &str, path: &str)->String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
