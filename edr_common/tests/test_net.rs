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
use serde_json::json;
use edr_common::net::*;

#[test]
fn test_server_error_body() {
    let body = br#"{"code": 404, "description": "collection not found"}"#;
    let res = json_from_response( 404, body);
    match res {
        Err(e @ EdrNetError::ServerError(..)) => assert_eq!( e.to_string(), "collection not found (404)"),
        other => panic!("unexpected result {other:?}")
    }
}

#[test]
fn test_valid_body() {
    let body = br#"{"collections": []}"#;
    let json = json_from_response( 200, body).unwrap();
    assert_eq!( json, json!({"collections": []}));
}

#[test]
fn test_invalid_body() {
    let res = json_from_response( 502, b"<html>bad gateway</html>");
    assert!( matches!( res, Err(EdrNetError::InvalidResponse(502,_))));
}

#[test]
fn test_error_status_without_code() {
    let res = json_from_response( 500, br#"{"detail": "internal error"}"#);
    assert!( matches!( res, Err(EdrNetError::InvalidResponse(500,_))));

    // non-error status codes pass JSON through
    assert!( json_from_response( 204, br#"{}"#).is_ok());
}

#[test]
fn test_join_uri() {
    assert_eq!( join_uri("http://localhost:5000/", "/collections/?f=json"), "http://localhost:5000/collections/?f=json");
    assert_eq!( join_uri("http://localhost:5000", "collections"), "http://localhost:5000/collections");
}
