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
//! lookup functions for lists of JSON objects with a common schema

use serde_json::Value;
use crate::define_error;

define_error!{ pub LookupError =
    NotFound(String,String) : "A pair matching {{{0}: {1}}} could not be found."
}

/// find the first object in `list` that has a `key` member equal to `value`.
/// Given
/// ```text
///   [{"a": "foo", "b": 1}, {"a": "bar", "b": 3}]
/// ```
/// `find_by_key(list, "a", &json!("foo"))` returns the first object
pub fn find_by_key<'a> (list: &'a [Value], key: &str, value: &Value)->Result<&'a Value,LookupError> {
    list.iter()
        .find( |e| e.get(key) == Some(value))
        .ok_or_else( || LookupError::NotFound( key.to_string(), value.to_string()))
}

/// find the first object in `list` that has a `key` member equal to any of the given candidate values
pub fn find_by_any_key<'a> (list: &'a [Value], key: &str, values: &[Value])->Result<&'a Value,LookupError> {
    for value in values {
        if let Ok(e) = find_by_key( list, key, value) {
            return Ok(e)
        }
    }
    let vs: Vec<String> = values.iter().map( |v| v.to_string()).collect();
    Err( LookupError::NotFound( key.to_string(), vs.join(" | ")))
}
