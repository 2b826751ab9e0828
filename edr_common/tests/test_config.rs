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
use std::{io::Write, time::Duration};
use serde::Deserialize;
use edr_common::{config::{load_config_path, ConfigError}, datetime::deserialize_duration};

#[derive(Deserialize,Debug)]
struct TestConfig {
    name: String,
    #[serde(deserialize_with="deserialize_duration")]
    timeout: Duration,
}

#[test]
fn test_load_ron() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!( file, r#"( name: "test", timeout: "30s" )"#).unwrap();

    let config: TestConfig = load_config_path( file.path()).unwrap();
    assert_eq!( config.name, "test");
    assert_eq!( config.timeout, Duration::from_secs(30));
}

#[test]
fn test_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!( file, r#"( name: 42 )"#).unwrap();

    let res: Result<TestConfig,ConfigError> = load_config_path( file.path());
    assert!( matches!( res, Err(ConfigError::ParseError(_))));
}
