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

use chrono::{TimeZone,Utc};
use edr_common::datetime::*;

// run with "cargo test --test test_datetime -- --nocapture"

#[test]
fn test_start_end() {
    let ival = Iso8601Interval::parse("2021-06-01T00:00Z/2021-06-02T06:00:00Z").unwrap();
    assert_eq!( ival.start.as_deref(), Some("2021-06-01T00:00Z"));
    assert_eq!( ival.end.as_deref(), Some("2021-06-02T06:00:00Z"));
    assert!( ival.duration.is_none());
    assert!( ival.repeat.is_none());

    let dts = ival.datetime_strings().unwrap();
    assert_eq!( dts, vec!["2021-06-01T00:00:00Z", "2021-06-02T06:00:00Z"]);
}

#[test]
fn test_double_dash_delimiter() {
    let ival = Iso8601Interval::parse("2021-06-01T00:00Z--2021-06-01T12:00Z").unwrap();
    let dts = ival.datetimes().unwrap();
    assert_eq!( dts.len(), 2);
    assert_eq!( dts[1], Utc.with_ymd_and_hms( 2021, 6, 1, 12, 0, 0).unwrap());
}

#[test]
fn test_single_start() {
    let ival = Iso8601Interval::parse("2021-06-01T00:00Z").unwrap();
    assert_eq!( ival.datetime_strings().unwrap(), vec!["2021-06-01T00:00:00Z"]);
}

#[test]
fn test_repeat_forward() {
    let ival = Iso8601Interval::parse("R3/2021-06-01T00:00Z/PT6H").unwrap();
    assert_eq!( ival.repeat_count().unwrap(), 3);

    let dts = ival.datetime_strings().unwrap();
    println!("{dts:?}");
    assert_eq!( dts, vec![
        "2021-06-01T00:00:00Z",
        "2021-06-01T06:00:00Z",
        "2021-06-01T12:00:00Z",
        "2021-06-01T18:00:00Z",
    ]);
}

#[test]
fn test_duration_without_repeat() {
    // one implicit repeat
    let ival = Iso8601Interval::parse("2021-06-01T00:00Z/P1D").unwrap();
    assert_eq!( ival.datetime_strings().unwrap(), vec!["2021-06-01T00:00:00Z", "2021-06-02T00:00:00Z"]);
}

#[test]
fn test_duration_backwards() {
    let ival = Iso8601Interval::parse("R2/PT12H/2021-06-02T00:00:00Z");
    // a repeat followed by a duration and an end is not a valid classification
    assert!( ival.is_err());

    let ival = Iso8601Interval::parse("PT12H/2021-06-02T00:00:00Z").unwrap();
    assert!( ival.start.is_none());
    assert_eq!( ival.datetime_strings().unwrap(), vec!["2021-06-01T12:00:00Z", "2021-06-02T00:00:00Z"]);
}

#[test]
fn test_durations() {
    assert_eq!( parse_iso_duration("PT1H30M").unwrap().num_minutes(), 90);
    assert_eq!( parse_iso_duration("P1DT6H").unwrap().num_hours(), 30);
    assert_eq!( parse_iso_duration("P1M").unwrap().num_days(), 30);
    assert_eq!( parse_iso_duration("P1Y2D").unwrap().num_days(), 367);
    assert_eq!( parse_iso_duration("P2W").unwrap().num_days(), 14);
    assert_eq!( parse_iso_duration("PT45S").unwrap().num_seconds(), 45);

    assert!( matches!( parse_iso_duration("P3X"), Err(Iso8601Error::BadUnit(_))));
    assert!( parse_iso_duration("PT5").is_err());
}

#[test]
fn test_bad_input() {
    assert!( matches!( Iso8601Interval::parse("R2/PT1H"), Err(Iso8601Error::BadIndices(_))));

    let ival = Iso8601Interval::parse("yesterday").unwrap(); // classified as datetime..
    assert!( matches!( ival.datetimes(), Err(Iso8601Error::BadDatetime(_)))); // ..but not parseable
}

#[test]
fn test_expand_values() {
    let values = vec!["2021-06-01T00:00:00Z", "R1/2021-06-02T00:00Z/PT1H"];
    let list = expand_datetime_values( &values).unwrap();
    assert_eq!( list, vec!["2021-06-01T00:00:00Z", "2021-06-02T00:00:00Z", "2021-06-02T01:00:00Z"]);
}

#[test]
fn test_days_since_epoch() {
    let dt = parse_datetime("1970-01-03T12:00:00Z").unwrap();
    assert!( (days_since_epoch(&dt) - 2.5).abs() < 1e-9);

    assert!( parse_datetime("2021-06-01").is_some());
    assert!( parse_datetime("2021-06-01T00:00:00+02:00").is_some());
    assert!( parse_datetime("not a date").is_none());
}

#[test]
fn test_out_of_range_intervals() {
    // expansion leaves the representable datetime range
    let ival = Iso8601Interval::parse("R2/2021-01-01T00:00Z/P9999999Y").unwrap();
    assert!( matches!( ival.datetimes(), Err(Iso8601Error::Invalid(_))));

    let ival = Iso8601Interval::parse("P9999999Y/2021-01-01T00:00Z").unwrap();
    assert!( matches!( ival.datetimes(), Err(Iso8601Error::Invalid(_))));

    // durations that do not fit into seconds
    assert!( matches!( parse_iso_duration("P99999999999999Y"), Err(Iso8601Error::BadDuration(_))));
    assert!( matches!( parse_iso_duration("P106751991167300DT106751991167300H"), Err(Iso8601Error::BadDuration(_))));
    assert!( matches!( expand_datetime_values( &["P99999999999999Y/2021-01-01T00:00Z"]), Err(Iso8601Error::BadDuration(_))));

    // repeat counts are bounded
    let ival = Iso8601Interval::parse("R18446744073709551615/2021-01-01T00:00Z/PT1H").unwrap();
    assert!( matches!( ival.datetimes(), Err(Iso8601Error::BadRepeat(_))));
    let ival = Iso8601Interval::parse( &format!("R{}/2021-01-01T00:00Z/PT1S", MAX_REPEAT)).unwrap();
    assert_eq!( ival.datetimes().unwrap().len(), MAX_REPEAT + 1);
}
