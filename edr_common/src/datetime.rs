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
//! datetime utilities, most notably expansion of ISO 8601 interval strings as they are used
//! in the temporal extents of EDR collections, e.g.
//! ```text
//!   R4/2021-06-01T00:00Z/PT6H      : start + 4 repeats of 6 hours
//!   PT12H/2021-06-01T12:00:00Z     : duration ending at a given time
//!   2021-06-01T00:00Z--2021-06-02T00:00Z
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use parse_duration::parse;
use crate::define_error;

/// canonical output format for expanded datetimes
pub const ISO_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";
const ISO_FMT_SHORT: &str = "%Y-%m-%dT%H:%MZ";

const MINUTE_SECS: i64 = 60;
const HOUR_SECS: i64 = 60 * MINUTE_SECS;
const DAY_SECS: i64 = 24 * HOUR_SECS;

/// upper bound for the number of repeats we expand
pub const MAX_REPEAT: usize = 100_000;

define_error!{ pub Iso8601Error =
    BadIndices(String) : "Bad datetime indices in {0}",
    BadUnit(String) : "Bad unit letter: {0}",
    BadDuration(String) : "Bad duration: {0}",
    BadRepeat(String) : "Bad repeat: {0}",
    BadDatetime(String) : "Bad datetime: {0}",
    Invalid(String) : "Invalid ISO8601 date string: {0}"
}

pub type Result<T> = std::result::Result<T,Iso8601Error>;

#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }

/// parse the datetime formats we see in EDR responses. Besides RFC 3339 this includes the
/// minute resolution `2021-06-01T00:00Z` form and plain dates
pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ndt) = NaiveDateTime::parse_from_str( s, ISO_FMT_SHORT) {
        return Some( ndt.and_utc())
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str( s, ISO_FMT) {
        return Some( ndt.and_utc())
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some( dt.to_utc())
    }
    if let Ok(nd) = NaiveDate::parse_from_str( s, "%Y-%m-%d") {
        return Some( NaiveDateTime::new( nd, NaiveTime::MIN).and_utc())
    }
    None
}

pub fn format_datetime (dt: &DateTime<Utc>)->String {
    dt.format(ISO_FMT).to_string()
}

/// fractional days since 1970-01-01T00:00:00Z
pub fn days_since_epoch (dt: &DateTime<Utc>)->f64 {
    dt.timestamp_millis() as f64 / (DAY_SECS * 1000) as f64
}

/// answer if the string looks like something `Iso8601Interval` has to expand (as opposed to a single datetime)
pub fn is_interval (s: &str)->bool {
    s.contains('/') || s.contains("--") || s.starts_with(['R','r','P','p'])
}

/* #region ISO 8601 intervals ********************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
enum ElementType { Repeat, Duration, Datetime }

fn element_type (e: &str)->ElementType {
    match e.chars().next() {
        Some('R') | Some('r') => ElementType::Repeat,
        Some('P') | Some('p') => ElementType::Duration,
        _ => ElementType::Datetime
    }
}

/// the classified components of an ISO 8601 interval/repeat string. Absent components are `None`
#[derive(Debug,Clone,PartialEq)]
pub struct Iso8601Interval {
    pub source: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub repeat: Option<String>,
}

impl Iso8601Interval {

    pub fn parse (s: &str)->Result<Self> {
        let mut elements: Vec<&str> = s.split('/').collect();
        if elements.len() == 1 { // optional '--' delimiter
            elements = s.split("--").collect();
        }

        let mut start = None;
        let mut end = None;
        let mut duration = None;
        let mut repeat = None;

        let types: Vec<ElementType> = elements.iter().map( |e| element_type(e)).collect();
        for (e,t) in elements.iter().zip( types.iter()) {
            match t {
                ElementType::Repeat => repeat = Some(e.to_string()),
                ElementType::Duration => duration = Some(e.to_string()),
                ElementType::Datetime => {}
            }
        }

        let dt_idx: Vec<usize> = types.iter().enumerate()
            .filter_map( |(i,t)| if *t == ElementType::Datetime { Some(i) } else { None })
            .collect();

        match dt_idx.as_slice() {
            [0,1] => {
                start = Some(elements[0].to_string());
                end = Some(elements[1].to_string());
            }
            [0] => {
                start = Some(elements[0].to_string());
            }
            [1] => match types[0] {
                ElementType::Duration => end = Some(elements[1].to_string()),
                ElementType::Repeat => start = Some(elements[1].to_string()),
                ElementType::Datetime => return Err( Iso8601Error::BadIndices(s.to_string()))
            }
            _ => return Err( Iso8601Error::BadIndices(s.to_string()))
        }

        Ok( Iso8601Interval { source: s.to_string(), start, end, duration, repeat } )
    }

    pub fn start_datetime (&self)->Result<Option<DateTime<Utc>>> {
        self.start.as_deref().map( parse_required_datetime).transpose()
    }

    pub fn end_datetime (&self)->Result<Option<DateTime<Utc>>> {
        self.end.as_deref().map( parse_required_datetime).transpose()
    }

    /// number of repeats. If there is no repeat element there is implicitly just one.
    /// Counts above `MAX_REPEAT` are rejected
    pub fn repeat_count (&self)->Result<usize> {
        match &self.repeat {
            Some(r) => {
                let n = r.trim_start_matches(['R','r']);
                match n.parse::<usize>() {
                    Ok(n) if n <= MAX_REPEAT => Ok(n),
                    _ => Err( Iso8601Error::BadRepeat(r.clone()))
                }
            }
            None => Ok(1)
        }
    }

    /// the duration element as a time delta. Years and months are converted naively
    /// (365 days per year, 30 days per month)
    pub fn duration_delta (&self)->Result<Option<TimeDelta>> {
        match &self.duration {
            Some(d) => parse_iso_duration(d).map(Some),
            None => Ok(None)
        }
    }

    /// all datetimes described by this interval, in ascending order
    pub fn datetimes (&self)->Result<Vec<DateTime<Utc>>> {
        let start = self.start_datetime()?;
        let end = self.end_datetime()?;
        let duration = self.duration_delta()?;
        let repeat = self.repeat_count()?;

        match (start, end, duration) {
            (Some(start), None, None) => Ok( vec![start] ),
            (Some(start), Some(end), _) => Ok( vec![start, end] ),
            (Some(start), None, Some(d)) => {
                let mut dts = Vec::with_capacity(repeat+1);
                let mut date = start;
                dts.push(date);
                for _ in 0..repeat {
                    date = date.checked_add_signed(d).ok_or_else( || Iso8601Error::Invalid( self.source.clone()))?;
                    dts.push(date);
                }
                Ok(dts)
            }
            (None, Some(end), Some(d)) => {
                let mut dts = Vec::with_capacity(repeat+1);
                let mut date = end;
                dts.push(date);
                for _ in 0..repeat {
                    date = date.checked_sub_signed(d).ok_or_else( || Iso8601Error::Invalid( self.source.clone()))?;
                    dts.push(date);
                }
                dts.reverse();
                Ok(dts)
            }
            _ => Err( Iso8601Error::Invalid( self.source.clone()))
        }
    }

    pub fn datetime_strings (&self)->Result<Vec<String>> {
        Ok( self.datetimes()?.iter().map( format_datetime).collect() )
    }
}

fn parse_required_datetime (s: &str)->Result<DateTime<Utc>> {
    parse_datetime(s).ok_or_else( || Iso8601Error::BadDatetime(s.to_string()))
}

/// parse `P[nY][nM][nW][nD][T[nH][nM][nS]]` into a time delta
pub fn parse_iso_duration (s: &str)->Result<TimeDelta> {
    let body = s.trim_start_matches(['P','p']);
    let (date_part, time_part) = match body.find(['T','t']) {
        Some(idx) => (&body[..idx], &body[idx+1..]),
        None => (body, "")
    };

    let secs = duration_part_secs( date_part, true, s)?
        .checked_add( duration_part_secs( time_part, false, s)?)
        .ok_or_else( || Iso8601Error::BadDuration(s.to_string()))?;
    TimeDelta::try_seconds(secs).ok_or_else( || Iso8601Error::BadDuration(s.to_string()))
}

fn duration_part_secs (part: &str, is_date: bool, src: &str)->Result<i64> {
    let mut total: i64 = 0;
    let mut num = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            num.push(c);
        } else {
            if num.is_empty() { return Err( Iso8601Error::BadDuration(src.to_string())) }
            let n: i64 = num.parse().map_err( |_| Iso8601Error::BadDuration(src.to_string()))?;
            total = n.checked_mul( unit_secs( c, is_date)?)
                .and_then( |secs| total.checked_add(secs))
                .ok_or_else( || Iso8601Error::BadDuration(src.to_string()))?;
            num.clear();
        }
    }

    if !num.is_empty() { // trailing number without unit
        return Err( Iso8601Error::BadDuration(src.to_string()))
    }
    Ok(total)
}

fn unit_secs (unit: char, is_date: bool)->Result<i64> {
    match unit.to_ascii_lowercase() {
        'y' => Ok( 365 * DAY_SECS),
        'm' => if is_date { Ok( 30 * DAY_SECS) } else { Ok( MINUTE_SECS) },
        'w' if is_date => Ok( 7 * DAY_SECS),
        'd' => Ok( DAY_SECS),
        'h' => Ok( HOUR_SECS),
        's' if !is_date => Ok(1),
        _ => Err( Iso8601Error::BadUnit(unit.to_string()))
    }
}

/// expand a list of temporal extent values, each of which is either a single datetime or an
/// interval. Single datetimes are passed through as they are
pub fn expand_datetime_values<S: AsRef<str>> (values: &[S])->Result<Vec<String>> {
    let mut list = Vec::with_capacity(values.len());
    for v in values {
        let v = v.as_ref();
        if is_interval(v) {
            list.extend( Iso8601Interval::parse(v)?.datetime_strings()?);
        } else {
            list.push( v.to_string());
        }
    }
    Ok(list)
}

/* #endregion ISO 8601 intervals */

//--- support for serde

pub fn deserialize_duration <'a,D>(deserializer: D) -> std::result::Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}
