// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Slot payload encoding.
//!
//! Collections are stored as JSON arrays. Date fields are wrapped as
//! `{"__type": "Date", "value": "<ISO-8601>"}` so a decoder can tell them
//! apart from ordinary strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StoreResult;

pub const DATE_MARKER: &str = "Date";

#[derive(Serialize, Deserialize)]
struct TaggedDate {
    #[serde(rename = "__type")]
    marker: String,
    value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateRepr {
    Tagged(TaggedDate),
    Plain(String),
}

pub fn format_date(d: &DateTime<Utc>) -> String {
    d.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_iso(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|d| d.with_timezone(&Utc))
}

fn decode_repr<E: serde::de::Error>(repr: DateRepr) -> Result<DateTime<Utc>, E> {
    let raw = match repr {
        DateRepr::Tagged(t) if t.marker == DATE_MARKER => t.value,
        DateRepr::Tagged(t) => {
            return Err(E::custom(format!("unexpected type marker '{}'", t.marker)));
        }
        DateRepr::Plain(s) => s,
    };
    parse_iso(&raw).map_err(|e| E::custom(format!("invalid date '{}': {}", raw, e)))
}

pub mod tagged_date {
    use super::*;

    pub fn serialize<S: Serializer>(d: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        TaggedDate {
            marker: DATE_MARKER.to_string(),
            value: format_date(d),
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        decode_repr(DateRepr::deserialize(d)?)
    }
}

pub mod tagged_date_option {
    use super::*;

    pub fn serialize<S: Serializer>(d: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => super::tagged_date::serialize(d, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<DateRepr>::deserialize(d)? {
            Some(repr) => decode_repr(repr).map(Some),
            None => Ok(None),
        }
    }
}

pub fn encode<T: Serialize>(items: &[T]) -> StoreResult<String> {
    Ok(serde_json::to_string(items)?)
}

pub fn decode<T: DeserializeOwned>(payload: &str) -> StoreResult<Vec<T>> {
    Ok(serde_json::from_str(payload)?)
}
