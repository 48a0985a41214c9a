//! Conversion between host values and the representation a column stores.
//!
//! `encode` canonicalizes a value for writing into a column of the given type, `decode`
//! turns what the driver hands back into the host-side value. Apart from booleans,
//! temporal types and sets, decoding is the same canonicalization as encoding, so a value
//! survives any number of write/read cycles unchanged. NULL passes through both ways.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use crate::core::{CodecError, SqlType, Value};

/// Storage format for every temporal column type, always in GMT.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encodes the value for use in the database.
pub fn encode(sql_type: &SqlType, value: Value) -> Result<Value, CodecError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match sql_type {
        SqlType::Bit | SqlType::Bool => Ok(Value::Boolean(value.is_truthy())),

        t if t.is_temporal() => encode_timestamp(t, &value),
        SqlType::Year => to_int(&value).map(Value::Integer),

        t if t.is_integral() => to_int(&value).map(Value::Integer),
        t if t.is_floating() => to_float(&value).map(Value::Real),

        // CHAR keeps only the first character
        SqlType::Char => Ok(Value::Text(to_text(&value).chars().take(1).collect())),
        t if t.is_stringy() => Ok(Value::Text(to_text(&value))),

        t if t.is_binary() => Ok(value),

        SqlType::Enum => Ok(Value::Text(to_text(&value))),
        SqlType::Set => Ok(match value {
            Value::List(items) => Value::Text(items.join(",")),
            other => Value::Text(to_text(&other)),
        }),

        _ => Ok(value),
    }
}

/// Decodes a value read from the database.
pub fn decode(sql_type: &SqlType, value: Value) -> Result<Value, CodecError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match sql_type {
        SqlType::Bit | SqlType::Bool => Ok(Value::Boolean(value.is_one())),
        t if t.is_temporal() => decode_timestamp(&value).map(Value::Integer),
        SqlType::Set => Ok(Value::List(match value {
            Value::List(items) => items,
            other => split_set(&to_text(&other)),
        })),
        _ => encode(sql_type, value),
    }
}

/// `encode` for a bare type name such as `"varchar"`.
pub fn encode_as(type_name: &str, value: Value) -> Result<Value, CodecError> {
    encode(&SqlType::from_name(type_name), value)
}

/// `decode` for a bare type name such as `"date"`.
pub fn decode_as(type_name: &str, value: Value) -> Result<Value, CodecError> {
    decode(&SqlType::from_name(type_name), value)
}

fn encode_timestamp(sql_type: &SqlType, value: &Value) -> Result<Value, CodecError> {
    let not_an_epoch = || CodecError::NotAnEpoch {
        type_name: sql_type.name().to_string(),
        value: value.to_string(),
    };

    let Value::Integer(epoch) = value else {
        return Err(not_an_epoch());
    };

    DateTime::from_timestamp(*epoch, 0)
        .map(|dt| Value::Text(dt.format(TIMESTAMP_FORMAT).to_string()))
        .ok_or_else(not_an_epoch)
}

fn decode_timestamp(value: &Value) -> Result<i64, CodecError> {
    match value {
        Value::Integer(epoch) => Ok(*epoch),
        Value::Timestamp(ts) => Ok(ts.and_utc().timestamp()),
        Value::Date(date) => Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp()),
        Value::Text(text) => parse_timestamp(text.trim()),
        other => Err(CodecError::InvalidTimestamp(other.to_string())),
    }
}

fn parse_timestamp(text: &str) -> Result<i64, CodecError> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT) {
        return Ok(ts.and_utc().timestamp());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ts.and_utc().timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp());
    }
    // TIME columns: seconds into 1970-01-01
    if let Ok(time) = NaiveTime::parse_from_str(text, "%H:%M:%S") {
        return Ok(time.signed_duration_since(NaiveTime::MIN).num_seconds());
    }
    Err(CodecError::InvalidTimestamp(text.to_string()))
}

fn split_set(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(',').map(str::to_string).collect()
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        other => other.to_string(),
    }
}

fn to_int(value: &Value) -> Result<i64, CodecError> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Real(r) => Ok(r.trunc() as i64),
        Value::Numeric(d) => d.trunc().to_i64().ok_or_else(|| CodecError::InvalidInteger(d.to_string())),
        Value::Boolean(b) => Ok(i64::from(*b)),
        Value::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f.trunc() as i64))
                .map_err(|_| CodecError::InvalidInteger(format!("'{s}'")))
        }
        other => Err(CodecError::InvalidInteger(other.to_string())),
    }
}

fn to_float(value: &Value) -> Result<f64, CodecError> {
    match value {
        Value::Integer(i) => Ok(*i as f64),
        Value::Real(r) => Ok(*r),
        Value::Numeric(d) => d.to_f64().ok_or_else(|| CodecError::InvalidFloat(d.to_string())),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CodecError::InvalidFloat(format!("'{s}'"))),
        other => Err(CodecError::InvalidFloat(other.to_string())),
    }
}
