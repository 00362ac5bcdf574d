use alloy_primitives::{hex, Address, Bytes, U256};
use serde_json::{Map, Value};
use tracing::debug;

use std::{fs, path::Path};

use crate::{
    error::InvalidBatch,
    transaction_data::{Batch, OperationType, SubTransaction},
};

/// Reads and validates a batch file.
pub fn load_batch<P: AsRef<Path>>(path: P) -> Result<Batch, InvalidBatch> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| InvalidBatch::whole(format!("failed to read {}: {e}", path.display())))?;
    let raw: Value = serde_json::from_str(&contents)
        .map_err(|e| InvalidBatch::whole(format!("{} is not valid JSON: {e}", path.display())))?;

    let batch = validate(&raw)?;
    debug!(path = %path.display(), transactions = batch.len(), "loaded batch");

    Ok(batch)
}

/// Checks untyped batch input against the `[{ to, value, data, operation }]` shape.
///
/// Fails on the first offending entry; nothing is partially accepted.
pub fn validate(raw: &Value) -> Result<Batch, InvalidBatch> {
    let entries = raw.as_array().ok_or_else(|| InvalidBatch::whole("expected a JSON array"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let record = entry
                .as_object()
                .ok_or_else(|| InvalidBatch::at(index, "expected a JSON object"))?;
            parse_record(record).map_err(|reason| InvalidBatch::at(index, reason))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Batch::new)
}

fn parse_record(record: &Map<String, Value>) -> Result<SubTransaction, String> {
    let to = match record.get("to") {
        Some(Value::String(s)) => parse_address(s).ok_or("`to` is not a valid address")?,
        _ => return Err("`to` must be an address string".into()),
    };

    let value = match record.get("value") {
        Some(Value::String(s)) => parse_value(s).ok_or("`value` is not a non-negative integer")?,
        Some(Value::Number(n)) => {
            n.as_u64().map(U256::from).ok_or("`value` is not a non-negative integer")?
        }
        _ => return Err("`value` must be a decimal string".into()),
    };

    let data = match record.get("data") {
        Some(Value::String(s)) => parse_data(s).ok_or("`data` is not a 0x-prefixed hex string")?,
        _ => return Err("`data` must be a hex string".into()),
    };

    let operation = record
        .get("operation")
        .and_then(Value::as_u64)
        .and_then(|op| OperationType::try_from(op).ok())
        .ok_or("`operation` must be 0 or 1")?;

    Ok(SubTransaction { to, value, data, operation })
}

/// Accepts all-lowercase or all-uppercase hex as-is; mixed case must be a valid EIP-55
/// checksum.
fn parse_address(s: &str) -> Option<Address> {
    let body = s.strip_prefix("0x")?;
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(s, None).ok()
    } else {
        s.parse().ok()
    }
}

fn parse_value(s: &str) -> Option<U256> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x") {
        if !is_hex(hex) {
            return None;
        }
        return U256::from_str_radix(hex, 16).ok();
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(s, 10).ok()
}

fn parse_data(s: &str) -> Option<Bytes> {
    let body = s.strip_prefix("0x")?;
    if !body.is_empty() && !is_hex(body) {
        return None;
    }
    hex::decode(body).ok().map(Bytes::from)
}

/// Non-empty and nothing but hex digits, so no nested `0x` and no `_` separators.
fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}
