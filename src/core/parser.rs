//! NB-022: Input decoding.
//!
//! Authored documents are YAML (JSON parses too, being a YAML subset). A
//! document with a top-level `service` key is a full payload; anything else
//! is a bare definition and gets wrapped. Execution messages are JSON.

use super::definition::{Definition, Payload};
use super::message::ExecutionMessage;
use crate::error::{Error, Result};
use serde_yaml_ng::Value;
use std::path::Path;
use tracing::debug;

/// Parse a payload (or bare definition) file from disk.
pub fn parse_payload_file(path: &Path) -> Result<Payload> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_payload(&content)
}

/// Parse a payload (or bare definition) from a string.
pub fn parse_payload(yaml: &str) -> Result<Payload> {
    let value: Value = serde_yaml_ng::from_str(yaml)?;
    let is_payload = value
        .as_mapping()
        .is_some_and(|m| m.contains_key("service"));

    if is_payload {
        Ok(serde_yaml_ng::from_value(value)?)
    } else {
        debug!("bare definition, wrapping into a payload");
        let definition: Definition = serde_yaml_ng::from_value(value)?;
        Ok(Payload::from_definition(definition))
    }
}

/// Parse an execution message file from disk.
pub fn parse_message_file(path: &Path) -> Result<ExecutionMessage> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_message(&content)
}

/// Parse an execution message from a JSON string.
pub fn parse_message(json: &str) -> Result<ExecutionMessage> {
    Ok(serde_json::from_str(json)?)
}

/// Render an execution message as pretty JSON.
pub fn message_to_json(message: &ExecutionMessage) -> Result<String> {
    Ok(serde_json::to_string_pretty(message)?)
}
