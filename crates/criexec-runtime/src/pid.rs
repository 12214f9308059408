//! Pid extraction from the verbose container status.
//!
//! CRI-O returns runtime details as a JSON document stored as a string under
//! the `info` key of the status response's info map. Only `pid` is read from
//! it; every other key is ignored.

use std::collections::HashMap;

use criexec_common::error::{CriExecError, Result};
use nix::unistd::Pid;
use serde::Deserialize;

/// Key of the info map holding the JSON blob.
pub const INFO_KEY: &str = "info";

#[derive(Debug, Deserialize)]
struct InfoBlob {
    pid: Option<serde_json::Number>,
}

/// Integer value of `number`, accepting floats with no fractional part
/// (`4242.0`, `4.242e3`). Values beyond the `i64` range saturate.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn whole_number(number: &serde_json::Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        let value = number.as_f64()?;
        (value.is_finite() && value.trunc() == value)
            .then(|| value.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    })
}

/// Decodes the primary process id of `container_id` from a status info map.
///
/// # Errors
///
/// Returns [`CriExecError::PidResolutionFailed`] when the blob is absent or
/// not valid JSON, when `pid` is missing, not a number or has a fractional
/// part, or when the value is not a positive 32-bit integer (a stopped container reports 0).
pub fn pid_from_info(container_id: &str, info: &HashMap<String, String>) -> Result<Pid> {
    let blob = info
        .get(INFO_KEY)
        .ok_or_else(|| CriExecError::pid(container_id, "status response carries no info blob"))?;

    let decoded: InfoBlob = serde_json::from_str(blob)
        .map_err(|e| CriExecError::pid(container_id, format!("undecodable info blob: {e}")))?;
    let number = decoded
        .pid
        .ok_or_else(|| CriExecError::pid(container_id, "info blob has no pid"))?;

    let raw = whole_number(&number)
        .ok_or_else(|| CriExecError::pid(container_id, format!("pid {number} is not an integer")))?;
    let raw = i32::try_from(raw)
        .map_err(|_| CriExecError::pid(container_id, format!("pid {raw} is out of range")))?;
    if raw <= 0 {
        return Err(CriExecError::pid(
            container_id,
            format!("pid {raw} does not name a live process"),
        ));
    }
    Ok(Pid::from_raw(raw))
}
