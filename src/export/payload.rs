use serde::Serialize;

use super::ExportError;

pub(super) fn build_json_payload<T: Serialize>(report: &T) -> Result<Vec<u8>, ExportError> {
    let mut body = serde_json::to_vec_pretty(report).map_err(ExportError::Serialize)?;
    body.push(b'\n');
    Ok(body)
}
