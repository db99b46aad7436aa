// BLOB version prefix helpers. [version: u8][wincode payload].

pub(super) const BLOB_VERSION: u8 = 1;

pub(super) fn with_version_prefix(version: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(version);
    out.extend_from_slice(&payload);
    out
}

/// Payload after version byte. If first byte matches `expected_version`, return rest; else whole blob.
pub(super) fn blob_payload(bytes: &[u8], expected_version: u8) -> &[u8] {
    match bytes.first() {
        Some(v) if *v == expected_version => &bytes[1..],
        _ => bytes,
    }
}

/// Encodes assigned unit ids for the `incidents.assigned_units` column.
pub(super) fn encode_unit_ids(ids: &[String]) -> Result<Vec<u8>, String> {
    let payload = wincode::serialize(&ids.to_vec()).map_err(|e| e.to_string())?;
    Ok(with_version_prefix(BLOB_VERSION, payload))
}

/// Corrupt blobs decode to an empty list and are logged.
pub(super) fn decode_unit_ids(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return vec![];
    }
    wincode::deserialize(blob_payload(bytes, BLOB_VERSION)).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "wincode deserialize assigned_units (corrupt), using empty");
        vec![]
    })
}
