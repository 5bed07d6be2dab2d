//! # Validation Utilities
//!
//! Input checks for RPC endpoints and public keys. None of these touch the network.

/// Whether a URL string mentions an http(s) scheme at all.
pub fn has_http_scheme(url: &str) -> bool {
    url.contains("http")
}

/// Normalize user input for a custom RPC endpoint to an `https://` URL.
///
/// Any leading `http://` or `https://` is stripped before `https://` is prefixed.
pub fn normalize_rpc_url(input: &str) -> String {
    let trimmed = input.trim();
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    format!("https://{}", host)
}

/// Whether `value` is base58 text decoding to a 32-byte public key.
pub fn is_pubkey_format(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.len() > 44 {
        return false;
    }
    matches!(bs58::decode(value).into_vec(), Ok(bytes) if bytes.len() == 32)
}
