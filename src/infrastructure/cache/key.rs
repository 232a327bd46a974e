//! Cache key generation using SHA-256 digests

use sha2::{Digest, Sha256};

/// Feed one field into the hasher, length-prefixed so adjacent fields can
/// never blur into each other (`"a|b" + "c"` vs `"a" + "b|c"`).
fn update_field(hasher: &mut Sha256, field: &[u8]) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field);
}

/// Generate a deterministic cache key for one completion request.
///
/// The key is a SHA-256 hash of the model, the temperature (including
/// whether it is set at all), and the system/user prompt texts. Equal inputs
/// always produce equal keys; changing any single field produces a
/// different key.
pub fn request_key(model: &str, temperature: Option<f64>, system: &str, user: &str) -> String {
    let mut hasher = Sha256::new();

    update_field(&mut hasher, model.as_bytes());
    match temperature {
        Some(t) => update_field(&mut hasher, format!("temp={t}").as_bytes()),
        None => update_field(&mut hasher, b"temp=none"),
    }
    update_field(&mut hasher, system.as_bytes());
    update_field(&mut hasher, user.as_bytes());

    // Hex-encoded digest doubles as the on-disk file name
    format!("{:x}", hasher.finalize())
}
