use std::env;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// File name of the vocabulary inside an assets directory.
pub const VOCAB_FILE: &str = "vocab.txt";
/// File name of the ONNX model inside an assets directory.
pub const MODEL_FILE: &str = "model.onnx";

/// Environment variable overriding the assets directory.
pub const ASSETS_ENV: &str = "PHISHGUARD_ASSETS";

/// Returns the default directory holding `vocab.txt` and `model.onnx`.
pub fn default_assets_dir() -> PathBuf {
    // 1. Check environment variable
    if let Ok(path) = env::var(ASSETS_ENV) {
        return PathBuf::from(path);
    }

    // 2. Use platform-specific data directory
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("phishguard").join("bert");
    }

    // 3. Fallback to user's home directory
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(".local").join("share").join("phishguard").join("bert");
    }

    // 4. If all else fails, use system temp directory (platform agnostic)
    env::temp_dir().join("phishguard").join("bert")
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_default_assets_dir() {
        // Test with environment variable
        env::set_var(ASSETS_ENV, "/tmp/test-phishguard-assets");
        let path = default_assets_dir();
        assert_eq!(path, PathBuf::from("/tmp/test-phishguard-assets"));
        env::remove_var(ASSETS_ENV);

        // Test without environment variable
        let path = default_assets_dir();
        assert!(path.to_string_lossy().contains("phishguard"));
    }
}
