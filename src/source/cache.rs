use std::fs;
use std::path::PathBuf;

/// File-per-key cache of fetched content under the user data dir, so
/// re-selecting a file after a restart costs no network round trip.
pub struct DiskCache {
    base_dir: PathBuf,
}

impl DiskCache {
    pub fn new(subdir: &str) -> Option<Self> {
        let base = dirs::data_dir()?.join("labtype").join(subdir);
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Option<Self> {
        fs::create_dir_all(&base_dir).ok()?;
        Some(Self { base_dir })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.base_dir.join(sanitize_key(key))).ok()
    }

    pub fn put(&self, key: &str, content: &str) -> bool {
        fs::write(self.base_dir.join(sanitize_key(key)), content).is_ok()
    }
}

/// Flatten an identifier (typically a repo-relative path) into a single
/// safe file name.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
