//! Input loading

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Read the whole input file into memory
pub fn load_input(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    info!("Loaded {} bytes from {}", data.len(), path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_input_reads_all_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abcabcabc").unwrap();

        assert_eq!(load_input(file.path()).unwrap(), b"abcabcabc");
    }

    #[test]
    fn test_missing_input_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.bin");

        let error = load_input(&path).unwrap_err();
        assert!(format!("{:#}", error).contains("nope.bin"));
    }
}
