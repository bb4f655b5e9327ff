//! Unified test utilities for codecsweep benchmarks and tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test data generation patterns
#[derive(Debug, Clone, Copy)]
pub enum TestDataPattern {
    /// All zeros - highly compressible
    Zeros,
    /// Random data - incompressible
    Random,
    /// Mixed compressible/incompressible data
    Mixed,
    /// Repeating English-like text
    Text,
}

impl TestDataPattern {
    /// Every pattern, for parameterized tests
    pub const ALL: [TestDataPattern; 4] = [Self::Zeros, Self::Random, Self::Mixed, Self::Text];
}

const TEXT_CORPUS: &str = "The quick brown fox jumps over the lazy dog. \
    Pack my box with five dozen liquor jugs. \
    How vexingly quick daft zebras jump! \
    Sphinx of black quartz, judge my vow. ";

/// Generate test data with specified pattern
///
/// The output is deterministic so benchmark runs are comparable.
pub fn generate_test_data(size: usize, pattern: TestDataPattern) -> Vec<u8> {
    match pattern {
        TestDataPattern::Zeros => vec![0u8; size],
        TestDataPattern::Random => {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};

            let mut data = Vec::with_capacity(size);
            let mut hasher = DefaultHasher::new();

            for i in 0..size {
                i.hash(&mut hasher);
                data.push((hasher.finish() % 256) as u8);
            }
            data
        }
        TestDataPattern::Mixed => {
            let mut data = Vec::with_capacity(size);
            for i in 0..size {
                if i % 1000 < 100 {
                    data.push(0);
                } else if i % 1000 < 200 {
                    data.push(255);
                } else {
                    data.push(((i * 7 + 13) % 256) as u8);
                }
            }
            data
        }
        TestDataPattern::Text => TEXT_CORPUS.bytes().cycle().take(size).collect(),
    }
}

/// Create a temporary file with test data
pub fn create_test_file(
    temp_dir: &TempDir,
    name: &str,
    size: usize,
    pattern: TestDataPattern,
) -> PathBuf {
    let file_path = temp_dir.path().join(name);
    let data = generate_test_data(size, pattern);
    fs::write(&file_path, data).expect("Failed to write test file");
    file_path
}

/// Common input sizes for benchmarks
pub struct CommonFileSizes;

impl CommonFileSizes {
    /// 1KB
    pub const TINY: usize = 1024;
    /// 4KB
    pub const SMALL: usize = 4 * 1024;
    /// 64KB
    pub const MEDIUM: usize = 64 * 1024;

    /// Sizes suitable for per-call benchmarks
    pub fn micro() -> Vec<(&'static str, usize)> {
        vec![
            ("1KB", Self::TINY),
            ("4KB", Self::SMALL),
            ("64KB", Self::MEDIUM),
        ]
    }
}
