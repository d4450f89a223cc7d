use serde::{Deserialize, Serialize};

/// Compression algorithms whose filename suffix the suffix normalizer (C5) must strip.
///
/// Extension lengths are inclusive of the leading dot, matching §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompressionType {
    #[default]
    None,
    Gzip,
    Zstd,
    Lz4,
    Bzip2,
}

impl CompressionType {
    /// Length of the suffix this algorithm appends, including the dot. `None` has no suffix.
    pub fn suffix_len(self) -> usize {
        match self {
            CompressionType::None => 0,
            CompressionType::Gzip => 3,  // ".gz"
            CompressionType::Zstd => 5,  // ".zst"
            CompressionType::Lz4 => 4,   // ".lz4"
            CompressionType::Bzip2 => 4, // ".bz2"
        }
    }
}

/// Length of the encryption suffix (".aes"), additive to any compression suffix.
pub const ENCRYPTION_SUFFIX_LEN: usize = 4;

/// The process-wide (compression, encryption) pair the suffix normalizer is parameterized
/// over. Per the design note in §9, this is injected explicitly rather than read from global
/// state, so the same engine can serve multiple (compression, encryption) configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuffixConfig {
    pub compression: CompressionType,
    pub encryption: bool,
}

impl SuffixConfig {
    pub fn new(compression: CompressionType, encryption: bool) -> Self {
        Self {
            compression,
            encryption,
        }
    }

    /// Total bytes to strip from the end of a relative path to recover its manifest key.
    pub fn strip_len(self) -> usize {
        let mut len = self.compression.suffix_len();
        if self.encryption {
            len += ENCRYPTION_SUFFIX_LEN;
        }
        len
    }
}
