//! Strips compression/encryption suffixes from relative paths to match manifest keys (C5).

use std::path::{Path, PathBuf};

use pgbr_api_types::SuffixConfig;

/// Strips the trailing extension(s) `config` says the compression/encryption pipeline would
/// have added, returning a freshly allocated path. Idempotent: running it again on an
/// already-trimmed path is a no-op, because a trimmed path no longer ends in that suffix.
///
/// Per the design note in §9, `config` is an explicit parameter rather than global state, so
/// the same normalizer can serve multiple (compression, encryption) pairs reentrantly.
pub fn trim_suffix(path: &Path, config: SuffixConfig) -> PathBuf {
    let strip_len = config.strip_len();
    if strip_len == 0 {
        return path.to_path_buf();
    }

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return path.to_path_buf();
    };
    if name.len() <= strip_len {
        return path.to_path_buf();
    }

    let trimmed_name = &name[..name.len() - strip_len];
    match path.parent() {
        Some(parent) if parent != Path::new("") => parent.join(trimmed_name),
        _ => PathBuf::from(trimmed_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgbr_api_types::CompressionType;

    #[test]
    fn strips_gzip_suffix() {
        let cfg = SuffixConfig::new(CompressionType::Gzip, false);
        assert_eq!(
            trim_suffix(Path::new("x/y.dat.gz"), cfg),
            PathBuf::from("x/y.dat")
        );
    }

    #[test]
    fn strips_compression_and_encryption_additively() {
        let cfg = SuffixConfig::new(CompressionType::Zstd, true);
        assert_eq!(
            trim_suffix(Path::new("x/y.dat.zst.aes"), cfg),
            PathBuf::from("x/y.dat")
        );
    }

    #[test]
    fn no_compression_no_encryption_is_identity() {
        let cfg = SuffixConfig::new(CompressionType::None, false);
        assert_eq!(
            trim_suffix(Path::new("x/y.dat"), cfg),
            PathBuf::from("x/y.dat")
        );
    }

    #[test]
    fn idempotent_on_already_trimmed_input() {
        let cfg = SuffixConfig::new(CompressionType::Lz4, false);
        let once = trim_suffix(Path::new("x/y.dat.lz4"), cfg);
        let twice = trim_suffix(&once, cfg);
        assert_eq!(once, twice);
    }
}
