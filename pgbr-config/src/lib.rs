//! INI-stanza loader producing [`ServerConfig`] values (§ AMBIENT STACK / Configuration).
//!
//! Config-file parsing is out of scope for the core crates (§1); this crate is the thin,
//! separate collaborator SPEC_FULL names, the way `pbs-config` loads section-config files and
//! hands plain structs to `pbs-datastore`. One `[server]` section per PostgreSQL stanza:
//!
//! ```ini
//! [pg1]
//! root = /srv/pgbr
//! worker_threads = 4
//! compression = zstd
//! encryption = true
//! hot_standby = /srv/pgbr/pg1/standby
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use pgbr_api_types::{CompressionType, ServerConfig};

fn parse_compression(value: &str) -> Result<CompressionType> {
    match value.trim().to_ascii_lowercase().as_str() {
        "none" | "" => Ok(CompressionType::None),
        "gzip" | "gz" => Ok(CompressionType::Gzip),
        "zstd" | "zst" => Ok(CompressionType::Zstd),
        "lz4" => Ok(CompressionType::Lz4),
        "bzip2" | "bz2" => Ok(CompressionType::Bzip2),
        other => bail!("unknown compression type {other:?}"),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("not a boolean: {other:?}"),
    }
}

/// Loads every `[server]` stanza in `path` into a [`ServerConfig`], in file order.
pub fn load(path: &Path) -> Result<Vec<ServerConfig>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse(&contents)
}

fn parse(contents: &str) -> Result<Vec<ServerConfig>> {
    let mut servers = Vec::new();
    let mut current: Option<(String, ServerConfig)> = None;

    for (lineno, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if let Some((_, config)) = current.take() {
                servers.push(config);
            }
            current = Some((section.to_string(), ServerConfig::new(section, PathBuf::new())));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            bail!("line {}: expected `key = value`, got {raw_line:?}", lineno + 1);
        };
        let key = key.trim();
        let value = value.trim();

        let Some((name, config)) = current.as_mut() else {
            bail!("line {}: key {key:?} outside of any [server] section", lineno + 1);
        };

        match key {
            "root" => config.root = PathBuf::from(value),
            "worker_threads" => {
                config.worker_threads = value
                    .parse()
                    .with_context(|| format!("stanza {name}: invalid worker_threads"))?;
            }
            "compression" => {
                config.compression = parse_compression(value)
                    .with_context(|| format!("stanza {name}: invalid compression"))?;
            }
            "encryption" => {
                config.encryption = parse_bool(value)
                    .with_context(|| format!("stanza {name}: invalid encryption"))?;
            }
            "hot_standby" => config.hot_standby = Some(PathBuf::from(value)),
            other => bail!("stanza {name}: unknown key {other:?}"),
        }
    }

    if let Some((_, config)) = current.take() {
        servers.push(config);
    }

    Ok(servers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_stanza_with_all_keys() {
        let text = "\
[pg1]
root = /srv/pgbr
worker_threads = 4
compression = zstd
encryption = true
hot_standby = /srv/pgbr/pg1/standby
";
        let servers = parse(text).unwrap();
        assert_eq!(servers.len(), 1);
        let cfg = &servers[0];
        assert_eq!(cfg.server, "pg1");
        assert_eq!(cfg.root, PathBuf::from("/srv/pgbr"));
        assert_eq!(cfg.worker_threads, 4);
        assert_eq!(cfg.compression, CompressionType::Zstd);
        assert!(cfg.encryption);
        assert_eq!(cfg.hot_standby, Some(PathBuf::from("/srv/pgbr/pg1/standby")));
    }

    #[test]
    fn parses_multiple_stanzas_in_file_order() {
        let text = "\
[pg1]
root = /srv/pgbr1

[pg2]
root = /srv/pgbr2
";
        let servers = parse(text).unwrap();
        let names: Vec<&str> = servers.iter().map(|c| c.server.as_str()).collect();
        assert_eq!(names, vec!["pg1", "pg2"]);
    }

    #[test]
    fn missing_optional_keys_keep_server_config_defaults() {
        let text = "[pg1]\nroot = /srv/pgbr\n";
        let servers = parse(text).unwrap();
        assert_eq!(servers[0].worker_threads, 0);
        assert_eq!(servers[0].compression, CompressionType::None);
        assert!(!servers[0].encryption);
        assert!(servers[0].hot_standby.is_none());
    }

    #[test]
    fn key_outside_a_section_is_an_error() {
        let text = "root = /srv/pgbr\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let text = "[pg1]\nbogus = 1\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pgbr.conf");
        fs::write(&path, "[pg1]\nroot = /srv/pgbr\n").unwrap();
        let servers = load(&path).unwrap();
        assert_eq!(servers.len(), 1);
    }
}
