//! Recursive pre-order directory traversal producing `(from, to)` path pairs (C2).
//!
//! Expressed as a driver function taking a `visit` callback rather than the worker-input/
//! function-pointer record the distilled spec describes (§9's design note: "express as an
//! iterator yielding (from, to, kind) triples; the driver decides whether to execute each
//! triple inline or post it to a thread pool"). Paths are built with [`Path::join`], never by
//! hand-concatenating strings, so the "guaranteed single `/` separator" requirement in §4.1 is
//! just what `Path::join` already does.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Error;

/// One `(from, to)` pair the walker produced for a non-directory entry.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Whether directory recursion classifies entries by `stat` (follow symlinks) or `lstat`
/// (don't). Only Mode RELINK uses `Lstat`, so that a symlink encountered under the walked root
/// is carried through to the per-file action as a link rather than silently resolved (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkResolution {
    Stat,
    Lstat,
}

enum Classify {
    Dir,
    NonDir,
    Missing,
}

fn classify(path: &Path, resolution: LinkResolution) -> Classify {
    let meta = match resolution {
        LinkResolution::Stat => fs::metadata(path),
        LinkResolution::Lstat => fs::symlink_metadata(path),
    };
    match meta {
        Ok(meta) if meta.is_dir() => Classify::Dir,
        Ok(_) => Classify::NonDir,
        Err(_) => Classify::Missing,
    }
}

/// Walks `from_root`, mirroring each relative path under `to_root`, skipping the names in
/// `skip` (plus `.`/`..`, which are never yielded by `read_dir` in the first place). `visit`
/// is called once per non-directory entry; a worker-pool-backed `visit` makes the per-file
/// action run in parallel, an inline closure makes it run on the walker's own thread.
///
/// An unreadable directory silently prunes that frame (§4.1, §7): sibling frames, and the
/// caller, see nothing but a traversal that covered less ground than the tree on disk.
pub fn walk(
    from_root: &Path,
    to_root: &Path,
    skip: &HashSet<&str>,
    resolution: LinkResolution,
    visit: &mut dyn FnMut(WalkEntry) -> Result<(), Error>,
) -> Result<(), Error> {
    walk_dir(from_root, to_root, skip, resolution, visit)
}

fn walk_dir(
    from_dir: &Path,
    to_dir: &Path,
    skip: &HashSet<&str>,
    resolution: LinkResolution,
    visit: &mut dyn FnMut(WalkEntry) -> Result<(), Error>,
) -> Result<(), Error> {
    let read_dir = match fs::read_dir(from_dir) {
        Ok(read_dir) => read_dir,
        Err(_) => return Ok(()),
    };

    let mut names = Vec::new();
    for entry in read_dir {
        let Ok(entry) = entry else { continue };
        let name = entry.file_name();
        if let Some(name_str) = name.to_str() {
            if skip.contains(name_str) {
                continue;
            }
        }
        names.push(name);
    }

    // Pre-order: every subdirectory is fully traversed before this level dispatches its own
    // file actions (§5) — descendant actions may then run concurrently with ancestor actions.
    for name in &names {
        let from = from_dir.join(name);
        if matches!(classify(&from, resolution), Classify::Dir) {
            let to = to_dir.join(name);
            walk_dir(&from, &to, skip, resolution, visit)?;
        }
    }

    for name in &names {
        let from = from_dir.join(name);
        match classify(&from, resolution) {
            Classify::NonDir => {
                let to = to_dir.join(name);
                visit(WalkEntry { from, to })?;
            }
            Classify::Dir | Classify::Missing => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn yields_nested_files_in_preorder_without_dotdirs() {
        let from = tempdir().unwrap();
        let to = tempdir().unwrap();
        fs::create_dir_all(from.path().join("sub")).unwrap();
        fs::write(from.path().join("a.txt"), b"a").unwrap();
        fs::write(from.path().join("sub/b.txt"), b"b").unwrap();

        let mut seen = Vec::new();
        walk(
            from.path(),
            to.path(),
            &HashSet::new(),
            LinkResolution::Stat,
            &mut |entry| {
                seen.push(entry.from.file_name().unwrap().to_str().unwrap().to_string());
                Ok(())
            },
        )
        .unwrap();

        seen.sort();
        assert_eq!(seen, vec!["a.txt".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn skip_set_excludes_named_entries() {
        let from = tempdir().unwrap();
        let to = tempdir().unwrap();
        fs::create_dir_all(from.path().join("pg_tblspc")).unwrap();
        fs::write(from.path().join("pg_tblspc/ignored.txt"), b"x").unwrap();
        fs::write(from.path().join("kept.txt"), b"y").unwrap();

        let mut seen = Vec::new();
        let skip: HashSet<&str> = ["pg_tblspc"].into_iter().collect();
        walk(
            from.path(),
            to.path(),
            &skip,
            LinkResolution::Stat,
            &mut |entry| {
                seen.push(entry.from.file_name().unwrap().to_str().unwrap().to_string());
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen, vec!["kept.txt".to_string()]);
    }

    #[test]
    fn unreadable_directory_is_pruned_silently() {
        let from = tempdir().unwrap();
        let to = tempdir().unwrap();
        fs::write(from.path().join("a.txt"), b"a").unwrap();

        // A "directory" entry that isn't actually readable as one (missing) should not
        // surface an error — just be skipped.
        let missing_to = to.path().join("does-not-exist");

        let mut count = 0;
        walk(
            from.path(),
            &missing_to,
            &HashSet::new(),
            LinkResolution::Stat,
            &mut |_entry| {
                count += 1;
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(count, 1);
    }
}
