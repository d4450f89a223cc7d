//! Read-only dangling-symlink diagnostic.
//!
//! §7 documents that a crashed delete can leave a survivor backup with symlinks pointing at a
//! now-missing victim, and that "administrators must run a separate repair" — left open in §9.
//! This does not attempt the repair (that remains a manual step); it gives that step a
//! concrete, scriptable entry point: a recursive scan reporting every symlink whose target does
//! not resolve.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Lists symlinks under `root` whose target does not resolve (`lstat` succeeds, `stat` fails).
pub fn scan_dangling(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dangling = Vec::new();
    walk(root, &mut dangling);
    Ok(dangling)
}

fn walk(dir: &Path, dangling: &mut Vec<PathBuf>) {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(_) => return,
    };
    for entry in read_dir {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.file_type().is_symlink() {
            if fs::metadata(&path).is_err() {
                dangling.push(path);
            }
        } else if meta.is_dir() {
            walk(&path, dangling);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn reports_dangling_symlink() {
        let dir = tempdir().unwrap();
        symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let found = scan_dangling(dir.path()).unwrap();
        assert_eq!(found, vec![dir.path().join("dangling")]);
    }

    #[test]
    fn does_not_report_a_symlink_whose_target_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.txt"), b"x").unwrap();
        symlink(dir.path().join("real.txt"), dir.path().join("ok")).unwrap();

        let found = scan_dangling(dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn recurses_into_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        symlink(dir.path().join("gone"), dir.path().join("sub/dangling")).unwrap();

        let found = scan_dangling(dir.path()).unwrap();
        assert_eq!(found, vec![dir.path().join("sub/dangling")]);
    }
}
