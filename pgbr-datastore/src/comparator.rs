//! Byte-identity check between two regular files (C3).

use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Returns whether `a` and `b` contain exactly the same bytes.
///
/// Short-circuits on size mismatch without reading content, then streams both files in
/// matching-sized chunks. Any I/O error on either side is treated as "cannot confirm
/// equality" and yields `false` rather than propagating (§4.3, §7) — callers must leave the
/// files untouched in that case, never delete on an unconfirmed comparison.
pub fn compare_files(a: &Path, b: &Path) -> bool {
    let (mut fa, mut fb) = match (File::open(a), File::open(b)) {
        (Ok(fa), Ok(fb)) => (fa, fb),
        _ => return false,
    };

    let (meta_a, meta_b) = match (fa.metadata(), fb.metadata()) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return false,
    };
    if meta_a.len() != meta_b.len() {
        return false;
    }

    let mut buf_a = [0u8; CHUNK_SIZE];
    let mut buf_b = [0u8; CHUNK_SIZE];
    loop {
        let read_a = match fa.read(&mut buf_a) {
            Ok(n) => n,
            Err(_) => return false,
        };
        let read_b = match fb.read(&mut buf_b) {
            Ok(n) => n,
            Err(_) => return false,
        };
        if read_a != read_b {
            return false;
        }
        if read_a == 0 {
            return true;
        }
        if buf_a[..read_a] != buf_b[..read_b] {
            return false;
        }
    }
}
