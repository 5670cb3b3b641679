//! Same-stem image lookup and copy.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Image extensions probed for every retained label, in priority order.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// First `images_dir/<stem>.<ext>` that exists as a file.
pub fn find_image<S: AsRef<str>>(images_dir: &Path, stem: &str, extensions: &[S]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| images_dir.join(format!("{stem}.{}", ext.as_ref())))
        .find(|candidate| candidate.is_file())
}

/// Copy `src` into `dest_dir` as `<dest_stem>.<src ext>`. Returns the written path.
pub fn copy_image(src: &Path, dest_dir: &Path, dest_stem: &str) -> std::io::Result<PathBuf> {
    let dest = match src.extension().and_then(|e| e.to_str()) {
        Some(ext) => dest_dir.join(format!("{dest_stem}.{ext}")),
        None => dest_dir.join(dest_stem),
    };
    fs::copy(src, &dest)?;
    Ok(dest)
}

/// Drop `<stem>.<ext>` for every probed extension; used before a colliding write.
///
/// Returns how many existing images could not be removed.
pub(crate) fn remove_stale_images<S: AsRef<str>>(
    dest_dir: &Path,
    stem: &str,
    extensions: &[S],
) -> usize {
    let mut failed = 0;
    for ext in extensions {
        let path = dest_dir.join(format!("{stem}.{}", ext.as_ref()));
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not remove stale image");
                failed += 1;
            }
        }
    }
    failed
}
