use std::path::{Path, PathBuf};

pub fn path_str(path: &Path) -> String {
    path.display().to_string()
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path_str(path))
}

/// Relative paths are resolved against `root` when it is provided.
pub fn resolve_path(root: Option<&Path>, p: &str) -> PathBuf {
    let path = Path::new(p);
    match root {
        Some(r) if path.is_relative() => r.join(path),
        _ => path.to_path_buf(),
    }
}

/// The county index at the start of a file name: `010-Ben_Hill.xml` -> 10.
pub fn file_index(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    let digits: &str = name.split(|c: char| !c.is_ascii_digit()).next()?;
    if digits.is_empty() {
        return None;
    }
    digits.parse::<usize>().ok()
}
