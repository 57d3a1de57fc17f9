use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Immediate child files of `folder` with the given extension, sorted by file name.
///
/// A missing directory yields an empty list and a warning; the other collection can
/// still produce output.
pub fn discover_files(folder: &Path, extension: &str) -> Vec<PathBuf> {
    if !folder.is_dir() {
        warn!(path = %folder.display(), "collection directory not found");
        return Vec::new();
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        if has_extension(entry.path(), extension) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable_by(|left, right| left.file_name().cmp(&right.file_name()));
    files
}

#[cfg(test)]
mod tests {
    use super::discover_files;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discover_files_is_flat() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let base = dir.path();
        let nested = base.join("nested");
        fs::create_dir(&nested)?;

        fs::write(base.join("b.pdf"), b"%PDF-1.4\n%fake")?;
        fs::write(base.join("A.PDF"), b"%PDF-1.4\n%fake")?;
        fs::write(base.join("notes.html"), b"<p>x</p>")?;
        fs::write(nested.join("c.pdf"), b"%PDF-1.4\n%fake")?;

        let files = discover_files(base, "pdf");
        let names = files
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let files = discover_files(&dir.path().join("absent"), "html");
        assert!(files.is_empty());
        Ok(())
    }

    #[test]
    fn directories_named_like_files_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("archive.html"))?;
        fs::write(dir.path().join("log_01_02_2024.html"), b"<p>x</p>")?;

        let files = discover_files(dir.path(), "html");
        assert_eq!(files.len(), 1);
        Ok(())
    }
}
