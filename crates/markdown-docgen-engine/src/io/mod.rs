use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid docs directory: {0}")]
    InvalidDocsDir(String),
}

/// Read a file below `root` and return its content
pub fn read_file(relative_path: &RelativePath, root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content to a file, creating parent directories as needed
pub fn write_file(relative_path: &RelativePath, root: &Path, content: &str) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Scan for markdown files below a locale directory, sorted by path
pub fn scan_markdown_files(locale_dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !locale_dir.exists() {
        return Err(IoError::InvalidDocsDir(format!(
            "locale directory not found: {}",
            locale_dir.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(locale_dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_docs_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidDocsDir(format!(
            "Directory does not exist: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Modification time of a file.
pub fn modified_time(path: &Path) -> Result<SystemTime, IoError> {
    Ok(fs::metadata(path)?.modified()?)
}

/// The document key of a markdown file: its path relative to the locale
/// directory, `/`-separated, without the `.md` extension.
///
/// Returns `None` for paths outside `locale_dir` or not representable as a
/// relative path.
pub fn document_key(locale_dir: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(locale_dir).ok()?;
    let relative = RelativePathBuf::from_path(relative).ok()?;
    let key = relative.with_extension("");
    let key = key.as_str();
    (!key.is_empty()).then(|| key.to_string())
}
