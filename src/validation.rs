use crate::constants::{OUTPUT_SUFFIX, SUPPORTED_IMAGE_EXTENSIONS};
use crate::error::{CompressionError, Result};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check if the file extension is one the compressor reads (case-insensitive)
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Whether the file name looks like one this tool wrote, e.g. `a_compressed.jpg`.
pub fn is_compressed_output(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
        .unwrap_or(false)
}

pub fn validate_image_extension(path: &Path) -> Result<()> {
    if !is_image_file(path) {
        return Err(CompressionError::UnsupportedFormat(format!(
            "{} is not a PNG or JPEG file",
            path.display()
        )));
    }
    Ok(())
}

/// Stats an input file and returns its size in bytes.
///
/// A missing or unreadable file becomes an `Io` error naming the path, a
/// directory is rejected, and a zero-byte file is `EmptyFile`.
pub fn validate_input_file(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path).map_err(|e| CompressionError::io(path, e))?;

    if !metadata.is_file() {
        return Err(CompressionError::UnsupportedFormat(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(CompressionError::EmptyFile(path.to_path_buf()));
    }

    Ok(metadata.len())
}

/// Expands one user-supplied input into image files.
///
/// Files are returned as-is, and anything that is not a directory is tried
/// as a glob pattern. Directory walks skip hidden entries and earlier
/// `_compressed` outputs, so a folder compressed twice does not pick up the
/// first run's files. Results from directories and globs are sorted so
/// batches are ordered deterministically.
pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let input_path = Path::new(input);

    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }

    let mut image_files = Vec::new();

    if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && is_image_file(path) && !is_compressed_output(path) {
                image_files.push(path.to_path_buf());
            }
        }
    } else {
        let pattern =
            glob(input).map_err(|_| CompressionError::NoImageFilesFound(input.to_string()))?;
        for entry in pattern.flatten() {
            if entry.is_file() && is_image_file(&entry) {
                image_files.push(entry);
            }
        }
    }

    image_files.sort();
    Ok(image_files)
}

/// Splits a mixed list of dropped or typed paths into accepted image files
/// and rejected files. Directories expand to the images inside them.
pub fn partition_inputs<P: AsRef<Path>>(
    paths: &[P],
    recursive: bool,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_file() {
            if is_image_file(path) {
                valid.push(path.to_path_buf());
            } else {
                invalid.push(path.to_path_buf());
            }
        } else {
            let input = path.to_string_lossy();
            let found = collect_image_files(&input, recursive)?;
            if found.is_empty() && !path.is_dir() {
                invalid.push(path.to_path_buf());
            }
            valid.extend(found);
        }
    }

    Ok((valid, invalid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path, data: &[u8]) {
        File::create(path).unwrap().write_all(data).unwrap();
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("test.jpg")));
        assert!(is_image_file(Path::new("test.jpeg")));
        assert!(is_image_file(Path::new("test.png")));
        assert!(is_image_file(Path::new("test.JPG")));
        assert!(is_image_file(Path::new("test.PnG")));

        assert!(!is_image_file(Path::new("test.webp")));
        assert!(!is_image_file(Path::new("test.txt")));
        assert!(!is_image_file(Path::new("test")));
        assert!(!is_image_file(Path::new("png")));
    }

    #[test]
    fn test_validate_input_file_missing() {
        let result = validate_input_file(Path::new("/nonexistent/file.jpg"));
        match result {
            Err(CompressionError::Io { path, source }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/file.jpg"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_input_file_empty() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.png");
        touch(&empty, b"");

        assert!(matches!(
            validate_input_file(&empty),
            Err(CompressionError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_validate_input_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("data.jpg");
        touch(&file, &[0u8; 1024]);

        assert_eq!(validate_input_file(&file).unwrap(), 1024);
    }

    #[test]
    fn test_validate_input_file_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            validate_input_file(temp_dir.path()),
            Err(CompressionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_collect_image_files_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("b.png"), b"x");
        touch(&temp_dir.path().join("a.JPG"), b"x");
        touch(&temp_dir.path().join("notes.txt"), b"x");
        touch(&temp_dir.path().join(".hidden.png"), b"x");

        let files = collect_image_files(&temp_dir.path().to_string_lossy(), false).unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("a.JPG"), temp_dir.path().join("b.png")]
        );
    }

    #[test]
    fn test_collect_image_files_skips_previous_outputs() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("a.jpg"), b"x");
        touch(&temp_dir.path().join("a_compressed.jpg"), b"x");
        touch(&temp_dir.path().join("b_compressed.PNG"), b"x");

        let files = collect_image_files(&temp_dir.path().to_string_lossy(), false).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("a.jpg")]);

        // Named explicitly, an output is still accepted.
        let named = temp_dir.path().join("a_compressed.jpg");
        assert_eq!(
            collect_image_files(&named.to_string_lossy(), false).unwrap(),
            vec![named]
        );
    }

    #[test]
    fn test_collect_image_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        touch(&temp_dir.path().join("top.jpg"), b"x");
        touch(&subdir.join("nested.png"), b"x");

        let input = temp_dir.path().to_string_lossy();
        assert_eq!(collect_image_files(&input, false).unwrap().len(), 1);
        assert_eq!(collect_image_files(&input, true).unwrap().len(), 2);
    }

    #[test]
    fn test_collect_image_files_glob_pattern() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("one.jpg"), b"x");
        touch(&temp_dir.path().join("two.png"), b"x");

        let pattern = format!("{}/*.jpg", temp_dir.path().to_string_lossy());
        let files = collect_image_files(&pattern, false).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("one.jpg")]);
    }

    #[test]
    fn test_partition_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("folder");
        fs::create_dir(&folder).unwrap();
        let image = temp_dir.path().join("photo.jpeg");
        let text = temp_dir.path().join("readme.txt");
        touch(&image, b"x");
        touch(&text, b"x");
        touch(&folder.join("inside.png"), b"x");

        let (valid, invalid) =
            partition_inputs(&[image.clone(), text.clone(), folder.clone()], false).unwrap();
        assert_eq!(valid, vec![image, folder.join("inside.png")]);
        assert_eq!(invalid, vec![text]);
    }
}
