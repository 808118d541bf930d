use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use std::path::{Path, PathBuf};

/// Returns true when the path has one of the supported source image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Folder the output directory picker starts in: next to the source image.
pub fn initial_output_dir(source: &Path) -> Option<PathBuf> {
    source
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_match_case_insensitively() {
        assert!(is_supported_image(Path::new("mosaic.PNG")));
        assert!(is_supported_image(Path::new("/tmp/a.jpeg")));
        assert!(is_supported_image(Path::new("b.webp")));
        assert!(!is_supported_image(Path::new("c.gif")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn output_dir_defaults_to_source_folder() {
        assert_eq!(
            initial_output_dir(Path::new("/photos/mosaic.png")),
            Some(PathBuf::from("/photos"))
        );
        assert_eq!(initial_output_dir(Path::new("mosaic.png")), None);
    }
}
