use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Expands `~` and environment variables, then resolves the path if it exists.
pub fn true_path(path: &str) -> Result<PathBuf, String> {
    let expanded = shellexpand::full(path).map_err(|error| error.to_string())?;
    let expanded = PathBuf::from(expanded.as_ref());

    Ok(fs::canonicalize(&expanded).unwrap_or(expanded))
}

pub fn has_extension<P: AsRef<Path>>(extension: &str, file: P) -> bool {
    match file.as_ref().extension() {
        Some(file_extension) => file_extension.eq_ignore_ascii_case(extension),
        None => false,
    }
}

pub fn modified_time<P: AsRef<Path>>(path: P) -> Option<SystemTime> {
    fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

/// Formats a count with comma thousands separators.
pub fn group_thousands(number: usize) -> String {
    let digits = number.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn check_flac_extension_with_smallcase() {
        assert!(has_extension("flac", "test.flac"));
    }

    #[test]
    fn check_flac_extension_with_uppercase() {
        assert!(has_extension("flac", "test.FLAC"));
    }

    #[test]
    fn check_no_flac_extension() {
        assert!(!has_extension("flac", "file.ogg"));
        assert!(!has_extension("flac", "flac"));
    }

    #[test]
    fn group_small_numbers() {
        assert_eq!("0", group_thousands(0));
        assert_eq!("999", group_thousands(999));
    }

    #[test]
    fn group_large_numbers() {
        assert_eq!("1,000", group_thousands(1000));
        assert_eq!("12,345", group_thousands(12345));
        assert_eq!("1,234,567", group_thousands(1234567));
    }

    #[test]
    fn true_path_resolves_existing_file() {
        let file = NamedTempFile::new().unwrap();

        let path = true_path(file.path().to_str().unwrap()).unwrap();

        assert_eq!(fs::canonicalize(file.path()).unwrap(), path);
    }

    #[test]
    fn true_path_keeps_missing_file() {
        assert_eq!(
            PathBuf::from("/no/such/jukebox.sqlite"),
            true_path("/no/such/jukebox.sqlite").unwrap()
        );
    }

    #[test]
    fn modified_time_of_missing_file() {
        assert!(modified_time("/no/such/file").is_none());
    }
}
