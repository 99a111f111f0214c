/// Result of validating an uploaded filename.
#[derive(Debug)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename contains path traversal patterns (`..`).
    PathTraversal,
    /// Filename contains null bytes.
    NullByte,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Filename has no extension.
    MissingExtension,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '..' is not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::MissingExtension => "Invalid filename: an extension is required",
        }
    }
}

/// Validates an uploaded filename: flat (no directory components), no
/// control characters, and carrying an extension the assigned name can keep.
pub fn validate_upload_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    if trimmed.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    // Reject ASCII control characters to prevent
    // HTTP header injection (e.g. CRLF in logged values).
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if trimmed == ".." {
        return Err(FilenameError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    if extension(trimmed).is_none() {
        return Err(FilenameError::MissingExtension);
    }

    Ok(trimmed)
}

/// Extension of a flat filename, without the dot. `None` when there is no
/// extension or the name is all extension (e.g. `archive.`, `jar`).
pub fn extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_archive_names() {
        assert!(validate_upload_filename("my-mod.jar").is_ok());
        assert!(validate_upload_filename("Mod_1.2.3.jar").is_ok());
        assert!(validate_upload_filename("  padded.jar  ").is_ok());
    }

    #[test]
    fn rejects_empty_names() {
        assert!(matches!(
            validate_upload_filename(""),
            Err(FilenameError::Empty)
        ));
        assert!(matches!(
            validate_upload_filename("   "),
            Err(FilenameError::Empty)
        ));
    }

    #[test]
    fn rejects_path_separators() {
        assert!(matches!(
            validate_upload_filename("mods/evil.jar"),
            Err(FilenameError::ContainsPathSeparator)
        ));
        assert!(matches!(
            validate_upload_filename("mods\\evil.jar"),
            Err(FilenameError::ContainsPathSeparator)
        ));
    }

    #[test]
    fn rejects_traversal_and_hidden_names() {
        assert!(matches!(
            validate_upload_filename(".."),
            Err(FilenameError::PathTraversal)
        ));
        assert!(matches!(
            validate_upload_filename(".hidden.jar"),
            Err(FilenameError::Hidden)
        ));
    }

    #[test]
    fn rejects_control_characters_and_null_bytes() {
        assert!(matches!(
            validate_upload_filename("a\r\nb.jar"),
            Err(FilenameError::ControlCharacter)
        ));
        assert!(matches!(
            validate_upload_filename("a\0b.jar"),
            Err(FilenameError::NullByte)
        ));
    }

    #[test]
    fn requires_an_extension() {
        assert!(matches!(
            validate_upload_filename("archive"),
            Err(FilenameError::MissingExtension)
        ));
        assert!(matches!(
            validate_upload_filename("archive."),
            Err(FilenameError::MissingExtension)
        ));
    }

    #[test]
    fn extension_takes_the_last_component() {
        assert_eq!(extension("mod.jar"), Some("jar"));
        assert_eq!(extension("archive.tar.gz"), Some("gz"));
        assert_eq!(extension("no_ext"), None);
        assert_eq!(extension(".hidden"), None);
    }
}
