//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a thumbnail URL uses http(s) and a supported image type.
///
/// # Examples
///
/// ```ignore
/// validate_thumbnail_url("https://example.com/q.png") // Ok
/// validate_thumbnail_url("ftp://example.com/q.png")   // Err - scheme
/// validate_thumbnail_url("https://example.com/q.gif") // Err - filetype
/// ```
pub fn validate_thumbnail_url(url: &str) -> Result<(), ValidationError> {
    let lower = url.to_lowercase();

    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        let mut err = ValidationError::new("thumbnail_scheme");
        err.message = Some("Thumbnail URL must start with http:// or https://".into());
        return Err(err);
    }

    if !["jpg", "jpeg", "png"]
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
    {
        let mut err = ValidationError::new("thumbnail_filetype");
        err.message = Some("Thumbnail URL must end in .jpg, .jpeg, or .png".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_thumbnail_url_valid() {
        assert!(validate_thumbnail_url("https://example.com/q.png").is_ok());
        assert!(validate_thumbnail_url("http://example.com/q.jpg").is_ok());
        assert!(validate_thumbnail_url("https://example.com/Q.JPEG").is_ok());
    }

    #[test]
    fn test_validate_thumbnail_url_invalid_scheme() {
        assert!(validate_thumbnail_url("ftp://example.com/q.png").is_err());
        assert!(validate_thumbnail_url("example.com/q.png").is_err());
        assert!(validate_thumbnail_url("").is_err());
    }

    #[test]
    fn test_validate_thumbnail_url_invalid_filetype() {
        assert!(validate_thumbnail_url("https://example.com/q.gif").is_err());
        assert!(validate_thumbnail_url("https://example.com/q").is_err());
    }
}
