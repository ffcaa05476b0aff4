use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Maximum template file size (1MB)
const MAX_TEMPLATE_SIZE: u64 = 1024 * 1024;

/// Validates instruction templates before processing.
pub(crate) struct TemplateValidator;

impl TemplateValidator {
    /// Validates a template file.
    ///
    /// Performs the following checks:
    /// 1. File exists and is a regular file
    /// 2. File size is within limits
    /// 3. File is readable UTF-8 and not blank
    ///
    /// Marker syntax is deliberately not validated here: unmatched or
    /// malformed markers are a non-fatal, post-resolution concern.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File doesn't exist or can't be read
    /// - File is too large
    /// - File is empty or whitespace-only
    pub(crate) fn validate_template(path: &Path) -> Result<()> {
        // 1. Check file exists
        if !path.exists() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "Template file not found"),
            ));
        }

        if !path.is_file() {
            return Err(Error::template_validation(
                path.to_string_lossy().to_string(),
                "Path is not a file",
            ));
        }

        // 2. Check file size
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if metadata.len() > MAX_TEMPLATE_SIZE {
            return Err(Error::template_validation(
                path.to_string_lossy().to_string(),
                format!(
                    "Template file too large: {} bytes (max: {} bytes)",
                    metadata.len(),
                    MAX_TEMPLATE_SIZE
                ),
            ));
        }

        // 3. Read template content
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        if content.trim().is_empty() {
            return Err(Error::template_validation(
                path.to_string_lossy().to_string(),
                "Template file is empty",
            ));
        }

        Ok(())
    }
}

/// Collects residual `{{...}}` markers left in resolved output.
///
/// Used after resolution to surface placeholders or conditional markers
/// that were never consumed, e.g. because the response set is missing a
/// key or a block's markers were mismatched. Returned markers are
/// deduplicated in order of first appearance. An empty result means the
/// output is clean.
#[must_use]
pub fn find_unresolved_markers(output: &str) -> Vec<String> {
    let mut markers: Vec<String> = Vec::new();
    let mut rest = output;

    while let Some(start) = rest.find("{{") {
        let tail = &rest[start + 2..];
        let Some(end) = tail.find("}}") else {
            break;
        };

        let inner = &tail[..end];
        if let Some(nested) = inner.rfind("{{") {
            // Report the innermost brace pair.
            rest = &rest[start + 2 + nested..];
            continue;
        }

        let marker = &rest[start..start + end + 4];
        if !markers.iter().any(|m| m == marker) {
            markers.push(marker.to_string());
        }
        rest = &rest[start + end + 4..];
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_validate_valid_template() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("python.md");
        template_file
            .write_str("# Instructions\n\nUse {{PACKAGE_MANAGER}}.\n")
            .unwrap();

        assert!(TemplateValidator::validate_template(template_file.path()).is_ok());
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let result = TemplateValidator::validate_template(Path::new("/nonexistent/template.md"));
        assert!(result.is_err());
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_validate_directory_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = TemplateValidator::validate_template(temp.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a file"));
    }

    #[test]
    fn test_validate_empty_template() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("empty.md");
        template_file.write_str("   \n  \n  ").unwrap();

        let result = TemplateValidator::validate_template(template_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_file_too_large() {
        let temp = assert_fs::TempDir::new().unwrap();
        let template_file = temp.child("large.md");

        let large_content = "x".repeat((MAX_TEMPLATE_SIZE + 1) as usize);
        template_file.write_str(&large_content).unwrap();

        let result = TemplateValidator::validate_template(template_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[test]
    fn test_clean_output_has_no_markers() {
        assert!(find_unresolved_markers("# Done\n\nUse uv.\n").is_empty());
    }

    #[test]
    fn test_finds_leftover_placeholder() {
        let markers = find_unresolved_markers("Use {{PACKAGE_MANAGER}} here.");
        assert_eq!(markers, vec!["{{PACKAGE_MANAGER}}"]);
    }

    #[test]
    fn test_finds_leftover_conditional_markers() {
        let markers =
            find_unresolved_markers("{{#if_linter_ruff}}text{{/if_linter_flake8}} trailing");
        assert_eq!(
            markers,
            vec!["{{#if_linter_ruff}}", "{{/if_linter_flake8}}"]
        );
    }

    #[test]
    fn test_markers_deduplicated() {
        let markers = find_unresolved_markers("{{X}} and {{X}} and {{Y}}");
        assert_eq!(markers, vec!["{{X}}", "{{Y}}"]);
    }

    #[test]
    fn test_unclosed_braces_ignored() {
        assert!(find_unresolved_markers("dangling {{ braces").is_empty());
    }
}
