use thiserror::Error;

use crate::project::ProjectMetadata;

/// `^[a-z][a-z0-9-._]*$`
pub fn is_valid_artifact_id(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    first.is_ascii_lowercase()
        && chars.all(|ch| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '-' | '.' | '_')
        })
}

/// Dot-separated Java identifiers, e.g. `org.acme` or `$io._internal`.
pub fn is_valid_group_id(value: &str) -> bool {
    !value.is_empty() && value.split('.').all(is_java_identifier)
}

fn is_java_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    is_identifier_start(first) && chars.all(|ch| is_identifier_start(ch) || ch.is_ascii_digit())
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

pub fn validate_metadata(metadata: &ProjectMetadata) -> Result<(), ValidationError> {
    if !is_valid_group_id(&metadata.group_id) {
        return Err(ValidationError::InvalidGroupId(metadata.group_id.clone()));
    }
    if !is_valid_artifact_id(&metadata.artifact_id) {
        return Err(ValidationError::InvalidArtifactId(
            metadata.artifact_id.clone(),
        ));
    }
    if metadata.version.is_empty() {
        return Err(ValidationError::MissingVersion);
    }

    Ok(())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid group id: {0}")]
    InvalidGroupId(String),
    #[error("invalid artifact id: {0} (expected lowercase letters, digits, '-', '.' or '_')")]
    InvalidArtifactId(String),
    #[error("version must not be empty")]
    MissingVersion,
}
