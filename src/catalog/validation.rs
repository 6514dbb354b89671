//! Validation for catalog inputs, run before anything reaches the database.

use super::models::{ArtistInput, SongInput, StoreInput, TitledInput};
use std::fmt;

pub const ALLOWED_IRI_SCHEMES: &[&str] = &["http", "https", "file", "ftp", "ftps", "s3"];

#[derive(Debug, PartialEq)]
pub enum ValidationError {
    EmptyField { field: &'static str },
    NegativeValue { field: &'static str },
    InvalidIri { iri: String },
    UnsupportedScheme { scheme: String },
    OutOfRange { field: &'static str, min: i64, max: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' is required but was empty", field)
            }
            ValidationError::NegativeValue { field } => {
                write!(f, "Field '{}' must be non-negative", field)
            }
            ValidationError::InvalidIri { iri } => write!(f, "'{}' is not a valid IRI", iri),
            ValidationError::UnsupportedScheme { scheme } => write!(
                f,
                "IRI scheme '{}' is not supported (allowed: {})",
                scheme,
                ALLOWED_IRI_SCHEMES.join(", ")
            ),
            ValidationError::OutOfRange { field, min, max } => {
                write!(f, "Field '{}' must be between {} and {}", field, min, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub fn validate_titled(input: &TitledInput) -> ValidationResult<()> {
    if input.title.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "title" });
    }
    Ok(())
}

/// An artist needs at least one of alias, first or last name.
pub fn validate_artist(input: &ArtistInput) -> ValidationResult<()> {
    let all_empty = [&input.alias, &input.first_name, &input.last_name]
        .iter()
        .all(|s| s.trim().is_empty());
    if all_empty {
        return Err(ValidationError::EmptyField { field: "alias" });
    }
    Ok(())
}

pub fn validate_song(input: &SongInput) -> ValidationResult<()> {
    if input.title.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "title" });
    }
    Ok(())
}

pub fn validate_iri(iri: &str) -> ValidationResult<()> {
    let Some((scheme, rest)) = iri.split_once(':') else {
        return Err(ValidationError::InvalidIri {
            iri: iri.to_string(),
        });
    };
    let valid_scheme = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme || rest.is_empty() || iri.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidIri {
            iri: iri.to_string(),
        });
    }
    let scheme = scheme.to_ascii_lowercase();
    if !ALLOWED_IRI_SCHEMES.contains(&scheme.as_str()) {
        return Err(ValidationError::UnsupportedScheme { scheme });
    }
    Ok(())
}

pub fn validate_store(input: &StoreInput) -> ValidationResult<()> {
    validate_iri(&input.iri)?;
    if matches!(input.file_size, Some(size) if size < 0) {
        return Err(ValidationError::NegativeValue { field: "file_size" });
    }
    if matches!(input.length, Some(length) if length < 0.0) {
        return Err(ValidationError::NegativeValue { field: "length" });
    }
    Ok(())
}

/// Ratings go from 1 to 5 stars.
pub fn validate_rating_value(value: i64) -> ValidationResult<u8> {
    if !(1..=5).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "value",
            min: 1,
            max: 5,
        });
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_schemes() {
        assert!(validate_iri("file:///srv/music/a.ogg").is_ok());
        assert!(validate_iri("s3://bucket/songs/abc.ogg").is_ok());
        assert!(validate_iri("HTTPS://example.com/a.mp3").is_ok());
        assert_eq!(
            validate_iri("gopher://host/a"),
            Err(ValidationError::UnsupportedScheme {
                scheme: "gopher".to_string()
            })
        );
        assert!(matches!(
            validate_iri("/srv/music/a.ogg"),
            Err(ValidationError::InvalidIri { .. })
        ));
        assert!(matches!(
            validate_iri("file:///with space.ogg"),
            Err(ValidationError::InvalidIri { .. })
        ));
    }

    #[test]
    fn store_rejects_negative_sizes() {
        let input = StoreInput {
            iri: "file:///a.ogg".to_string(),
            file_size: Some(-1),
            ..Default::default()
        };
        assert_eq!(
            validate_store(&input),
            Err(ValidationError::NegativeValue { field: "file_size" })
        );
    }

    #[test]
    fn artist_needs_a_name() {
        assert!(validate_artist(&ArtistInput::default()).is_err());
        assert!(validate_artist(&ArtistInput {
            alias: "Zircon".to_string(),
            ..Default::default()
        })
        .is_ok());
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating_value(0).is_err());
        assert_eq!(validate_rating_value(5), Ok(5));
        assert!(validate_rating_value(6).is_err());
    }
}
