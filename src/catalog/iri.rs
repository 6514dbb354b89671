//! Conversions between local paths and `file://` IRIs.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Percent-encodes every path segment of an absolute path into a `file://` IRI.
pub fn path_to_iri<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.is_absolute() {
        bail!("Cannot build an IRI from relative path {}", path.display());
    }
    let Some(text) = path.to_str() else {
        bail!("Path {} is not valid UTF-8", path.display());
    };
    let encoded = text
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Ok(format!("file://{}", encoded))
}

pub fn iri_to_path(iri: &str) -> Result<PathBuf> {
    let Some(rest) = iri.strip_prefix("file://") else {
        bail!("{} is not a file IRI", iri);
    };
    let decoded = urlencoding::decode(rest)?;
    Ok(PathBuf::from(decoded.into_owned()))
}

/// Accepts either an IRI or a bare absolute path.
pub fn to_iri(location: &str) -> Result<String> {
    if location.contains("://") {
        Ok(location.to_string())
    } else {
        path_to_iri(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_special_characters() {
        let iri = path_to_iri("/srv/music/Chrono Trigger/01 - Présage.ogg").unwrap();
        assert_eq!(
            iri,
            "file:///srv/music/Chrono%20Trigger/01%20-%20Pr%C3%A9sage.ogg"
        );
        assert_eq!(
            iri_to_path(&iri).unwrap(),
            PathBuf::from("/srv/music/Chrono Trigger/01 - Présage.ogg")
        );
    }

    #[test]
    fn rejects_relative_paths_and_foreign_schemes() {
        assert!(path_to_iri("music/a.ogg").is_err());
        assert!(iri_to_path("s3://bucket/a.ogg").is_err());
    }

    #[test]
    fn keeps_existing_iris() {
        assert_eq!(to_iri("s3://bucket/a.ogg").unwrap(), "s3://bucket/a.ogg");
        assert_eq!(to_iri("/a b.ogg").unwrap(), "file:///a%20b.ogg");
    }
}
