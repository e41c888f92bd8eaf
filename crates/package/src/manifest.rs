use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use zenith_project::{write_atomic, ProjectLayout};

use crate::PackageError;

/// Binary name recorded in every manifest.
pub const MANIFEST_BINARY: &str = "app";

/// Application metadata stored as `manifest.json` inside the archive.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub binary: String,
}

impl Manifest {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            author: author.into(),
            description: description.into(),
            binary: MANIFEST_BINARY.to_string(),
        }
    }

    /// Pretty JSON with four-space indentation and a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        buffer.push(b'\n');
        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Writes `manifest.json` at the project root, replacing any previous one.
pub fn write_manifest(
    layout: &ProjectLayout,
    manifest: &Manifest,
) -> Result<PathBuf, PackageError> {
    let path = layout.manifest();
    let json = manifest.to_json()?;
    write_atomic(&path, json.as_bytes()).map_err(|source| PackageError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), name = %manifest.name, "manifest written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_keep_declaration_order() {
        let manifest = Manifest::new("Demo", "1.0", "me", "A demo");
        assert_eq!(
            manifest.to_json().unwrap(),
            "{\n    \"name\": \"Demo\",\n    \"version\": \"1.0\",\n    \"author\": \"me\",\n    \"description\": \"A demo\",\n    \"binary\": \"app\"\n}\n"
        );
    }

    #[test]
    fn special_characters_survive_a_round_trip() {
        let manifest = Manifest::new("Say \"hi\"", "2.0\\beta", "a\tb", "line one\nline two");
        let json = manifest.to_json().unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }
}
