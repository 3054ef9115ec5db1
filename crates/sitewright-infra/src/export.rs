//! Downloadable site archive.
//!
//! A zip holding `app.jsx`, the standalone `index.html` preview and a minimal
//! `package.json` listing the libraries generated source may import.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use sitewright_types::error::RepositoryError;

use crate::preview::render_preview;

const PACKAGE_NAME: &str = "sitewright-export";

/// Dependencies of generated source, pinned the way the preview loads them.
const DEPENDENCIES: [(&str, &str); 3] = [
    ("react", "^18.2.0"),
    ("lucide-react", "latest"),
    ("framer-motion", "latest"),
];

fn package_json() -> String {
    let dependencies: serde_json::Map<String, serde_json::Value> = DEPENDENCIES
        .iter()
        .map(|(name, version)| (name.to_string(), serde_json::Value::from(*version)))
        .collect();
    let manifest = serde_json::json!({
        "name": PACKAGE_NAME,
        "private": true,
        "dependencies": dependencies,
    });
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}

fn zip_err(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(format!("archive: {err}"))
}

/// Build the zip archive for one site's source text.
pub fn site_archive(source_text: &str) -> Result<Vec<u8>, RepositoryError> {
    let entries = [
        ("app.jsx", source_text.to_string()),
        ("index.html", render_preview(source_text)),
        ("package.json", package_json()),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in &entries {
        writer.start_file(*name, options).map_err(zip_err)?;
        writer.write_all(contents.as_bytes()).map_err(zip_err)?;
    }
    let cursor = writer.finish().map_err(zip_err)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_archive_holds_source_preview_and_manifest() {
        let source = "export default function App() { return <h1>Bean There</h1>; }";
        let bytes = site_archive(source).unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<_> = archive.file_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["app.jsx", "index.html", "package.json"]);

        assert_eq!(read_entry(&bytes, "app.jsx"), source);
        assert_eq!(read_entry(&bytes, "index.html"), render_preview(source));
    }

    #[test]
    fn test_manifest_lists_preview_libraries() {
        let bytes = site_archive("").unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&read_entry(&bytes, "package.json")).unwrap();
        assert_eq!(manifest["name"], "sitewright-export");
        assert_eq!(manifest["dependencies"]["react"], "^18.2.0");
        assert_eq!(manifest["dependencies"]["lucide-react"], "latest");
        assert_eq!(manifest["dependencies"]["framer-motion"], "latest");
    }
}
