//! The builder: brief to generated component source, and edits thereof.

pub mod code;
pub mod edit;
pub mod normalize;
pub mod prompt;

/// The import statement the normalizer inserts when it is missing.
pub const SMART_IMAGE_IMPORT: &str = "import SmartImage from './SmartImage';";

/// Local image route the generated code must source imagery from.
pub const IMAGE_ROUTE: &str = "/api/image?prompt=";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserted_import_is_recognized_as_present() {
        let src = format!("{SMART_IMAGE_IMPORT}\nconst a = <SmartImage />;");
        assert_eq!(normalize::normalize(&src), src);
    }
}
