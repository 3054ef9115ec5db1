//! Edit prompt synthesizer.

use super::SMART_IMAGE_IMPORT;

/// Build the instruction for applying `instruction` to `current_source`.
///
/// The whole current file is embedded and the model must return the whole
/// file back. Truncated replies are not detected; they are stored as-is.
pub fn synthesize_edit(current_source: &str, instruction: &str) -> String {
    format!(
        "<current_code>\n```jsx\n{current_source}\n```\n</current_code>\n\n\
<edit_request>\n{}\n</edit_request>\n\n\
<edit_rules>\n\
1. Return the ENTIRE updated file, even if it is 1000 lines long. Never return a diff or a fragment.\n\
2. No truncation. Never write placeholders such as \"// rest of code unchanged\" or \"...\".\n\
3. Keep `export default function App`.\n\
4. Available imports: react, lucide-react, framer-motion and {SMART_IMAGE_IMPORT}\n\
5. Render images with <SmartImage />, never <img>.\n\
</edit_rules>",
        instruction.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeds_full_large_source() {
        let source: String = (0..500)
            .map(|i| format!("const line{i} = {i};\n"))
            .collect();
        let prompt = synthesize_edit(&source, "make the header blue");
        assert!(prompt.contains(&source));
        assert!(prompt.contains("const line499 = 499;"));
        assert!(prompt.contains("make the header blue"));
    }

    #[test]
    fn test_forbids_truncation_and_restates_media_rule() {
        let prompt = synthesize_edit("export default function App() {}", "x");
        assert!(prompt.contains("ENTIRE"));
        assert!(prompt.contains("No truncation"));
        assert!(prompt.contains("rest of code unchanged"));
        assert!(prompt.contains("<SmartImage />"));
    }
}
