//! Source normalizer.
//!
//! Text-level rewriting of generated component source so it respects the
//! preview platform's rules. Three passes, in order:
//!
//! 1. raw `<img>` elements become `<SmartImage ... />`;
//! 2. a `SmartImage` import is inserted when the component is used but not imported;
//! 3. inline redefinitions of `SmartImage` are deleted.
//!
//! The normalizer never builds a syntax tree and never fails. It is
//! idempotent: `normalize(normalize(s)) == normalize(s)`.

use std::sync::LazyLock;

use regex::Regex;

use super::SMART_IMAGE_IMPORT;

const SMART_IMAGE: &str = "SmartImage";

static USES_SMART_IMAGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<SmartImage\b").ok());

static IMPORTS_SMART_IMAGE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"import\s+SmartImage\b|import\s+(?:[\w$]+\s*,\s*)?\{[^}]*\bSmartImage\b[^}]*\}",
    )
    .ok()
});

static IMPORT_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*import\b").ok());

static SMART_IMAGE_DEFINITION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:export[ \t]+(?:default[ \t]+)?)?(const|let|var|function|class)\s+SmartImage\b",
    )
    .ok()
});

/// Run every normalization pass over `source`.
pub fn normalize(source: &str) -> String {
    let rewritten = replace_raw_media(source);
    let imported = ensure_smart_image_import(&rewritten);
    remove_inline_definitions(&imported)
}

// ---------------------------------------------------------------------------
// Pass 1: media substitution
// ---------------------------------------------------------------------------

/// Rewrite every raw `<img ...>` element to `<SmartImage ... />`.
///
/// Attributes are preserved verbatim, except that `{...}` expressions inside
/// a tag are normalized recursively. Stray `</img>` closers are dropped and
/// unterminated tags are left untouched.
pub fn replace_raw_media(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len() + 64);
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        if let Some(end) = img_closer_end(bytes, i) {
            out.push_str(&src[copied..i]);
            i = end;
            copied = end;
            continue;
        }

        let Some((name_end, is_img)) = media_tag_name(bytes, i) else {
            i += 1;
            continue;
        };

        match scan_tag(src, name_end) {
            Some((attrs, end)) => {
                out.push_str(&src[copied..i]);
                if is_img {
                    out.push_str(&render_smart_image(&attrs));
                } else {
                    out.push('<');
                    out.push_str(SMART_IMAGE);
                    out.push_str(&attrs);
                    out.push('>');
                }
                i = end;
                copied = end;
            }
            None => i = name_end,
        }
    }

    out.push_str(&src[copied..]);
    out
}

/// If a media tag (`<img`, any case, or `<SmartImage`) starts at `at`,
/// return the index just past its name and whether it is a raw `img`.
fn media_tag_name(bytes: &[u8], at: usize) -> Option<(usize, bool)> {
    let after = &bytes[at + 1..];
    let (len, is_img) = if after.len() >= 3 && after[..3].eq_ignore_ascii_case(b"img") {
        (3, true)
    } else if after.starts_with(SMART_IMAGE.as_bytes()) {
        (SMART_IMAGE.len(), false)
    } else {
        return None;
    };
    let name_end = at + 1 + len;
    match bytes.get(name_end) {
        None => Some((name_end, is_img)),
        Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => Some((name_end, is_img)),
        Some(_) => None,
    }
}

/// If a `</img>` closer starts at `at`, return the index just past it.
fn img_closer_end(bytes: &[u8], at: usize) -> Option<usize> {
    let after = bytes.get(at + 1..at + 5)?;
    if after[0] != b'/' || !after[1..].eq_ignore_ascii_case(b"img") {
        return None;
    }
    let mut i = at + 5;
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    (bytes.get(i) == Some(&b'>')).then_some(i + 1)
}

/// Scan a tag body from just after its name to the closing `>`.
///
/// Returns the attribute text (with brace expressions normalized) and the
/// index just past `>`, or `None` when the tag never closes.
fn scan_tag(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut attrs = String::new();
    let mut copied = start;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_quoted(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b'{' => {
                let close = matching_brace(bytes, i)?;
                attrs.push_str(&src[copied..=i]);
                attrs.push_str(&replace_raw_media(&src[i + 1..close]));
                copied = close;
                i = close + 1;
            }
            b'>' => {
                attrs.push_str(&src[copied..i]);
                return Some((attrs, i + 1));
            }
            _ => i += 1,
        }
    }
    None
}

fn render_smart_image(attrs: &str) -> String {
    let attrs = attrs.trim();
    let attrs = attrs.strip_suffix('/').unwrap_or(attrs).trim_end();
    if attrs.is_empty() {
        format!("<{SMART_IMAGE} />")
    } else {
        format!("<{SMART_IMAGE} {attrs} />")
    }
}

// ---------------------------------------------------------------------------
// Pass 2: import guarantee
// ---------------------------------------------------------------------------

/// Insert the `SmartImage` import when the component is used but not imported.
///
/// The import goes right after the first import statement, or at the top of
/// the file when there is none.
pub fn ensure_smart_image_import(src: &str) -> String {
    let (Some(uses), Some(imports)) = (USES_SMART_IMAGE.as_ref(), IMPORTS_SMART_IMAGE.as_ref())
    else {
        return src.to_string();
    };
    if !uses.is_match(src) || imports.is_match(src) {
        return src.to_string();
    }

    match first_import_end(src) {
        Some(end) if end == src.len() && !src.ends_with('\n') => {
            format!("{src}\n{SMART_IMAGE_IMPORT}")
        }
        Some(end) => format!("{}{SMART_IMAGE_IMPORT}\n{}", &src[..end], &src[end..]),
        None => format!("{SMART_IMAGE_IMPORT}\n{src}"),
    }
}

/// Index just past the first import statement (including its newline).
///
/// A statement ends at the first newline outside braces, so multi-line
/// named imports are kept whole.
fn first_import_end(src: &str) -> Option<usize> {
    let start = IMPORT_LINE.as_ref()?.find(src)?.start();
    let mut depth = 0usize;
    for (offset, b) in src.as_bytes()[start..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'\n' if depth == 0 => return Some(start + offset + 1),
            _ => {}
        }
    }
    Some(src.len())
}

// ---------------------------------------------------------------------------
// Pass 3: duplicate-definition removal
// ---------------------------------------------------------------------------

/// Delete inline `SmartImage` definitions (`function`, `class`, or a
/// `const`/`let`/`var` binding, optionally exported).
///
/// Definitions whose end cannot be found are left in place.
pub fn remove_inline_definitions(src: &str) -> String {
    let Some(definition) = SMART_IMAGE_DEFINITION.as_ref() else {
        return src.to_string();
    };
    let mut out = src.to_string();
    let mut search_from = 0;

    while let Some(caps) = definition.captures_at(&out, search_from) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let is_binding = matches!(keyword.as_str(), "const" | "let" | "var");
        let (start, name_end) = (whole.start(), whole.end());

        match definition_end(&out, name_end, is_binding) {
            Some(end) => {
                let end = consume_line_tail(out.as_bytes(), end);
                out.replace_range(start..end, "");
                search_from = start;
            }
            None => search_from = name_end,
        }
    }
    out
}

/// Find where a definition starting at `from` ends.
///
/// Functions and classes end when their first top-level `{...}` body closes.
/// Bindings end at a top-level `;`, or at a top-level newline that does not
/// continue the expression.
fn definition_end(src: &str, from: usize, is_binding: bool) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = from;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'`' => {
                i = skip_template(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = skip_line_comment(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(bytes, i);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && !is_binding && bytes[i] == b'}' {
                    return Some(i + 1);
                }
            }
            b';' if depth == 0 && is_binding => return Some(i + 1),
            b'\n' if depth == 0 && is_binding && !continues_past(src, from, i) => {
                return Some(i);
            }
            _ => {}
        }
        i += 1;
    }

    (is_binding && depth == 0).then_some(bytes.len())
}

/// Whether the expression on the line ending at `newline` carries on to the next line.
fn continues_past(src: &str, from: usize, newline: usize) -> bool {
    const TRAILING: [&str; 14] = [
        "=>", "=", "(", "[", ",", "+", "-", "*", "/", "%", "&&", "||", "?", ":",
    ];
    const LEADING: [&str; 5] = [".", "?", ":", "&&", "||"];

    let line_start = src[..newline].rfind('\n').map_or(0, |p| p + 1).max(from);
    let code = strip_comments(&src[line_start..newline]);
    let line = code.trim_end();
    // A bare name (`let SmartImage`) ends at its own line break; later blank
    // lines only carry on an expression that was already continuing.
    if line.is_empty() && line_start > from {
        return true;
    }
    if !line.is_empty() && TRAILING.iter().any(|t| line.ends_with(t)) {
        return true;
    }
    let next = src[newline + 1..]
        .lines()
        .map(str::trim_start)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    LEADING.iter().any(|t| next.starts_with(t))
}

/// The code on a single line with `//` and `/* */` comments removed.
fn strip_comments(line: &str) -> String {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_quoted(bytes, i),
            b'`' => i = skip_template(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&line[copied..i]);
                return out;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&line[copied..i]);
                i = skip_block_comment(bytes, i);
                copied = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&line[copied.min(line.len())..]);
    out
}

/// Extend a removal over trailing blanks, semicolons and one line break.
fn consume_line_tail(bytes: &[u8], mut end: usize) -> usize {
    while matches!(bytes.get(end), Some(b' ' | b'\t' | b';')) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'\r') {
        end += 1;
    }
    if bytes.get(end) == Some(&b'\n') {
        end += 1;
    }
    end
}

// ---------------------------------------------------------------------------
// Lexical helpers
// ---------------------------------------------------------------------------

/// Skip a `'` or `"` string. Unterminated strings end at the line break.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip a backtick template literal.
fn skip_template(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index of the line break ending a `//` comment.
fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| *b == b'\n')
        .map_or(bytes.len(), |p| start + p)
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map_or(bytes.len(), |p| start + 2 + p + 2)
}

/// Index of the `}` matching the `{` at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'`' => {
                i = skip_template(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_media_count(src: &str) -> usize {
        Regex::new(r"(?i)<img[\s/>]").unwrap().find_iter(src).count()
    }

    fn smart_image_count(src: &str) -> usize {
        src.matches("<SmartImage").count()
    }

    const TRAILING_BLOCK_COMMENT: &str = "import React from 'react';\nconst SmartImage = (p) => <div {...p} /> /* legacy */\nexport default function App() {\n  return <SmartImage src=\"a\" />;\n}\n";

    const BARE_LET: &str = "let SmartImage\n\nconst Hero = () => <h1>Hi</h1>;\nexport default function App() { return <Hero />; }\n";

    /// Hand-picked sources without inline `SmartImage` definitions.
    fn media_corpus() -> Vec<&'static str> {
        vec![
            "",
            "export default function App() { return <div>Hello</div>; }",
            "import X\nfunction App(){return <img src=\"a.png\"/>}",
            "import React from 'react';\nexport default function App() {\n  return (\n    <main>\n      <img\n        src=\"/api/image?prompt=latte\"\n        alt=\"Latte\"\n        className=\"w-full\"\n      >\n      <IMG src='b.png'>\n    </main>\n  );\n}\n",
            "import {\n  Menu,\n  X,\n} from 'lucide-react';\nconst Hero = () => <img src=\"a\" onLoad={() => setLoaded(true)} alt=\"x > y\" />;\n",
            "import SmartImage from './SmartImage';\nexport default function App() { return <img src=\"a\"></img>; }\n",
            "const list = items.map(i => <img key={i} src={`/api/image?prompt=${i}`} />);",
            "<image href=\"sprite.svg\" /><imgs></imgs>",
        ]
    }

    /// Media corpus plus unterminated tags and inline definitions.
    fn corpus() -> Vec<&'static str> {
        let mut all = media_corpus();
        all.extend([
            "<img src=\"unterminated\"",
            "const SmartImage = ({ src, alt }) => {\n  return <img src={src} alt={alt} />;\n};\nexport default function App() { return <SmartImage src=\"a\" />; }\n",
            "function SmartImage(props) {\n  return <img {...props} />;\n}\nexport default function App() { return <img src=\"a\" />; }\n",
            "class SmartImage extends React.Component {\n  render() { return <img src={this.props.src} />; }\n}\nexport default function App() { return null; }\n",
            TRAILING_BLOCK_COMMENT,
            BARE_LET,
        ]);
        all
    }

    #[test]
    fn test_idempotent_over_corpus() {
        for src in corpus() {
            let once = normalize(src);
            assert_eq!(normalize(&once), once, "not idempotent for {src:?}");
        }
    }

    #[test]
    fn test_substitution_coverage_over_corpus() {
        for src in media_corpus() {
            let k = raw_media_count(src);
            let out = normalize(src);
            assert_eq!(raw_media_count(&out), 0, "raw media left in {out:?}");
            assert!(
                smart_image_count(&out) >= k,
                "expected at least {k} SmartImage in {out:?}"
            );
        }
    }

    #[test]
    fn test_scenario_rewrites_and_imports_after_first_import() {
        let out = normalize("import X\nfunction App(){return <img src=\"a.png\"/>}");
        assert_eq!(
            out,
            "import X\nimport SmartImage from './SmartImage';\nfunction App(){return <SmartImage src=\"a.png\" />}"
        );
    }

    #[test]
    fn test_arrow_function_attribute_does_not_end_tag() {
        let out = replace_raw_media("<img src=\"a\" onLoad={() => setLoaded(true)} />");
        assert_eq!(out, "<SmartImage src=\"a\" onLoad={() => setLoaded(true)} />");
    }

    #[test]
    fn test_multi_line_tag_keeps_attributes() {
        let out = replace_raw_media("<img\n  src=\"a\"\n  alt=\"b\"\n>");
        assert_eq!(out, "<SmartImage src=\"a\"\n  alt=\"b\" />");
    }

    #[test]
    fn test_case_insensitive_and_closer_dropped() {
        assert_eq!(
            replace_raw_media("<IMG SRC=\"a\"></img>"),
            "<SmartImage SRC=\"a\" />"
        );
        assert_eq!(replace_raw_media("<img/>"), "<SmartImage />");
    }

    #[test]
    fn test_other_tags_untouched() {
        let src = "<image href=\"a\" /><imgs></imgs><Image />";
        assert_eq!(normalize(src), src);
    }

    #[test]
    fn test_unterminated_tag_left_as_is() {
        let src = "return <img src=\"a\"";
        assert_eq!(normalize(src), src);
    }

    #[test]
    fn test_nested_image_in_expression_is_rewritten() {
        let out = replace_raw_media("<img alt=\"x\" fallback={<img src=\"b\"/>}/>");
        assert_eq!(
            out,
            "<SmartImage alt=\"x\" fallback={<SmartImage src=\"b\" />} />"
        );
    }

    #[test]
    fn test_import_after_multi_line_import() {
        let src = "import {\n  Menu,\n  X,\n} from 'lucide-react';\nconst a = <img src=\"a\" />;\n";
        let out = normalize(src);
        assert_eq!(
            out,
            "import {\n  Menu,\n  X,\n} from 'lucide-react';\nimport SmartImage from './SmartImage';\nconst a = <SmartImage src=\"a\" />;\n"
        );
    }

    #[test]
    fn test_import_goes_after_first_of_several_imports() {
        let src = "import React from 'react';\nimport { Menu } from 'lucide-react';\nconst a = <img src=\"a\" />;\n";
        assert_eq!(
            normalize(src),
            "import React from 'react';\nimport SmartImage from './SmartImage';\nimport { Menu } from 'lucide-react';\nconst a = <SmartImage src=\"a\" />;\n"
        );
    }

    #[test]
    fn test_import_at_top_without_imports() {
        let out = normalize("const a = <img src=\"a\" />;");
        assert_eq!(
            out,
            "import SmartImage from './SmartImage';\nconst a = <SmartImage src=\"a\" />;"
        );
    }

    #[test]
    fn test_existing_imports_respected() {
        for src in [
            "import SmartImage from './SmartImage';\nconst a = <SmartImage />;",
            "import { SmartImage } from './components';\nconst a = <SmartImage />;",
            "import Foo, { Bar, SmartImage } from './components';\nconst a = <SmartImage />;",
        ] {
            assert_eq!(normalize(src), src);
        }
    }

    #[test]
    fn test_import_appended_when_single_import_has_no_newline() {
        assert_eq!(
            ensure_smart_image_import("import React from 'react'"),
            "import React from 'react'"
        );
        assert_eq!(
            ensure_smart_image_import("<SmartImage />\nimport React from 'react'"),
            "<SmartImage />\nimport React from 'react'\nimport SmartImage from './SmartImage';"
        );
    }

    #[test]
    fn test_removes_arrow_function_definition() {
        let src = "import React from 'react';\nconst SmartImage = ({ src, alt }) => {\n  return <img src={src} alt={alt} />;\n};\nexport default function App() {\n  return <SmartImage src=\"a\" />;\n}\n";
        let out = normalize(src);
        assert_eq!(
            out,
            "import React from 'react';\nimport SmartImage from './SmartImage';\nexport default function App() {\n  return <SmartImage src=\"a\" />;\n}\n"
        );
    }

    #[test]
    fn test_removes_function_and_class_definitions() {
        let func = "function SmartImage({ src }) {\n  const s = '}';\n  return <div>{src}</div>;\n}\nexport default function App() { return null; }\n";
        assert_eq!(
            remove_inline_definitions(func),
            "export default function App() { return null; }\n"
        );

        let class = "export class SmartImage extends React.Component {\n  render() { return null; }\n}\nconst a = 1;\n";
        assert_eq!(remove_inline_definitions(class), "const a = 1;\n");
    }

    #[test]
    fn test_binding_without_semicolon_ends_at_line() {
        let src = "const SmartImage = props =>\n  <div {...props} />\nconst Other = 1;\n";
        assert_eq!(remove_inline_definitions(src), "const Other = 1;\n");
    }

    #[test]
    fn test_trailing_block_comment_ends_binding() {
        assert_eq!(
            normalize(TRAILING_BLOCK_COMMENT),
            "import React from 'react';\nimport SmartImage from './SmartImage';\nexport default function App() {\n  return <SmartImage src=\"a\" />;\n}\n"
        );
    }

    #[test]
    fn test_trailing_line_comment_ends_binding() {
        let src = "const SmartImage = Img // fallback:\nconst Other = 1;\n";
        assert_eq!(remove_inline_definitions(src), "const Other = 1;\n");

        let src = "const SmartImage = Img /* a */ // b =\nconst Other = '//';\n";
        assert_eq!(remove_inline_definitions(src), "const Other = '//';\n");
    }

    #[test]
    fn test_bare_binding_keeps_next_statement() {
        assert_eq!(
            normalize(BARE_LET),
            "\nconst Hero = () => <h1>Hi</h1>;\nexport default function App() { return <Hero />; }\n"
        );
    }

    #[test]
    fn test_blank_line_inside_continued_binding() {
        let src = "const SmartImage = (p) =>\n\n  <div {...p} />\nconst Other = 1;\n";
        assert_eq!(remove_inline_definitions(src), "const Other = 1;\n");
    }

    #[test]
    fn test_strip_comments_respects_strings() {
        assert_eq!(strip_comments("a = '//' // c"), "a = '//' ");
        assert_eq!(strip_comments("a /* x */ + b /* y"), "a  + b ");
    }

    #[test]
    fn test_app_definition_untouched() {
        let src = "export default function App() {\n  return <SmartImageGallery />;\n}\n";
        assert_eq!(remove_inline_definitions(src), src);
    }
}
