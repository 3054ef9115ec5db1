//! Generation prompt synthesizer.
//!
//! Pure templating: the completed brief and a style label go in, the full
//! generation instruction comes out. Every brief field is embedded verbatim
//! and the structural policy is fixed, so the same inputs always produce the
//! same text.

use sitewright_types::brief::{Brief, BriefField};
use sitewright_types::site::resolve_style;

use super::{IMAGE_ROUTE, SMART_IMAGE_IMPORT};

/// Rendered in place of an absent brief field.
pub const NOT_SPECIFIED: &str = "Not specified";

/// System prompt for generation and edit calls.
pub const BUILDER_IDENTITY: &str = "You are a senior React engineer building single-file \
marketing sites that run in a sandboxed preview. You answer with code only.";

const LAYOUT_GUIDANCE: &str = r#"Create a deep, scrolling experience.
Step 1, detect the archetype:
- E-commerce / food: menu grids, featured items, mood imagery, location.
- SaaS / tech: bento feature grids, interactive demos, trust logos, pricing.
- Portfolio: masonry galleries, case studies, services.
- Corporate: why us, process steps, testimonials, FAQ.
Step 2, compose every view from 6 to 8 distinct vertical sections. Do not output a short page."#;

/// Render the brief as labelled lines, absent fields as [`NOT_SPECIFIED`].
pub fn render_brief(brief: &Brief) -> String {
    BriefField::ALL
        .iter()
        .map(|field| {
            format!(
                "- {}: {}",
                field.label(),
                brief.get(*field).unwrap_or(NOT_SPECIFIED)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the generation instruction for a completed brief.
///
/// `style` falls back to the default style label when absent or blank.
pub fn synthesize(brief: &Brief, style: Option<&str>) -> String {
    let style = resolve_style(style);
    let mut sections = Vec::with_capacity(8);

    sections.push(
        "<task>\nCreate a complete, multi-view website from the brief below.\n</task>".to_string(),
    );
    sections.push(format!("<brief>\n{}\n</brief>", render_brief(brief)));
    sections.push(format!("<layout>\n{LAYOUT_GUIDANCE}\n</layout>"));

    sections.push(format!(
        "<environment>\n\
Use standard ES imports. Only these modules exist:\n\
- import React, {{ useState, useEffect }} from 'react';\n\
- import {{ Menu, X, ArrowRight }} from 'lucide-react';\n\
- import {{ motion, AnimatePresence }} from 'framer-motion';\n\
- {SMART_IMAGE_IMPORT}\n\
Export exactly one component: `export default function App() {{ ... }}`.\n\
</environment>"
    ));

    sections.push(format!(
        "<media_rules>\n\
1. Render every image with the <SmartImage /> component. Raw <img> tags are forbidden.\n\
2. Syntax: <SmartImage src=\"{IMAGE_ROUTE}URI_ENCODED_PROMPT\" alt=\"...\" className=\"...\" />\n\
3. Always source images from the local route {IMAGE_ROUTE}... Never use placeholders or external URLs.\n\
4. Do not define SmartImage yourself; import it.\n\
</media_rules>"
    ));

    sections.push(
        "<stability_rules>\n\
Do not build nested theme objects such as `const theme = { colors: { ... } }`. \
Put Tailwind classes directly in className strings.\n\
</stability_rules>"
            .to_string(),
    );

    sections.push(
        "<structure_rules>\n\
1. Build one view for EVERY entry in Sections. Do not substitute generic Home/About/Services views.\n\
2. Navigate between views with `const [view, setView] = useState(...)`. Do not use hyperlinks or routers.\n\
3. Match headlines, microcopy and calls to action to the Audience: slangy and lowercase for Gen Z skaters, \
precise and formal for medical professionals, simple and enthusiastic for children.\n\
4. Weave every fact in Context into the copy.\n\
5. If a Reference is given, mimic its tone and structure. Where it conflicts with anything else in the brief, \
the brief wins.\n\
</structure_rules>"
            .to_string(),
    );

    sections.push(format!(
        "<styling>\n\
Aesthetic: \"{style}\". Interpret it as a custom Tailwind design system (colors, fonts, spacing, radius). \
Use generous padding (py-24).\n\
</styling>"
    ));

    sections.join("\n\n")
}
