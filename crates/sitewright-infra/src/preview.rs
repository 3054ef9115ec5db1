//! Standalone HTML preview page for a generated component.
//!
//! The page loads React, Babel, Tailwind, framer-motion and lucide-react
//! from public CDNs, defines the `SmartImage` runtime component, and mounts
//! `App`. Module imports in the generated source are rewritten into globals
//! because the browser build has no module loader.

use std::sync::LazyLock;

use regex::Regex;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated Site</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script crossorigin src="https://unpkg.com/react@18.2.0/umd/react.production.min.js"></script>
    <script crossorigin src="https://unpkg.com/react-dom@18.2.0/umd/react-dom.production.min.js"></script>
    <script src="https://unpkg.com/@babel/standalone/babel.min.js"></script>
    <script src="https://unpkg.com/framer-motion@10.16.4/dist/framer-motion.js"></script>
    <script src="https://unpkg.com/lucide-react@0.263.1/dist/umd/lucide-react.min.js"></script>
    <style>
        body { margin: 0; font-family: 'Inter', sans-serif; background-color: #000; color: #fff; }
        @keyframes shimmer { 0% { background-position: -200% 0; } 100% { background-position: 200% 0; } }
        .shimmer::after { content: ''; position: absolute; inset: 0; background: linear-gradient(90deg, transparent, rgba(255,255,255,0.1), transparent); animation: shimmer 1.5s infinite; }
    </style>
</head>
<body>
    <div id="root"></div>
    <script>
        // Unknown icon names resolve to a placeholder glyph instead of undefined.
        const rawIcons = window.lucide || {};
        window.SafeLucide = new Proxy(rawIcons, {
            get: (target, prop) => {
                if (target[prop]) return target[prop];
                return (props) => React.createElement(
                    'svg',
                    { ...props, width: 24, height: 24, viewBox: "0 0 24 24", fill: "none", stroke: "currentColor", strokeWidth: 2 },
                    React.createElement('rect', { x: 2, y: 2, width: 20, height: 20, rx: 2 }),
                    React.createElement('path', { d: "M12 8v8" }),
                    React.createElement('path', { d: "M8 12h8" })
                );
            }
        });
        window.SafeMotion = window.Motion || { motion: 'div', AnimatePresence: ({children}) => children };
    </script>
    <script type="text/babel">
        const {
            useState, useEffect, useRef, useMemo, useCallback,
            useContext, useReducer, useLayoutEffect
        } = React;
        const { createRoot } = ReactDOM;

        const SmartImage = ({ src, alt, className, ...props }) => {
            const [loaded, setLoaded] = useState(false);
            return (
                <div className={`relative overflow-hidden bg-gray-900 ${className || ''}`}>
                    {!loaded && <div className="absolute inset-0 z-10 bg-gray-800 shimmer" />}
                    <img
                        src={src}
                        alt={alt}
                        className={`block w-full h-full object-cover transition-opacity duration-700 ${loaded ? 'opacity-100' : 'opacity-0'}`}
                        onLoad={() => setLoaded(true)}
                        {...props}
                    />
                </div>
            );
        };

"#;

const PAGE_TAIL: &str = r#"

        const root = createRoot(document.getElementById('root'));
        if (typeof App !== 'undefined') {
            try {
                root.render(<App />);
            } catch (e) {
                console.error("Runtime Render Error:", e);
                document.body.innerHTML = '<h2 style="color:red; padding:20px">Runtime Error</h2>';
            }
        } else {
            console.error("Mounting Error: 'App' component is undefined.");
            document.body.innerHTML = '<div style="color:white; background:#ef4444; padding:20px; font-family:sans-serif;"><h1>Render Error</h1><p>The App component could not be loaded.</p></div>';
        }
    </script>
</body>
</html>
"#;

/// `(pattern, replacement)` pairs applied in order.
static IMPORT_REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (
            r#"import\s+\{([^}]+)\}\s+from\s+['"]lucide-react['"];?"#,
            "const {${1}} = window.SafeLucide;",
        ),
        (
            r#"import\s+\{([^}]+)\}\s+from\s+['"]framer-motion['"];?"#,
            "const {${1}} = window.SafeMotion;",
        ),
        (r#"import\s+[^;'"]*?\s+from\s+['"]react(?:-dom[^'"]*)?['"];?"#, ""),
        (
            r#"import\s+[^;'"]*?\s+from\s+['"][^'"]*['"];?"#,
            "// import removed",
        ),
        (r#"import\s+['"][^'"]*['"];?"#, "// import removed"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

static DEFAULT_EXPORT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"export\s+default\s+").ok());

/// Rewrite module syntax in generated source so it runs as a plain
/// Babel-transformed script.
pub fn rewrite_for_browser(source: &str) -> String {
    let mut code = source.to_string();
    for (re, replacement) in IMPORT_REWRITES.iter() {
        code = re.replace_all(&code, *replacement).into_owned();
    }

    code = code.replacen("export default function App", "function App", 1);
    if let Some(re) = DEFAULT_EXPORT.as_ref() {
        code = re.replacen(&code, 1, "").into_owned();
    }

    // A literal closing tag would end the inline script early.
    code.replace("</script", "<\\/script")
}

/// Wrap generated source into a complete HTML preview page.
pub fn render_preview(source: &str) -> String {
    let body = rewrite_for_browser(source);
    let mut page = String::with_capacity(PAGE_HEAD.len() + body.len() + PAGE_TAIL.len());
    page.push_str(PAGE_HEAD);
    page.push_str(&body);
    page.push_str(PAGE_TAIL);
    page
}
