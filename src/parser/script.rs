//! Locating the instance `<script>` element of a Svelte component.
//!
//! Only a top-level `<script>` can be the instance script. Scripts nested in
//! other elements (`<svelte:head>`, `<div>`), module-level scripts
//! (`<script context="module">` or `<script module>`) and scripts inside
//! HTML comments or `{...}` expressions are skipped.

use lazy_static::lazy_static;
use regex::Regex;
use tree_sitter::{Point, Range};

use super::ParseError;

lazy_static! {
    static ref OPEN_TAG: Regex = Regex::new(r"^<([A-Za-z][\w:.-]*)").unwrap();
    static ref CLOSE_TAG: Regex = Regex::new(r"^</[A-Za-z][\w:.-]*\s*>").unwrap();
    static ref SCRIPT_CLOSE: Regex = Regex::new(r"(?i)</script\s*>").unwrap();
    static ref STYLE_CLOSE: Regex = Regex::new(r"(?i)</style\s*>").unwrap();
    static ref MODULE_ATTR: Regex =
        Regex::new(r#"(?i)(^|\s)(context\s*=\s*["']?module["']?|module)(\s|/|$)"#).unwrap();
    static ref TS_LANG_ATTR: Regex =
        Regex::new(r#"(?i)(^|\s)lang\s*=\s*["']?(ts|typescript)["']?(\s|/|$)"#).unwrap();
}

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Grammar used for a script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLang {
    JavaScript,
    TypeScript,
}

impl ScriptLang {
    fn from_attrs(attrs: &str) -> Self {
        if TS_LANG_ATTR.is_match(attrs) {
            ScriptLang::TypeScript
        } else {
            ScriptLang::JavaScript
        }
    }

    /// The tree-sitter grammar for this language.
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            ScriptLang::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            ScriptLang::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

/// Byte span of a script element's content within the component source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    /// First byte after the opening tag.
    pub start: usize,
    /// First byte of the closing tag.
    pub end: usize,
    pub lang: ScriptLang,
}

impl ScriptBlock {
    /// The script content.
    pub fn content<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    pub fn is_blank(&self, source: &str) -> bool {
        self.content(source).trim().is_empty()
    }

    /// The content span as a tree-sitter included range.
    pub fn ts_range(&self, source: &str) -> Range {
        Range {
            start_byte: self.start,
            end_byte: self.end,
            start_point: point_at(source, self.start),
            end_point: point_at(source, self.end),
        }
    }
}

/// Find the instance script of a component.
///
/// Returns `Ok(None)` for markup-only components. An unclosed script tag or
/// a second top-level instance script is an error, mirroring the Svelte
/// compiler.
pub fn find_instance_script(source: &str) -> Result<Option<ScriptBlock>, ParseError> {
    let bytes = source.as_bytes();
    let mut instance: Option<ScriptBlock> = None;
    let mut depth = 0usize;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'<' if bytes[pos..].starts_with(b"<!--") => {
                pos = source[pos..]
                    .find("-->")
                    .map_or(bytes.len(), |end| pos + end + 3);
            }
            b'<' => {
                let rest = &source[pos..];
                if let Some(close) = CLOSE_TAG.find(rest) {
                    depth = depth.saturating_sub(1);
                    pos += close.end();
                    continue;
                }
                let name = match OPEN_TAG.captures(rest).and_then(|c| c.get(1)) {
                    Some(name) => name,
                    None => {
                        pos += 1;
                        continue;
                    }
                };
                let tag_start = pos;
                let attrs_start = pos + name.end();
                let name = name.as_str().to_ascii_lowercase();
                let is_script = name == "script";

                let tag_end = match scan_past(bytes, attrs_start, b'>') {
                    Some(end) => end,
                    None if is_script => {
                        return Err(ParseError::UnclosedScript {
                            line: line_at(source, tag_start),
                        })
                    }
                    None => break,
                };
                let attrs = &source[attrs_start..tag_end - 1];
                let self_closing = attrs.trim_end().ends_with('/');
                pos = tag_end;

                if self_closing {
                    continue;
                }

                if is_script || name == "style" {
                    // Raw text content: skip straight to the closing tag.
                    let closer: &Regex = if is_script { &SCRIPT_CLOSE } else { &STYLE_CLOSE };
                    let close = match closer.find_at(source, tag_end) {
                        Some(close) => close,
                        None if is_script => {
                            return Err(ParseError::UnclosedScript {
                                line: line_at(source, tag_start),
                            })
                        }
                        None => break,
                    };
                    pos = close.end();

                    if !is_script || depth > 0 || MODULE_ATTR.is_match(attrs) {
                        continue;
                    }
                    if instance.is_some() {
                        return Err(ParseError::DuplicateInstanceScript {
                            line: line_at(source, tag_start),
                        });
                    }
                    instance = Some(ScriptBlock {
                        start: tag_end,
                        end: close.start(),
                        lang: ScriptLang::from_attrs(attrs),
                    });
                } else if !VOID_ELEMENTS.contains(&name.as_str()) {
                    depth += 1;
                }
            }
            b'{' => {
                pos = scan_past(bytes, pos + 1, b'}').unwrap_or(bytes.len());
            }
            _ => pos += 1,
        }
    }

    Ok(instance)
}

/// Index just past the first `terminator` that is outside quotes and
/// nested braces.
fn scan_past(bytes: &[u8], from: usize, terminator: u8) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut braces = 0usize;

    for (i, &b) in bytes.iter().enumerate().skip(from) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        if b == terminator && braces == 0 {
            return Some(i + 1);
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'{' => braces += 1,
            b'}' => braces = braces.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// 1-based line containing `byte`.
pub fn line_at(source: &str, byte: usize) -> usize {
    source.as_bytes()[..byte]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Zero-based tree-sitter point for `byte`.
fn point_at(source: &str, byte: usize) -> Point {
    let before = &source.as_bytes()[..byte];
    let row = before.iter().filter(|&&b| b == b'\n').count();
    let column = match before.iter().rposition(|&b| b == b'\n') {
        Some(nl) => byte - nl - 1,
        None => byte,
    };
    Point::new(row, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_plain_script() {
        let src = "<script>\nlet x = 1;\n</script>\n<p>{x}</p>\n";
        let block = find_instance_script(src).unwrap().unwrap();
        assert_eq!(block.content(src), "\nlet x = 1;\n");
        assert_eq!(block.lang, ScriptLang::JavaScript);
    }

    #[test]
    fn test_markup_only_has_no_script() {
        let src = "<h1>Hello</h1>\n<style>h1 { color: red; }</style>\n";
        assert_eq!(find_instance_script(src).unwrap(), None);
    }

    #[test]
    fn test_skips_module_script() {
        let src = r#"<script context="module">
export const prerender = true;
</script>

<script lang="ts">
let count: number = 0;
</script>
"#;
        let block = find_instance_script(src).unwrap().unwrap();
        assert!(block.content(src).contains("count"));
        assert_eq!(block.lang, ScriptLang::TypeScript);
    }

    #[test]
    fn test_skips_bare_module_attribute() {
        let src = "<script module>\nexport const a = 1;\n</script>\n";
        assert_eq!(find_instance_script(src).unwrap(), None);
    }

    #[test]
    fn test_skips_commented_script() {
        let src = "<!-- <script>console.log(1)</script> -->\n<script>\nlet y;\n</script>\n";
        let block = find_instance_script(src).unwrap().unwrap();
        assert_eq!(block.content(src), "\nlet y;\n");
    }

    #[test]
    fn test_unclosed_script_is_error() {
        let src = "<p>hi</p>\n<script>\nlet x = 1;\n";
        match find_instance_script(src) {
            Err(ParseError::UnclosedScript { line }) => assert_eq!(line, 2),
            other => panic!("expected UnclosedScript, got {:?}", other),
        }
    }

    #[test]
    fn test_two_instance_scripts_is_error() {
        let src = "<script>let a;</script>\n<script>let b;</script>\n";
        assert!(matches!(
            find_instance_script(src),
            Err(ParseError::DuplicateInstanceScript { line: 2 })
        ));
    }

    #[test]
    fn test_head_script_is_not_instance_script() {
        let src = concat!(
            "<script>\nlet a;\n</script>\n",
            "<svelte:head>\n",
            "  <script async src=\"/a.js\"></script>\n",
            "</svelte:head>\n",
        );
        let block = find_instance_script(src).unwrap().unwrap();
        assert_eq!(block.content(src), "\nlet a;\n");
    }

    #[test]
    fn test_nested_script_only_has_no_instance() {
        let src = concat!(
            "<svelte:head>\n",
            "<script>console.log('analytics')</script>\n",
            "</svelte:head>\n",
            "<div><script>let b;</script></div>\n",
        );
        assert_eq!(find_instance_script(src).unwrap(), None);
    }

    #[test]
    fn test_quoted_attribute_may_contain_angle_brackets() {
        let src = concat!(
            "<script lang=\"ts\" generics=\"T extends Record<string, unknown>\">",
            "\nlet t: T;\n</script>",
        );
        let block = find_instance_script(src).unwrap().unwrap();
        assert_eq!(block.content(src), "\nlet t: T;\n");
        assert_eq!(block.lang, ScriptLang::TypeScript);
    }

    #[test]
    fn test_script_text_in_expressions_and_styles_is_skipped() {
        let src = concat!(
            "<p title={a > b ? '<script>' : ''}>{@html '<script>x()</script>'}</p>\n",
            "<style>\n  p::after { content: '<script>'; }\n</style>\n",
            "<script>\nlet c;\n</script>\n",
        );
        let block = find_instance_script(src).unwrap().unwrap();
        assert_eq!(block.content(src), "\nlet c;\n");
    }

    #[test]
    fn test_void_and_self_closing_elements_keep_top_level() {
        let src = "<br>\n<img src=\"a.png\">\n<Widget />\n<script>\nlet d;\n</script>\n";
        assert!(find_instance_script(src).unwrap().is_some());
    }

    #[test]
    fn test_non_ascii_markup() {
        let src = "<h1>Café ☕</h1>\n<script>\nlet e = 'é';\n</script>\n";
        let block = find_instance_script(src).unwrap().unwrap();
        assert_eq!(block.content(src), "\nlet e = 'é';\n");
    }

    #[test]
    fn test_ts_range_points() {
        let src = "<div/>\n<script>\n  let z;\n</script>";
        let block = find_instance_script(src).unwrap().unwrap();
        let range = block.ts_range(src);
        assert_eq!(range.start_point, Point::new(1, 8));
        assert_eq!(range.end_point, Point::new(3, 0));
        assert_eq!(line_at(src, block.start), 2);
    }
}
