//! Recognition of include directives in source text.

/// How an include names its target.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IncludeKind {
    /// `#include "name"`: searched relative to the includer first.
    Quoted,
    /// `#include <name>`: searched on the system path only.
    Angled,
}

/// A single include directive.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Directive<'a> {
    /// The quoted or angled name, as written.
    pub name: &'a str,
    /// Quoted or angled.
    pub kind: IncludeKind,
    /// 1-based line number.
    pub line: usize,
}

/// Directive keywords that pull in another file.
const KEYWORDS: &[&str] = &["include_next", "include", "import"];

/// Extracts every include directive from `text`, in order.
///
/// Directives inside `/* ... */` block comments are skipped. Conditional
/// compilation is not evaluated: both branches of an `#if` are scanned.
pub fn scan_directives(text: &str) -> Vec<Directive<'_>> {
    let mut directives = Vec::new();
    let mut in_comment = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = if in_comment {
            match raw.find("*/") {
                Some(end) => {
                    in_comment = false;
                    &raw[end + 2..]
                }
                None => continue,
            }
        } else {
            raw
        };

        if let Some(directive) = parse_directive(line, idx + 1) {
            directives.push(directive);
        }

        in_comment = leaves_block_comment_open(line);
    }

    directives
}

/// Returns `true` if `line` ends inside an unterminated `/* ... */` comment.
///
/// A `//` outside a block comment ends the line, so a `/*` after it opens
/// nothing.
fn leaves_block_comment_open(line: &str) -> bool {
    let mut rest = line;
    loop {
        let open = rest.find("/*");
        let line_comment = rest.find("//");
        match (open, line_comment) {
            (Some(open), Some(slash)) if slash < open => return false,
            (Some(open), _) => match rest[open + 2..].find("*/") {
                Some(close) => rest = &rest[open + 2 + close + 2..],
                None => return true,
            },
            (None, _) => return false,
        }
    }
}

fn parse_directive(line: &str, line_no: usize) -> Option<Directive<'_>> {
    let rest = line.trim_start().strip_prefix('#')?.trim_start();
    let rest = KEYWORDS
        .iter()
        .find_map(|kw| rest.strip_prefix(kw))?
        .trim_start();

    let (kind, close) = match rest.chars().next()? {
        '"' => (IncludeKind::Quoted, '"'),
        '<' => (IncludeKind::Angled, '>'),
        _ => return None,
    };
    let body = &rest[1..];
    let end = body.find(close)?;
    let name = &body[..end];
    if name.is_empty() {
        return None;
    }
    Some(Directive {
        name,
        kind,
        line: line_no,
    })
}
