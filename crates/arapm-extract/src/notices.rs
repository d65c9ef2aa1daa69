//! Best-effort `@notice` extraction from source comments
//!
//! The declaration parser drops comment trivia, so notices are recovered
//! with a regex scan over the raw source: natspec blocks (`/** ... */`) and
//! runs of `///` lines immediately preceding a `function` declaration. Each
//! hit is keyed by a reconstructed canonical signature; the guess can be
//! wrong for exotic syntax, and overloaded functions sharing one signature
//! collide (last record wins at the join).

use std::sync::LazyLock;

use arapm_parser::is_elementary_type;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A notice found in the source, keyed by guessed signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeRecord {
    pub signature: String,
    pub notice: String,
}

// The body alternation cannot match `*/`, so a block only pairs with the
// function directly after its own closer, never one past intervening code
static BLOCK_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"/\*\*((?:[^*]|\*+[^*/])*)\*+/\s*function\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(([^)]*)\)",
    )
    .expect("valid regex")
});

static LINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)((?:^[ \t]*///[^\n]*\n)+)[ \t]*function\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(([^)]*)\)",
    )
    .expect("valid regex")
});

static NOTICE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)@notice[ \t]*(.*?)(?:\n[ \t]*@[a-z]|\z)").expect("valid regex")
});

/// Scan `source` for documented function declarations and return one
/// record per `@notice` tag found, in document order (blocks first, then
/// `///` runs).
pub fn parse_function_notices(source: &str) -> Vec<NoticeRecord> {
    let mut records = Vec::new();

    for caps in BLOCK_COMMENT_RE.captures_iter(source) {
        let cleaned = clean_comment(&caps[1], "*");
        if let Some(notice) = notice_text(&cleaned) {
            records.push(NoticeRecord {
                signature: guess_signature(&caps[2], &caps[3]),
                notice,
            });
        }
    }

    for caps in LINE_COMMENT_RE.captures_iter(source) {
        let cleaned = clean_comment(&caps[1], "///");
        if let Some(notice) = notice_text(&cleaned) {
            records.push(NoticeRecord {
                signature: guess_signature(&caps[2], &caps[3]),
                notice,
            });
        }
    }

    records
}

/// Strip the per-line decoration (`*` or `///`) from a comment body
fn clean_comment(raw: &str, decoration: &str) -> String {
    raw.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            trimmed.strip_prefix(decoration).unwrap_or(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The text of the `@notice` tag, whitespace-collapsed. `None` when the
/// comment carries no notice at all; `Some(String::new())` when the tag is
/// present but empty.
fn notice_text(cleaned: &str) -> Option<String> {
    let caps = NOTICE_TAG_RE.captures(cleaned)?;
    let text = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
    Some(text)
}

/// Reconstruct the canonical signature from the declaration text following
/// the comment
fn guess_signature(name: &str, params: &str) -> String {
    let types: Vec<String> = params
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(canonical_param_type)
        .collect();
    format!("{}({})", name, types.join(","))
}

/// Canonicalize the type token of one raw parameter: `uint256[] _amounts`
/// keeps its array suffix, `SomeStruct x` becomes `address`, data location
/// and name are dropped.
fn canonical_param_type(param: &str) -> String {
    let type_text = param.split_whitespace().next().unwrap_or("");
    let (base, suffix) = match type_text.find('[') {
        Some(idx) => (&type_text[..idx], &type_text[idx..]),
        None => (type_text, ""),
    };
    let base = if is_elementary_type(base) {
        base
    } else {
        "address"
    };
    format!("{}{}", base, suffix)
}
