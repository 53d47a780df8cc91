//! Minimal CSS selector parsing and matching.

use webtailor_protocols::error::DocumentError;

use super::dom_document::Tree;
use webtailor_protocols::document::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
    nth_of_type: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compounds right-to-left; each carries the combinator linking it to the
/// compound on its left.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

/// A parsed comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, DocumentError> {
        let invalid = || DocumentError::InvalidSelector(input.to_string());

        let selectors = split_top_level(input, ',')
            .into_iter()
            .map(|part| parse_complex(part.trim()).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;

        if selectors.is_empty() {
            return Err(invalid());
        }
        Ok(Self { selectors })
    }

    pub(crate) fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        self.selectors.iter().any(|complex| match_complex(tree, node, &complex.parts, 0))
    }
}

fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, c) if c == sep && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn parse_complex(input: &str) -> Option<Complex> {
    if input.is_empty() {
        return None;
    }

    let chars: Vec<char> = input.chars().collect();
    let mut parts: Vec<(Combinator, Compound)> = Vec::new();
    let mut pending = Combinator::Descendant;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '>' {
            if parts.is_empty() {
                return None;
            }
            pending = Combinator::Child;
            i += 1;
            continue;
        }
        let (compound, next) = parse_compound(&chars, i)?;
        parts.push((pending, compound));
        pending = Combinator::Descendant;
        i = next;
    }

    if parts.is_empty() || pending == Combinator::Child {
        return None;
    }
    parts.reverse();
    Some(Complex { parts })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

fn parse_compound(chars: &[char], mut i: usize) -> Option<(Compound, usize)> {
    let mut compound = Compound::default();
    let start = i;

    if chars[i] == '*' {
        i += 1;
    } else if is_ident_char(chars[i]) {
        let (tag, next) = read_ident(chars, i);
        compound.tag = Some(tag.to_ascii_lowercase());
        i = next;
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (id, next) = read_ident(chars, i + 1);
                if id.is_empty() {
                    return None;
                }
                compound.id = Some(id);
                i = next;
            }
            '.' => {
                let (class, next) = read_ident(chars, i + 1);
                if class.is_empty() {
                    return None;
                }
                compound.classes.push(class);
                i = next;
            }
            '[' => {
                let end = i + chars[i..].iter().position(|&c| c == ']')?;
                let body: String = chars[i + 1..end].iter().collect();
                compound.attrs.push(parse_attr(&body)?);
                i = end + 1;
            }
            ':' => {
                let rest: String = chars[i..].iter().collect();
                let inner = rest.strip_prefix(":nth-of-type(")?;
                let close = inner.find(')')?;
                let n: usize = inner[..close].trim().parse().ok()?;
                if n == 0 {
                    return None;
                }
                compound.nth_of_type = Some(n);
                i += ":nth-of-type(".len() + inner[..close].chars().count() + 1;
            }
            c if c.is_whitespace() || c == '>' => break,
            _ => return None,
        }
    }

    (i > start).then_some((compound, i))
}

fn parse_attr(body: &str) -> Option<AttrSelector> {
    let ops: [(&str, fn(String) -> AttrOp); 4] = [
        ("*=", AttrOp::Contains),
        ("^=", AttrOp::Prefix),
        ("$=", AttrOp::Suffix),
        ("=", AttrOp::Equals),
    ];

    for (token, make) in ops {
        if let Some((name, value)) = body.split_once(token) {
            let name = name.trim();
            if name.is_empty() || !name.chars().all(is_ident_char) {
                return None;
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            return Some(AttrSelector {
                name: name.to_ascii_lowercase(),
                op: make(value.to_string()),
            });
        }
    }

    let name = body.trim();
    (!name.is_empty() && name.chars().all(is_ident_char)).then(|| AttrSelector {
        name: name.to_ascii_lowercase(),
        op: AttrOp::Exists,
    })
}

fn match_complex(tree: &Tree, node: NodeId, parts: &[(Combinator, Compound)], idx: usize) -> bool {
    let (combinator, compound) = &parts[idx];
    if !match_compound(tree, node, compound) {
        return false;
    }
    if idx + 1 == parts.len() {
        return true;
    }

    match combinator {
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|parent| match_complex(tree, parent, parts, idx + 1)),
        Combinator::Descendant => {
            let mut current = tree.parent(node);
            while let Some(ancestor) = current {
                if match_complex(tree, ancestor, parts, idx + 1) {
                    return true;
                }
                current = tree.parent(ancestor);
            }
            false
        }
    }
}

fn match_compound(tree: &Tree, node: NodeId, compound: &Compound) -> bool {
    let Some(data) = tree.get(node) else {
        return false;
    };

    if compound.tag.as_ref().is_some_and(|tag| *tag != data.tag) {
        return false;
    }
    if compound.id.is_some() && compound.id != data.id {
        return false;
    }
    if !compound.classes.iter().all(|c| data.classes.contains(c)) {
        return false;
    }
    for attr in &compound.attrs {
        let value = data.attribute(&attr.name);
        let ok = match (&attr.op, value) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(v), Some(actual)) => actual == v,
            (AttrOp::Contains(v), Some(actual)) => actual.contains(v.as_str()),
            (AttrOp::Prefix(v), Some(actual)) => actual.starts_with(v.as_str()),
            (AttrOp::Suffix(v), Some(actual)) => actual.ends_with(v.as_str()),
        };
        if !ok {
            return false;
        }
    }
    if let Some(n) = compound.nth_of_type {
        if tree.index_of_type(node) != Some(n) {
            return false;
        }
    }
    true
}
