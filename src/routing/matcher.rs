//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile patterns like `/info/gene/{genes}/commonpathways` or `/datastore/{*rest}`
//! - Match request paths segment by segment and capture parameters
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Captures are returned raw (still percent-encoded); decoding is the caller's choice
//! - `{name}` never matches an empty segment; `{*name}` may capture nothing
//! - No regex to guarantee O(n) matching

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Tail(String),
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. A `{*tail}` segment is only honoured in last position.
    pub fn new(pattern: &str) -> Self {
        let parts: Vec<&str> = pattern.trim_start_matches('/').split('/').collect();
        let last = parts.len() - 1;

        let segments = parts
            .iter()
            .enumerate()
            .map(|(i, part)| match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) if i == last && name.starts_with('*') => {
                    Segment::Tail(name[1..].to_string())
                }
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(part.to_string()),
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match `path`, returning captured parameters in pattern order.
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let mut remaining = path.strip_prefix('/')?;
        let mut params = Vec::new();

        for (i, segment) in self.segments.iter().enumerate() {
            if let Segment::Tail(name) = segment {
                params.push((name.clone(), remaining.to_string()));
                return Some(params);
            }

            let is_last = i + 1 == self.segments.len();
            let (head, rest) = match remaining.split_once('/') {
                Some((head, rest)) if !is_last => (head, Some(rest)),
                Some(_) => return None,
                None if is_last => (remaining, None),
                None => return None,
            };

            match segment {
                Segment::Literal(literal) if literal == head => {}
                Segment::Param(name) if !head.is_empty() => {
                    params.push((name.clone(), head.to_string()));
                }
                _ => return None,
            }

            if let Some(rest) = rest {
                remaining = rest;
            }
        }

        Some(params)
    }
}
