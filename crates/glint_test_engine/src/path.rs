//! Item path patterns
//!
//! Segments are separated by `/`; a literal slash is written `\/`. A segment
//! of `*` matches exactly one segment, `**` matches any number (including
//! none). Patterns are relative to the test's reference unless they start
//! with `//`.

use crate::error::StepError;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Any,
    AnyDepth,
}

/// A parsed item path pattern
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemPath {
    source: String,
    segments: Vec<Segment>,
    absolute: bool,
}

impl ItemPath {
    pub fn parse(pattern: &str) -> Result<Self, StepError> {
        let (absolute, body) = match pattern.strip_prefix("//") {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let segments = split_segments(body)?
            .into_iter()
            .map(|segment| match segment.as_str() {
                "*" => Segment::Any,
                "**" => Segment::AnyDepth,
                _ => Segment::Literal(segment),
            })
            .collect();
        Ok(Self {
            source: pattern.to_string(),
            segments,
            absolute,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Prefix the reference path unless the pattern is absolute
    pub fn resolve(&self, reference: &[String]) -> ItemPath {
        if self.absolute || reference.is_empty() {
            return self.clone();
        }
        let mut segments: Vec<Segment> = reference
            .iter()
            .cloned()
            .map(Segment::Literal)
            .collect();
        segments.extend(self.segments.iter().cloned());
        ItemPath {
            source: self.source.clone(),
            segments,
            absolute: true,
        }
    }

    /// The concrete path, when the pattern has no wildcards
    pub fn literal(&self) -> Option<Vec<String>> {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        matches_from(&self.segments, path)
    }
}

fn matches_from<S: AsRef<str>>(pattern: &[Segment], path: &[S]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| matches_from(rest, &path[skip..]))
        }
        Some((head, rest)) => match path.split_first() {
            None => false,
            Some((segment, tail)) => {
                let ok = match head {
                    Segment::Literal(literal) => literal == segment.as_ref(),
                    _ => true,
                };
                ok && matches_from(rest, tail)
            }
        },
    }
}

/// Split on unescaped `/`, unescaping `\/` and `\\`
pub fn split_segments(body: &str) -> Result<Vec<String>, StepError> {
    if body.is_empty() {
        return Err(StepError::InvalidPath(body.to_string()));
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('/' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '/' => {
                if current.is_empty() {
                    return Err(StepError::InvalidPath(body.to_string()));
                }
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if current.is_empty() {
        return Err(StepError::InvalidPath(body.to_string()));
    }
    segments.push(current);
    Ok(segments)
}

/// Inverse of [`split_segments`]
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref().replace('\\', "\\\\").replace('/', "\\/"))
        .collect::<Vec<_>>()
        .join("/")
}
