//! Route paths
//!
//! Paths always start with `/` and never end with `/`. A segment written
//! `:name` captures the request segment at its position.

use std::fmt;

use serde_json::{Map, Value};
use trellis_domain::error::{Error, Result};

/// Normalize a route path: leading `/`, no trailing `/`, no empty segments
pub fn cut_route_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Controller prefix followed by a method path
pub fn join_route_path(prefix: &str, relative: &str) -> String {
    cut_route_path(&format!("{prefix}/{relative}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// Parsed route path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    path: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse and validate a route path
    pub fn parse(path: &str) -> Result<Self> {
        let path = cut_route_path(path);
        let mut segments = Vec::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if let Some(name) = segment.strip_prefix(':') {
                if !is_identifier(name) {
                    return Err(Error::route_initialization(format!(
                        "Invalid parameter name \"{name}\" in route path \"{path}\""
                    )));
                }
                if segments.contains(&Segment::Param(name.to_string())) {
                    return Err(Error::route_initialization(format!(
                        "Parameter \"{name}\" is declared twice in route path \"{path}\""
                    )));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                if !segment.chars().all(is_static_char) {
                    return Err(Error::route_initialization(format!(
                        "Invalid segment \"{segment}\" in route path \"{path}\""
                    )));
                }
                segments.push(Segment::Static(segment.to_string()));
            }
        }
        Ok(Self { path, segments })
    }

    /// Normalized path text
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Names of the captured segments, in order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Whether the path captures no segment
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Static(_)))
    }

    /// Captured segments of `path`, or `None` if it does not match
    pub fn matches(&self, path: &str) -> Option<Map<String, Value>> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = Map::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) if text == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), Value::String(part.to_string()));
                }
            }
        }
        Some(params)
    }

    /// Ordering key; static segments sort before captures at each position
    pub fn rank(&self) -> Vec<u8> {
        self.segments
            .iter()
            .map(|segment| u8::from(matches!(segment, Segment::Param(_))))
            .collect()
    }

    /// Path with capture names erased; equal shapes match the same requests
    pub fn shape(&self) -> String {
        let mut shape = String::new();
        for segment in &self.segments {
            shape.push('/');
            match segment {
                Segment::Static(text) => shape.push_str(text),
                Segment::Param(_) => shape.push(':'),
            }
        }
        if shape.is_empty() {
            shape.push('/');
        }
        shape
    }

    /// Rocket route syntax, `/users/<id>`
    pub fn to_rocket(&self) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(text) => path.push_str(text),
                Segment::Param(name) => {
                    path.push('<');
                    path.push_str(name);
                    path.push('>');
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_static_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}
