//! Path resolution against a scope.
//!
//! Reference syntax:
//!
//! ```text
//! $.order.items[0].sku     // "$." prefix is optional
//! order["line-items"][2]   // quoted keys for names that aren't identifiers
//! ```
//!
//! The root name must exist in the scope. Past the root, a missing field or
//! an out-of-range index evaluates to `null`.

use trigon_core::{ExprError, Resolution, Resolver, Scope, Value};

/// Binds references as paths into the evaluation scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeResolver;

impl Resolver for ScopeResolver {
    fn get_resolution(&self, reference: &str) -> Result<Box<dyn Resolution>, ExprError> {
        Ok(Box::new(PathResolution::parse(reference)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// A parsed scope path: a root name followed by field and index segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolution {
    root: String,
    segments: Vec<Segment>,
}

impl PathResolution {
    /// Parses a reference string.
    pub fn parse(reference: &str) -> Result<Self, ExprError> {
        let invalid = |reason: &str| ExprError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        let path = reference.trim();
        let path = path.strip_prefix("$.").unwrap_or(path);

        let root_end = path.find(['.', '[']).unwrap_or(path.len());
        let root = &path[..root_end];
        if root.is_empty() || root.starts_with('$') {
            return Err(invalid("missing root name"));
        }

        let mut segments = Vec::new();
        let mut rest = &path[root_end..];
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(['.', '[']).unwrap_or(after.len());
                let name = &after[..end];
                if name.is_empty() {
                    return Err(invalid("empty field name"));
                }
                segments.push(Segment::Field(name.to_string()));
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let inner = after[..end].trim();
                let segment = match strip_quotes(inner) {
                    Some(key) => Segment::Field(key.to_string()),
                    None => Segment::Index(
                        inner
                            .parse()
                            .map_err(|_| invalid("index must be a non-negative integer"))?,
                    ),
                };
                segments.push(segment);
                rest = &after[end + 1..];
            } else {
                return Err(invalid("expected '.' or '['"));
            }
        }

        Ok(Self {
            root: root.to_string(),
            segments,
        })
    }

    /// The top-level scope name this path starts from.
    pub fn root(&self) -> &str {
        &self.root
    }
}

fn strip_quotes(s: &str) -> Option<&str> {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
}

impl Resolution for PathResolution {
    fn get_value(&self, scope: &dyn Scope) -> Result<Value, ExprError> {
        let mut current = scope
            .get_value(&self.root)
            .ok_or_else(|| ExprError::UnknownReference(self.root.clone()))?;

        for segment in &self.segments {
            let next = match (segment, current) {
                (Segment::Field(name), Value::Object(map)) => map.get(name),
                (Segment::Index(index), Value::Array(items)) => items.get(*index),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Ok(Value::Null),
            }
        }

        Ok(current.clone())
    }
}
