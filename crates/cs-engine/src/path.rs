// path.rs — The path-expression language.
//
// A path locates a value inside a contract's field tree:
//
//   path         := contract-ref ( '.' segment ( '.' segment | '[' key ']' )* )?
//   contract-ref := '$self' | '@' field-name | qualified-address
//   segment      := identifier
//   key          := qualified-address | identifier | digits
//
// Examples:
//   $self.owner
//   $self.accessControl.PAUSER_ROLE.members
//   @governor.signers[0]
//   eth:0xabcd.acl.permissions[eth:0x12][ROLE].entities
//
// Parsing is strict: an expression either matches the grammar or fails
// with MalformedPath. What the named fields and keys mean is the
// evaluator's business.

use std::fmt;

use cs_model::Address;

use crate::error::PathError;

/// Where evaluation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRoot {
    /// The contract the enclosing function is defined on.
    SelfRef,
    /// Re-root at the address held by this field of the current
    /// contract.
    FieldRef(String),
    /// Re-root at an explicit qualified address.
    Address(Address),
}

/// One step into the value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.name` — a field or object-key lookup.
    Field(String),
    /// `[key]` — a dynamic key: array index, role name, or address.
    Key(String),
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    pub root: PathRoot,
    pub segments: Vec<Segment>,
}

impl PathExpr {
    /// Parse an expression, normalizing any embedded addresses.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let malformed = || PathError::MalformedPath(input.to_string());
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(malformed());
        }

        // The root token runs to the first '.' or '['.
        let root_end = trimmed
            .find(['.', '['])
            .unwrap_or(trimmed.len());
        let (root_token, mut rest) = trimmed.split_at(root_end);

        let root = if root_token == "$self" {
            PathRoot::SelfRef
        } else if let Some(name) = root_token.strip_prefix('@') {
            if !is_identifier(name) {
                return Err(malformed());
            }
            PathRoot::FieldRef(name.to_string())
        } else if root_token.contains(':') {
            let address = root_token.parse().map_err(|_| malformed())?;
            PathRoot::Address(address)
        } else {
            return Err(malformed());
        };

        let mut segments = Vec::new();
        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                let end = after_dot.find(['.', '[']).unwrap_or(after_dot.len());
                let (name, tail) = after_dot.split_at(end);
                if !is_identifier(name) {
                    return Err(malformed());
                }
                segments.push(Segment::Field(name.to_string()));
                rest = tail;
            } else if let Some(after_bracket) = rest.strip_prefix('[') {
                let end = after_bracket.find(']').ok_or_else(malformed)?;
                let key = &after_bracket[..end];
                if key.is_empty() {
                    return Err(malformed());
                }
                segments.push(Segment::Key(key.to_string()));
                rest = &after_bracket[end + 1..];
            } else {
                return Err(malformed());
            }
        }

        Ok(Self { root, segments })
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            PathRoot::SelfRef => write!(f, "$self")?,
            PathRoot::FieldRef(name) => write!(f, "@{}", name)?,
            PathRoot::Address(address) => write!(f, "{}", address)?,
        }
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Key(key) => write!(f, "[{}]", key)?,
            }
        }
        Ok(())
    }
}

/// Identifiers: ASCII letters, digits, `_` and `$`, not starting with
/// a digit. Role names like `PAUSER_ROLE` and camelCase field names
/// both qualify.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_self_only() {
        let expr = PathExpr::parse("$self").unwrap();
        assert_eq!(expr.root, PathRoot::SelfRef);
        assert!(expr.segments.is_empty());
    }

    #[test]
    fn parse_self_with_fields() {
        let expr = PathExpr::parse("$self.accessControl.PAUSER_ROLE.members").unwrap();
        assert_eq!(expr.root, PathRoot::SelfRef);
        assert_eq!(
            expr.segments,
            vec![
                Segment::Field("accessControl".to_string()),
                Segment::Field("PAUSER_ROLE".to_string()),
                Segment::Field("members".to_string()),
            ]
        );
    }

    #[test]
    fn parse_field_ref_root() {
        let expr = PathExpr::parse("@governor.signers[0]").unwrap();
        assert_eq!(expr.root, PathRoot::FieldRef("governor".to_string()));
        assert_eq!(
            expr.segments,
            vec![
                Segment::Field("signers".to_string()),
                Segment::Key("0".to_string()),
            ]
        );
    }

    #[test]
    fn parse_address_root_with_bracket_keys() {
        let expr = PathExpr::parse("eth:0xABCD.acl.permissions[eth:0x12][ROLE].entities").unwrap();
        assert_eq!(
            expr.root,
            PathRoot::Address("eth:0xabcd".parse().unwrap())
        );
        assert_eq!(
            expr.segments,
            vec![
                Segment::Field("acl".to_string()),
                Segment::Field("permissions".to_string()),
                Segment::Key("eth:0x12".to_string()),
                Segment::Key("ROLE".to_string()),
                Segment::Field("entities".to_string()),
            ]
        );
    }

    #[test]
    fn display_round_trip() {
        for path in [
            "$self",
            "$self.owner",
            "@governor.signers[0]",
            "eth:0xabcd.acl[eth:0x12][ROLE].entities",
        ] {
            let expr = PathExpr::parse(path).unwrap();
            assert_eq!(expr.to_string(), path);
        }
    }

    #[test]
    fn rejects_empty_and_garbage() {
        for bad in ["", "  ", "owner", "$self.", "$self..x", "@", "@!bad", "$self.ow ner"] {
            assert!(
                matches!(PathExpr::parse(bad), Err(PathError::MalformedPath(_))),
                "expected malformed: {:?}",
                bad
            );
        }
    }

    #[test]
    fn rejects_unclosed_and_empty_brackets() {
        assert!(PathExpr::parse("$self.signers[0").is_err());
        assert!(PathExpr::parse("$self.signers[]").is_err());
    }

    #[test]
    fn rejects_bad_address_root() {
        assert!(PathExpr::parse("eth:nothex.owner").is_err());
    }

    #[test]
    fn address_root_is_normalized() {
        let expr = PathExpr::parse("ETH:0xAB.owner").unwrap();
        assert_eq!(expr.root, PathRoot::Address("eth:0xab".parse().unwrap()));
    }
}
