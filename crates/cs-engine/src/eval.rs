// eval.rs — Path evaluation against the discovered snapshot.
//
// Evaluation walks a parsed PathExpr over a contract's value tree and
// ends in one of four terminal shapes:
//
//   address  → that single address
//   array    → every address leaf inside, structure not preserved
//   object   → every address leaf inside, whole subtree preserved so
//              callers can still tell role-admin from role-members
//   scalar   → no addresses, the scalar preserved
//
// An address value reached mid-path is never followed into the other
// contract; only an explicit `@field` root crosses contracts. Hitting
// one with segments left simply ends the walk at that address.

use cs_model::{Address, DiscoveredSnapshot, FieldValue};

use crate::error::PathError;
use crate::path::{PathExpr, PathRoot, Segment};

/// The outcome of evaluating one path expression.
///
/// `addresses` is in document order and may contain duplicates; the
/// owner resolver deduplicates. All values are owned copies.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResolution {
    pub addresses: Vec<Address>,
    pub structured: Option<FieldValue>,
}

/// Evaluates path expressions against one snapshot.
pub struct PathEvaluator<'a> {
    snapshot: &'a DiscoveredSnapshot,
}

impl<'a> PathEvaluator<'a> {
    pub fn new(snapshot: &'a DiscoveredSnapshot) -> Self {
        Self { snapshot }
    }

    /// Parse and evaluate in one step.
    pub fn evaluate_str(
        &self,
        path: &str,
        self_address: &Address,
    ) -> Result<PathResolution, PathError> {
        let expr = PathExpr::parse(path)?;
        self.evaluate(&expr, self_address)
    }

    /// Evaluate an expression with `$self` bound to `self_address`.
    pub fn evaluate(
        &self,
        expr: &PathExpr,
        self_address: &Address,
    ) -> Result<PathResolution, PathError> {
        let root = self.resolve_root(&expr.root, self_address)?;
        let entry = self
            .snapshot
            .entry(&root)
            .ok_or_else(|| PathError::UnknownContract(root.clone()))?;

        // A bare contract-ref yields the contract's own address.
        let Some((first, tail)) = expr.segments.split_first() else {
            return Ok(PathResolution {
                addresses: vec![root],
                structured: None,
            });
        };

        // The first segment is a field lookup on the contract entry
        // (legacy values map first, then the fields sequence).
        let first_name = segment_text(first);
        let mut node = entry
            .field(first_name)
            .ok_or_else(|| PathError::UnknownField {
                contract: root.clone(),
                field: first_name.to_string(),
            })?;
        let mut at = format!("{}.{}", root, first_name);

        for segment in tail {
            // Address values are not followed mid-path; the walk ends
            // here and the remaining segments are ignored.
            if let FieldValue::Address { value, .. } = node {
                tracing::debug!(at = %at, address = %value, "address reached mid-path; not following");
                return Ok(terminal(node));
            }
            node = descend(node, segment, &root, &at)?;
            at = match segment {
                Segment::Field(name) => format!("{}.{}", at, name),
                Segment::Key(key) => format!("{}[{}]", at, key),
            };
        }

        Ok(terminal(node))
    }

    fn resolve_root(&self, root: &PathRoot, self_address: &Address) -> Result<Address, PathError> {
        match root {
            PathRoot::SelfRef => Ok(self_address.clone()),
            PathRoot::Address(address) => Ok(address.clone()),
            PathRoot::FieldRef(name) => {
                let entry = self
                    .snapshot
                    .entry(self_address)
                    .ok_or_else(|| PathError::UnknownContract(self_address.clone()))?;
                let value = entry.field(name).ok_or_else(|| PathError::UnknownField {
                    contract: self_address.clone(),
                    field: name.to_string(),
                })?;
                match value {
                    FieldValue::Address { value, .. } => Ok(value.clone()),
                    other => Err(PathError::TypeMismatch {
                        at: format!("@{}", name),
                        reason: format!("expected address, found {}", kind_of(other)),
                    }),
                }
            }
        }
    }
}

/// One step down into a structured value.
fn descend<'v>(
    node: &'v FieldValue,
    segment: &Segment,
    contract: &Address,
    at: &str,
) -> Result<&'v FieldValue, PathError> {
    match node {
        FieldValue::Object { entries } => {
            let key = segment_text(segment);
            // Literal key first.
            if let Some(v) = entries.get(key) {
                return Ok(v);
            }
            // Dynamic bracket keys fall back to address-normalized and
            // role-name matching; dotted field access is literal only.
            if matches!(segment, Segment::Key(_)) {
                // Keys that are addresses compare on the normalized form.
                if let Ok(wanted) = key.parse::<Address>() {
                    if let Some(v) = entries
                        .iter()
                        .find(|(k, _)| k.parse::<Address>().is_ok_and(|a| a == wanted))
                        .map(|(_, v)| v)
                    {
                        return Ok(v);
                    }
                }
                // Role-table keys match case-insensitively.
                if let Some(v) = entries
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
                {
                    return Ok(v);
                }
            }
            Err(PathError::UnknownField {
                contract: contract.clone(),
                field: key.to_string(),
            })
        }
        FieldValue::Array { items } => {
            let key = segment_text(segment);
            let index: usize = key.parse().map_err(|_| PathError::TypeMismatch {
                at: at.to_string(),
                reason: format!("array requires a numeric index, got '{}'", key),
            })?;
            items.get(index).ok_or(PathError::IndexOutOfRange {
                index,
                len: items.len(),
            })
        }
        other => Err(PathError::TypeMismatch {
            at: at.to_string(),
            reason: format!(
                "cannot descend into {} with '{}'",
                kind_of(other),
                segment_text(segment)
            ),
        }),
    }
}

/// Terminal collection per node shape.
fn terminal(node: &FieldValue) -> PathResolution {
    match node {
        FieldValue::Address { value, .. } => PathResolution {
            addresses: vec![value.clone()],
            structured: None,
        },
        FieldValue::Array { .. } => {
            let mut addresses = Vec::new();
            node.collect_addresses(&mut addresses);
            PathResolution {
                addresses,
                structured: None,
            }
        }
        FieldValue::Object { .. } => {
            let mut addresses = Vec::new();
            node.collect_addresses(&mut addresses);
            PathResolution {
                addresses,
                structured: Some(node.clone()),
            }
        }
        scalar => PathResolution {
            addresses: Vec::new(),
            structured: Some(scalar.clone()),
        },
    }
}

fn segment_text(segment: &Segment) -> &str {
    match segment {
        Segment::Field(name) => name,
        Segment::Key(key) => key,
    }
}

fn kind_of(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Address { .. } => "address",
        FieldValue::Hex { .. } => "hex",
        FieldValue::String { .. } => "string",
        FieldValue::Number { .. } => "number",
        FieldValue::Boolean { .. } => "boolean",
        FieldValue::Array { .. } => "array",
        FieldValue::Object { .. } => "object",
        FieldValue::Unknown => "unknown",
        FieldValue::Error { .. } => "error",
    }
}
