//! Filter-to-key matching for overwrite-by-filter.
//!
//! Computes exactly which partition keys a set of filters covers. A key
//! is eligible for removal only when every partition field is constrained
//! by an equality predicate; any filter that cannot be fully attributed
//! to partition-field equality fails the whole request. Approximate
//! overwrite semantics on partitioned data are worse than a hard failure,
//! so there are no partial matches and nothing is mutated here.

use std::collections::HashSet;

use terrace_model::{BinaryOp, Expr, Value};

use crate::error::{StoreError, StoreResult};
use crate::partition::{BoundPartitionSpec, PartitionKey};

/// One `field = literal` requirement, positioned within the key.
#[derive(Debug)]
struct Binding {
    key_index: usize,
    value: Value,
}

/// Computes the exact set of existing partition keys covered by `filters`.
///
/// The filter list is an implicit conjunction. Returns
/// [`StoreError::UnsupportedFilter`] if any predicate is not an equality
/// on a partition field, or if some partition field is left unconstrained.
pub fn matching_keys<'a>(
    existing: impl IntoIterator<Item = &'a PartitionKey>,
    spec: &BoundPartitionSpec,
    filters: &[Expr],
) -> StoreResult<HashSet<PartitionKey>> {
    if filters.is_empty() && !spec.is_unpartitioned() {
        // An empty filter would silently cover every partition; callers
        // who want that must ask for truncate.
        return Err(StoreError::unsupported_filter(
            "empty filter on a partitioned table; use truncate to remove all partitions",
        ));
    }

    let mut bindings = Vec::new();
    for filter in filters {
        collect_bindings(filter, spec, &mut bindings)?;
    }

    for (index, name) in spec.field_names().iter().enumerate() {
        if !bindings.iter().any(|b| b.key_index == index) {
            return Err(StoreError::unsupported_filter(format!(
                "partition field `{}` is not constrained by an equality filter",
                name
            )));
        }
    }

    // A field bound to two different literals satisfies no key, which
    // falls out of requiring every binding to hold.
    Ok(existing
        .into_iter()
        .filter(|key| {
            bindings
                .iter()
                .all(|b| key.values()[b.key_index] == b.value)
        })
        .cloned()
        .collect())
}

/// Flattens `expr` through AND into equality bindings.
fn collect_bindings(
    expr: &Expr,
    spec: &BoundPartitionSpec,
    out: &mut Vec<Binding>,
) -> StoreResult<()> {
    match expr {
        Expr::BinaryOp {
            left,
            op: BinaryOp::And,
            right,
        } => {
            collect_bindings(left, spec, out)?;
            collect_bindings(right, spec, out)
        }
        Expr::BinaryOp { left, op, right } => {
            if *op != BinaryOp::Eq {
                return Err(StoreError::unsupported_filter(format!(
                    "operator {} cannot be mapped to partition removal",
                    op
                )));
            }
            let (name, value) = match (left.as_ref(), right.as_ref()) {
                (Expr::Column(name), Expr::Literal(value))
                | (Expr::Literal(value), Expr::Column(name)) => (name, value),
                _ => {
                    return Err(StoreError::unsupported_filter(format!(
                        "equality must compare a column with a literal, got {}",
                        expr
                    )));
                }
            };
            let key_index = spec.key_index_of(name).ok_or_else(|| {
                StoreError::unsupported_filter(format!(
                    "filter references non-partition field `{}`",
                    name
                ))
            })?;
            out.push(Binding {
                key_index,
                value: value.clone(),
            });
            Ok(())
        }
        Expr::Column(_) | Expr::Literal(_) => Err(StoreError::unsupported_filter(format!(
            "bare expression {} is not an equality predicate",
            expr
        ))),
    }
}
