//! Cross-referencing used identifiers against the defined inventory.

use std::{collections::BTreeSet, fmt};

use serde::Serialize;

use super::{aggregator::ResultSet, mapper::DefinedInventory};

/// Plain set difference between used and defined identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageDiff {
    /// Defined but never used.
    pub unused: BTreeSet<String>,
    /// Used but never defined.
    pub undefined: BTreeSet<String>,
}

pub fn compute_diff(used: &BTreeSet<String>, defined: &BTreeSet<String>) -> UsageDiff {
    UsageDiff {
        unused: defined.difference(used).cloned().collect(),
        undefined: used.difference(defined).cloned().collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerifyStatus {
    Ok,
    MissingNamespace,
    MissingId,
}

impl fmt::Display for VerifyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyStatus::Ok => write!(f, "ok"),
            VerifyStatus::MissingNamespace => write!(f, "namespace not defined"),
            VerifyStatus::MissingId => write!(f, "statement id not defined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub identifier: String,
    /// Namespace the identifier was resolved against, if it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub status: VerifyStatus,
}

/// Verify one used identifier.
///
/// A dotted identifier is split into namespace and id: at the end of the
/// longest prefix that is a defined namespace, otherwise at the first `.`.
/// The id only has to exist under some namespace, not necessarily this one.
pub fn verify(identifier: &str, inventory: &DefinedInventory) -> Verification {
    let Some((namespace, id)) = split_identifier(identifier, inventory) else {
        let status = if inventory.has_bare_id(identifier) {
            VerifyStatus::Ok
        } else {
            VerifyStatus::MissingId
        };
        return Verification {
            identifier: identifier.to_string(),
            namespace: None,
            status,
        };
    };

    let status = if !inventory.has_namespace(namespace) {
        VerifyStatus::MissingNamespace
    } else if !inventory.has_bare_id(id) {
        VerifyStatus::MissingId
    } else {
        VerifyStatus::Ok
    };

    Verification {
        identifier: identifier.to_string(),
        namespace: Some(namespace.to_string()),
        status,
    }
}

fn split_identifier<'a>(
    identifier: &'a str,
    inventory: &DefinedInventory,
) -> Option<(&'a str, &'a str)> {
    identifier
        .match_indices('.')
        .rev()
        .map(|(i, _)| (&identifier[..i], &identifier[i + 1..]))
        .find(|(namespace, _)| inventory.has_namespace(namespace))
        .or_else(|| identifier.split_once('.'))
}

/// Result of checking a scan against an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    /// One entry per used identifier, in lexical order.
    pub verifications: Vec<Verification>,
    /// Qualified ids of defined statements nothing refers to.
    pub unused: Vec<String>,
}

impl UsageReport {
    /// Starts from the plain [`compute_diff`] of used against defined ids.
    /// A statement left over as unused is still counted as used when its bare
    /// id is used on its own.
    pub fn build(results: &ResultSet, inventory: &DefinedInventory) -> Self {
        let verifications = results
            .identifiers()
            .map(|id| verify(id, inventory))
            .collect();

        let defined: BTreeSet<String> = inventory.qualified_ids().map(str::to_string).collect();
        let diff = compute_diff(&results.to_set(), &defined);
        let unused = diff
            .unused
            .into_iter()
            .filter(|qualified| {
                inventory
                    .get(qualified)
                    .is_none_or(|statement| !results.contains(&statement.id))
            })
            .collect();

        Self {
            verifications,
            unused,
        }
    }

    /// Verifications that failed.
    pub fn undefined(&self) -> impl Iterator<Item = &Verification> {
        self.verifications
            .iter()
            .filter(|v| v.status != VerifyStatus::Ok)
    }

    pub fn undefined_count(&self) -> usize {
        self.undefined().count()
    }

    pub fn is_clean(&self) -> bool {
        self.undefined_count() == 0
    }
}
