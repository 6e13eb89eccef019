//! Per-node permission tables.
//!
//! A table maps a principal (a user or role identifier) to the set of
//! capability tokens granted to it at one node. A principal that is absent
//! from the table holds nothing there. Tokens are compared whole, so a grant
//! of `read` never satisfies a check for `readwrite` and vice versa.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Conventional capability to read a node.
pub const READ: &str = "read";

/// Conventional capability to modify a node.
pub const WRITE: &str = "write";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `capability` to `principal`.
    ///
    /// Returns `false` if the principal already held it.
    pub fn grant(&mut self, principal: &str, capability: &str) -> Result<bool> {
        validate_token("principal", principal)?;
        validate_token("capability", capability)?;
        Ok(self
            .entries
            .entry(principal.to_string())
            .or_default()
            .insert(capability.to_string()))
    }

    /// Grant several capabilities at once. Nothing is granted if any token is invalid.
    pub fn grant_all<I, S>(&mut self, principal: &str, capabilities: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_token("principal", principal)?;
        let capabilities: Vec<S> = capabilities.into_iter().collect();
        for capability in &capabilities {
            validate_token("capability", capability.as_ref())?;
        }

        let granted = self.entries.entry(principal.to_string()).or_default();
        granted.extend(capabilities.iter().map(|c| c.as_ref().to_string()));
        if granted.is_empty() {
            self.entries.remove(principal);
        }
        Ok(())
    }

    /// Withdraw one capability. Returns whether it was held.
    pub fn revoke(&mut self, principal: &str, capability: &str) -> bool {
        let Some(granted) = self.entries.get_mut(principal) else {
            return false;
        };
        let removed = granted.remove(capability);
        if granted.is_empty() {
            self.entries.remove(principal);
        }
        removed
    }

    /// Withdraw everything granted to `principal`. Returns whether it had any entry.
    pub fn revoke_principal(&mut self, principal: &str) -> bool {
        self.entries.remove(principal).is_some()
    }

    /// Exact membership test.
    pub fn allows(&self, principal: &str, capability: &str) -> bool {
        self.entries
            .get(principal)
            .is_some_and(|granted| granted.contains(capability))
    }

    /// Capabilities held by `principal`, in lexicographic order.
    pub fn capabilities(&self, principal: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(principal)
            .into_iter()
            .flat_map(|granted| granted.iter().map(String::as_str))
    }

    pub fn principals(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of principals with at least one capability.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn validate_token(what: &'static str, token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::InvalidToken {
            what,
            reason: "must not be empty",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_denies() {
        let table = PermissionTable::new();
        assert!(table.is_empty());
        assert!(!table.allows("alice", READ));
    }

    #[test]
    fn grant_then_allow() {
        let mut table = PermissionTable::new();
        assert!(table.grant("alice", WRITE).unwrap());
        assert!(!table.grant("alice", WRITE).unwrap());
        assert!(table.allows("alice", WRITE));
        assert!(!table.allows("alice", READ));
        assert!(!table.allows("bob", WRITE));
    }

    #[test]
    fn tokens_match_exactly() {
        let mut table = PermissionTable::new();
        table.grant("alice", "readwrite").unwrap();
        table.grant("bob", READ).unwrap();

        assert!(!table.allows("alice", READ));
        assert!(!table.allows("alice", WRITE));
        assert!(!table.allows("bob", "readwrite"));
        assert!(!table.allows("bob", "rea"));
    }

    #[test]
    fn grant_all_is_atomic() {
        let mut table = PermissionTable::new();
        let result = table.grant_all("alice", [READ, ""]);
        assert!(matches!(result, Err(Error::InvalidToken { .. })));
        assert!(table.is_empty());

        table.grant_all("alice", [READ, WRITE]).unwrap();
        let caps: Vec<&str> = table.capabilities("alice").collect();
        assert_eq!(caps, vec![READ, WRITE]);
    }

    #[test]
    fn grant_all_with_nothing_leaves_no_entry() {
        let mut table = PermissionTable::new();
        table.grant_all("alice", Vec::<String>::new()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn empty_tokens_rejected() {
        let mut table = PermissionTable::new();
        assert!(table.grant("", READ).is_err());
        assert!(table.grant("alice", "").is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn revoke_drops_empty_principals() {
        let mut table = PermissionTable::new();
        table.grant_all("alice", [READ, WRITE]).unwrap();

        assert!(table.revoke("alice", READ));
        assert!(!table.revoke("alice", READ));
        assert_eq!(table.len(), 1);

        assert!(table.revoke("alice", WRITE));
        assert!(table.is_empty());
        assert!(!table.revoke("nobody", READ));
    }

    #[test]
    fn revoke_principal_removes_all() {
        let mut table = PermissionTable::new();
        table.grant_all("alice", [READ, WRITE]).unwrap();
        table.grant("bob", READ).unwrap();

        assert!(table.revoke_principal("alice"));
        assert!(!table.revoke_principal("alice"));
        let principals: Vec<&str> = table.principals().collect();
        assert_eq!(principals, vec!["bob"]);
    }

    #[test]
    fn serializes_as_sets() {
        let mut table = PermissionTable::new();
        table.grant_all("prof_smith", [WRITE, READ]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"prof_smith":["read","write"]}"#);
    }
}
