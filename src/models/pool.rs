//! Resource pools.
//!
//! A pool is the ordered set of candidates a task may be assigned to.
//! Catalogs are either flat (one list, e.g. testers) or partitioned by group
//! key (e.g. `GRID`, `ERP`). The default pool is the union of the flat list
//! and every group, and serves tasks without a group or with an unknown one.
//!
//! # Ordering
//! Iteration order decides ties between equally eligible resources, so it is
//! part of the contract: groups keep their declaration order, and the default
//! pool lists each name at the position it was first declared, carrying the
//! settings of its last declaration.

use serde::{Deserialize, Serialize};

use super::Resource;

/// A named partition of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    /// Group key as it appears in the grouping column.
    pub name: String,
    /// Candidates in declaration order.
    pub resources: Vec<Resource>,
}

/// Resource catalog, optionally partitioned by group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePool {
    flat: Vec<Resource>,
    groups: Vec<ResourceGroup>,
    default: Vec<Resource>,
}

impl ResourcePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unpartitioned pool.
    pub fn flat(resources: Vec<Resource>) -> Self {
        let mut pool = Self {
            flat: resources,
            ..Self::default()
        };
        pool.rebuild_default();
        pool
    }

    /// Adds a group.
    pub fn with_group(mut self, name: impl Into<String>, resources: Vec<Resource>) -> Self {
        self.groups.push(ResourceGroup {
            name: name.into(),
            resources,
        });
        self.rebuild_default();
        self
    }

    /// Adds an ungrouped resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.flat.push(resource);
        self.rebuild_default();
        self
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[ResourceGroup] {
        &self.groups
    }

    /// Ungrouped resources in declaration order.
    pub fn ungrouped(&self) -> &[Resource] {
        &self.flat
    }

    /// The union of all resources.
    pub fn default_pool(&self) -> &[Resource] {
        &self.default
    }

    /// Whether the pool has no resources at all.
    pub fn is_empty(&self) -> bool {
        self.default.is_empty()
    }

    /// Looks up a group by key, ignoring case.
    pub fn group(&self, name: &str) -> Option<&ResourceGroup> {
        let wanted = name.trim();
        self.groups
            .iter()
            .find(|g| g.name.trim().to_uppercase() == wanted.to_uppercase())
    }

    /// Candidates for a task with the given group key.
    ///
    /// Falls back to the default pool when the key is absent or unknown.
    pub fn candidates(&self, group: Option<&str>) -> &[Resource] {
        group
            .and_then(|g| self.group(g))
            .map_or(self.default.as_slice(), |g| g.resources.as_slice())
    }

    /// Finds a resource in the default pool by name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.default.iter().find(|r| r.name == name)
    }

    fn rebuild_default(&mut self) {
        let mut merged: Vec<Resource> = Vec::new();
        let all = self
            .flat
            .iter()
            .chain(self.groups.iter().flat_map(|g| g.resources.iter()));
        for r in all {
            match merged.iter_mut().find(|m| m.name == r.name) {
                Some(slot) => *slot = r.clone(),
                None => merged.push(r.clone()),
            }
        }
        self.default = merged;
    }
}
