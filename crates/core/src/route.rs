//! Travel-time route: an ordered run of roadway-network node names.
//!
//! A route stores node *names* only; resolving them against the loaded
//! roadway network is the infra crate's job.  This keeps route records
//! small on the wire and lets the same record survive network snapshot
//! updates.

use serde::{Deserialize, Serialize};

/// An ordered stretch of roadway, referenced by rnode names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// Ordered rnode names from upstream to downstream.
    #[serde(default)]
    pub rnodes: Vec<String>,
}

impl Route {
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            rnodes: Vec::new(),
        }
    }

    /// Append an rnode to the downstream end.
    pub fn add_rnode(&mut self, rnode_name: impl Into<String>) {
        self.rnodes.push(rnode_name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.rnodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rnodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_keeps_insertion_order() {
        let mut route = Route::new("route1", "");
        route.add_rnode("rnd_100");
        route.add_rnode("rnd_101");
        route.add_rnode("rnd_102");
        assert_eq!(route.rnodes, vec!["rnd_100", "rnd_101", "rnd_102"]);
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn route_serializes_with_defaults() {
        let route: Route = serde_json::from_str(r#"{"name":"r"}"#).unwrap();
        assert!(route.is_empty());
        assert_eq!(route.desc, "");
    }
}
