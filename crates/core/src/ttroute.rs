//! Reliability route records: the named travel-time routes the server
//! continuously measures.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::EntityInfo;
use crate::error::CoreError;
use crate::route::Route;
use crate::types::DbId;
use crate::validation;

/// A travel-time reliability route.
///
/// `corridor` is denormalized from the route's first rnode so list
/// screens can group by corridor without resolving the network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TTRouteInfo {
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub corridor: Option<String>,
    pub description: Option<String>,
    pub route: Option<Route>,
}

impl TTRouteInfo {
    /// Build a record from a route, denormalizing name and corridor.
    pub fn from_route(route: Route, corridor: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(route.name.clone()),
            corridor: Some(corridor.into()),
            description: Some(route.desc.clone()),
            route: Some(route),
        }
    }

}

impl EntityInfo for TTRouteInfo {
    const ENTITY: &'static str = "route";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn sort_key(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    fn check(&self) -> Result<(), CoreError> {
        validation::check(self)?;
        match &self.route {
            Some(r) if !r.is_empty() => Ok(()),
            _ => Err(CoreError::Validation("route must contain rnodes".into())),
        }
    }
}
