//! Endpoint registry for the analysis server.
//!
//! Path layout follows the server's URL modules: admin CRUD surfaces
//! under `/tetres/adm/<slug>/...`, the user-facing estimation interface
//! under `/tetres/user/estimation...`, and the roadway-network snapshot
//! under `/ticas/infra`.

/// The URL set backing one entity client.
///
/// Operations an entity does not expose stay `None`; calling them
/// yields [`crate::ApiError::Unsupported`].
#[derive(Debug, Clone, Default)]
pub struct EndpointSet {
    pub list: Option<String>,
    pub list_by_year: Option<String>,
    pub get: Option<String>,
    pub insert: Option<String>,
    pub insert_all: Option<String>,
    pub update: Option<String>,
    pub delete: Option<String>,
    pub years: Option<String>,
}

impl EndpointSet {
    /// Standard admin CRUD set (`list`, `get`, `add`, `update`,
    /// `delete`) for an entity slug.
    fn admin_crud(base: &str, slug: &str) -> Self {
        Self {
            list: Some(format!("{base}/tetres/adm/{slug}/list")),
            get: Some(format!("{base}/tetres/adm/{slug}/get")),
            insert: Some(format!("{base}/tetres/adm/{slug}/add")),
            update: Some(format!("{base}/tetres/adm/{slug}/update")),
            delete: Some(format!("{base}/tetres/adm/{slug}/delete")),
            ..Default::default()
        }
    }

    fn with_years(mut self, base: &str, slug: &str) -> Self {
        self.list_by_year = Some(format!("{base}/tetres/adm/{slug}/list/year"));
        self.years = Some(format!("{base}/tetres/adm/{slug}/years"));
        self
    }

    fn with_insert_all(mut self, base: &str, slug: &str) -> Self {
        self.insert_all = Some(format!("{base}/tetres/adm/{slug}/add_all"));
        self
    }
}

/// All endpoint sets for one configured server.
#[derive(Debug, Clone)]
pub struct ApiUrls {
    base: String,
}

impl ApiUrls {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    // ---- entity endpoint sets ----

    pub fn ttroute(&self) -> EndpointSet {
        EndpointSet::admin_crud(&self.base, "route")
    }

    /// Extra operation of the reliability-route surface.
    pub fn ttroute_opposite(&self) -> String {
        format!("{}/tetres/adm/route/opposite_route", self.base)
    }

    pub fn workzone_group(&self) -> EndpointSet {
        EndpointSet::admin_crud(&self.base, "wz_group").with_years(&self.base, "wz_group")
    }

    pub fn workzone(&self) -> EndpointSet {
        EndpointSet::admin_crud(&self.base, "wz").with_years(&self.base, "wz")
    }

    pub fn special_event(&self) -> EndpointSet {
        EndpointSet::admin_crud(&self.base, "sevent")
            .with_years(&self.base, "sevent")
            .with_insert_all(&self.base, "sevent")
    }

    pub fn snow_route(&self) -> EndpointSet {
        EndpointSet::admin_crud(&self.base, "snowroute")
    }

    pub fn snow_event(&self) -> EndpointSet {
        EndpointSet::admin_crud(&self.base, "snowevent").with_years(&self.base, "snowevent")
    }

    pub fn snow_management(&self) -> EndpointSet {
        EndpointSet::admin_crud(&self.base, "snowmgmt").with_insert_all(&self.base, "snowmgmt")
    }

    /// Action log is read-and-acknowledge only.
    pub fn action_log(&self) -> EndpointSet {
        EndpointSet {
            list: Some(format!("{}/tetres/adm/actionlog/list", self.base)),
            ..Default::default()
        }
    }

    pub fn action_log_proceed(&self) -> String {
        format!("{}/tetres/adm/actionlog/proceed", self.base)
    }

    /// System configuration is a single record with its own surface.
    pub fn system_config_get(&self) -> String {
        format!("{}/tetres/adm/syscfg/get", self.base)
    }

    pub fn system_config_update(&self) -> String {
        format!("{}/tetres/adm/syscfg/update", self.base)
    }

    // ---- estimation ----

    pub fn estimation_submit(&self) -> String {
        format!("{}/tetres/user/estimation", self.base)
    }

    pub fn estimation_result(&self) -> String {
        format!("{}/tetres/user/estimation/result", self.base)
    }

    pub fn estimation_download(&self, uid: &str) -> String {
        format!("{}/tetres/user/estimation/download?uid={uid}", self.base)
    }

    // ---- roadway network ----

    pub fn infra(&self) -> String {
        format!("{}/ticas/infra", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let urls = ApiUrls::new("http://tetres.example:5000/");
        assert_eq!(
            urls.special_event().list.as_deref(),
            Some("http://tetres.example:5000/tetres/adm/sevent/list")
        );
    }

    #[test]
    fn special_event_supports_bulk_insert() {
        let urls = ApiUrls::new("http://localhost:5000");
        let endpoints = urls.special_event();
        assert!(endpoints.insert_all.is_some());
        assert!(endpoints.years.is_some());
    }

    #[test]
    fn snow_route_has_no_year_operations() {
        let endpoints = ApiUrls::new("http://localhost:5000").snow_route();
        assert!(endpoints.years.is_none());
        assert!(endpoints.list_by_year.is_none());
    }

    #[test]
    fn action_log_is_list_only() {
        let endpoints = ApiUrls::new("http://localhost:5000").action_log();
        assert!(endpoints.list.is_some());
        assert!(endpoints.delete.is_none());
        assert!(endpoints.insert.is_none());
    }

    #[test]
    fn download_url_carries_uid_query() {
        let urls = ApiUrls::new("http://localhost:5000");
        assert_eq!(
            urls.estimation_download("est_42"),
            "http://localhost:5000/tetres/user/estimation/download?uid=est_42"
        );
    }
}
