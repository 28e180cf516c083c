// src/navigation/routes.rs

use super::models::{Layout, Route, RouteMeta};
use crate::auth::models::{ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_MENTOR};

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn find_by_path(&self, path: &str) -> Option<&Route> {
        let path = normalize(path);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Known route for `path`, or an unguarded placeholder for unknown paths
    pub fn resolve(&self, path: &str) -> Route {
        self.find_by_path(path)
            .cloned()
            .unwrap_or_else(|| Route::new("", normalize(path), RouteMeta::default()))
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(&['?', '#'][..]).next().unwrap_or(path);
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Routes of the learning platform
pub fn platform_routes() -> RouteTable {
    RouteTable::new(vec![
        Route::new("landing", "/", RouteMeta::public(Layout::Landing)),
        Route::new("auth", "/auth", RouteMeta::public(Layout::Auth)),
        // Member area
        Route::new("dashboard", "/dashboard", RouteMeta::member()),
        Route::new("courses", "/courses", RouteMeta::member()),
        Route::new("marketplace", "/marketplace", RouteMeta::member()),
        Route::new("community", "/community", RouteMeta::member()),
        Route::new("mentoring", "/mentoring", RouteMeta::member()),
        Route::new("discussion", "/discussion", RouteMeta::member()),
        Route::new("apply-instructor", "/apply-instructor", RouteMeta::member()),
        // Creator area
        Route::new(
            "manage-courses",
            "/my-courses",
            RouteMeta::restricted(&[ROLE_INSTRUCTOR, ROLE_ADMIN]),
        ),
        Route::new(
            "mentor-schedule",
            "/mentor-schedule",
            RouteMeta::restricted(&[ROLE_MENTOR, ROLE_ADMIN]),
        ),
        // Admin area
        Route::new("admin-users", "/admin/users", RouteMeta::restricted(&[ROLE_ADMIN])),
        Route::new(
            "admin-applications",
            "/admin/applications",
            RouteMeta::restricted(&[ROLE_ADMIN]),
        ),
        // Error
        Route::new("unauthorized", "/unauthorized", RouteMeta::public(Layout::Landing)),
    ])
}
