//! Page routing for the dashboard shell.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Dashboard,
    Profile,
    Settings,
    Bills,
    SearchBills,
    Notifications,
    Files,
    Holidays,
    Jobs,
}

impl Route {
    /// Every page reachable once signed in.
    pub const PAGES: &'static [Route] = &[
        Self::Dashboard,
        Self::Profile,
        Self::Settings,
        Self::Bills,
        Self::SearchBills,
        Self::Notifications,
        Self::Files,
        Self::Holidays,
        Self::Jobs,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::Settings => "/settings",
            Self::Bills => "/bills",
            Self::SearchBills => "/search-bills",
            Self::Notifications => "/notifications",
            Self::Files => "/files",
            Self::Holidays => "/holidays",
            Self::Jobs => "/jobs",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Dashboard => "Dashboard",
            Self::Profile => "Profile",
            Self::Settings => "Settings",
            Self::Bills => "Bill Management",
            Self::SearchBills => "Search Bills",
            Self::Notifications => "Notifications",
            Self::Files => "Files Directory",
            Self::Holidays => "Holiday Planner",
            Self::Jobs => "Jobs",
        }
    }

    /// Resolve a location. Signed-out users always land on the login page;
    /// signed-in users get the matching page, with `/` and anything unknown
    /// going to the dashboard.
    pub fn resolve(path: &str, authenticated: bool) -> Route {
        if !authenticated {
            return Self::Login;
        }
        let path = normalize(path);
        Self::PAGES
            .iter()
            .copied()
            .find(|route| route.path() == path)
            .unwrap_or(Self::Dashboard)
    }

    /// Header trail from the dashboard to this page.
    pub fn breadcrumb(self) -> Vec<&'static str> {
        match self {
            Self::Login => vec![Self::Login.title()],
            Self::Dashboard => vec![Self::Dashboard.title()],
            other => vec![Self::Dashboard.title(), other.title()],
        }
    }
}

/// Strip a query string, fragment and trailing slash.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub route: Route,
}

/// Sidebar entries, in display order.
pub fn sidebar() -> Vec<NavItem> {
    [
        Route::Dashboard,
        Route::Jobs,
        Route::Profile,
        Route::Bills,
        Route::SearchBills,
        Route::Notifications,
        Route::Files,
        Route::Holidays,
        Route::Settings,
    ]
    .into_iter()
    .map(|route| NavItem {
        name: route.title(),
        route,
    })
    .collect()
}

/// Whether a sidebar entry is highlighted for the current route.
pub fn is_active(item: &NavItem, current: Route) -> bool {
    item.route == current
}
