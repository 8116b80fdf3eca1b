//! Application shell: routes, sidebar and the static pages.

use std::fmt;

pub const APP_NAME: &str = "AI Studio";

/// Client-side route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Projects,
    NewProject,
    Editor(String),
    Settings,
    ProPlan,
    NotFound(String),
}

impl Route {
    /// Parse a path; query string and fragment are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Route::Projects,
            "/settings" => Route::Settings,
            "/pro" => Route::ProPlan,
            "/projects/new" => Route::NewProject,
            other => match other.strip_prefix("/projects/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::Editor(id.to_string()),
                _ => Route::NotFound(path.to_string()),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Projects => "/".to_string(),
            Route::NewProject => "/projects/new".to_string(),
            Route::Editor(id) => format!("/projects/{}", urlencoding::encode(id)),
            Route::Settings => "/settings".to_string(),
            Route::ProPlan => "/pro".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

impl NavItem {
    /// Active only on an exact path match.
    pub fn is_active(&self, current_path: &str) -> bool {
        let current = current_path.split(['?', '#']).next().unwrap_or_default();
        current == self.path
    }

    /// `sidebar-pro-plan` style identifier.
    pub fn test_id(&self) -> String {
        format!("sidebar-{}", self.label.to_lowercase().replacen(' ', "-", 1))
    }
}

pub const NAV_ITEMS: [NavItem; 3] = [
    NavItem { label: "Projects", path: "/" },
    NavItem { label: "Settings", path: "/settings" },
    NavItem { label: "Pro Plan", path: "/pro" },
];

/// The sidebar call to action.
pub const NEW_PROJECT_LINK: NavItem = NavItem {
    label: "New Project",
    path: "/projects/new",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsSection {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SETTINGS_SUBTITLE: &str = "Manage your account and preferences.";

pub const SETTINGS_SECTIONS: [SettingsSection; 4] = [
    SettingsSection {
        title: "Profile",
        description: "Manage your profile information and preferences.",
    },
    SettingsSection {
        title: "Notifications",
        description: "Configure notification preferences and alerts.",
    },
    SettingsSection {
        title: "Security",
        description: "Manage password and security settings.",
    },
    SettingsSection {
        title: "Appearance",
        description: "Customize the look and feel of the application.",
    },
];

/// Marketing copy of the Pro plan page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProPlan {
    pub name: &'static str,
    pub tagline: &'static str,
    pub monthly_price: &'static str,
    pub yearly_offer: &'static str,
    pub features: &'static [&'static str],
}

pub const PRO_PLAN: ProPlan = ProPlan {
    name: "AI Studio Pro",
    tagline: "Everything you need to create professional AI-generated videos at scale.",
    monthly_price: "$29/month",
    yearly_offer: "or $290/year (save 16%)",
    features: &[
        "Unlimited video generation",
        "Priority processing",
        "4K resolution support",
        "Advanced AI voices",
        "Custom templates",
        "Commercial license",
        "Priority support",
        "Early access to new features",
    ],
};
