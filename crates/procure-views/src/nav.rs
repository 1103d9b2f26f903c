//! Site navigation links.

use crate::html::escape_html;

/// A top-level navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    /// Whether the link is highlighted when it matches the current path.
    pub highlights_active: bool,
}

/// Header navigation, in display order.
pub const NAV_LINKS: [NavLink; 4] = [
    NavLink {
        href: "/",
        label: "Home",
        highlights_active: true,
    },
    NavLink {
        href: "/products",
        label: "Products",
        highlights_active: true,
    },
    NavLink {
        href: "/about",
        label: "About Us",
        highlights_active: true,
    },
    NavLink {
        href: "/contact",
        label: "Contact",
        highlights_active: false,
    },
];

impl NavLink {
    /// Exact-match check against the current path.
    pub fn is_active(&self, current_path: &str) -> bool {
        self.highlights_active && self.href == current_path
    }

    pub fn render(&self, current_path: &str) -> String {
        let (class, aria) = if self.is_active(current_path) {
            ("nav-link nav-link--active", r#" aria-current="page""#)
        } else {
            ("nav-link", "")
        };
        format!(
            r#"<a href="{}" class="{}"{}>{}</a>"#,
            self.href,
            class,
            aria,
            escape_html(self.label)
        )
    }
}
