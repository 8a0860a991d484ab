//! Dashboard configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::views::{ModulesView, SummaryView, View};

/// Views the dashboard can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Summary,
    Modules,
}

impl ViewKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Modules => "modules",
        }
    }

    /// Construct the renderer for this view.
    pub fn build(&self) -> Box<dyn View> {
        match self {
            Self::Summary => Box::new(SummaryView),
            Self::Modules => Box::new(ModulesView),
        }
    }
}

/// How frames are written to the output surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text tables.
    #[default]
    Text,
    /// One JSON document per frame.
    Json,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Views to render, in display order.
    #[serde(default = "default_views")]
    pub views: Vec<ViewKind>,
    /// Clear the terminal before each text frame.
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_views() -> Vec<ViewKind> {
    vec![ViewKind::Summary, ViewKind::Modules]
}

fn default_clear_screen() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            views: default_views(),
            clear_screen: default_clear_screen(),
            output: OutputFormat::default(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.views.is_empty() {
            return Err(DashboardError::NoViews);
        }
        Ok(())
    }

    pub fn view_names(&self) -> Vec<String> {
        self.views.iter().map(|v| v.name().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_render_both_views() {
        let config = DashboardConfig::default();
        assert_eq!(config.views, vec![ViewKind::Summary, ViewKind::Modules]);
        assert!(config.clear_screen);
        assert_eq!(config.output, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_views_rejected() {
        let config = DashboardConfig {
            views: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DashboardError::NoViews)));
    }

    #[test]
    fn test_view_kind_builds_named_view() {
        assert_eq!(ViewKind::Summary.build().name(), "summary");
        assert_eq!(ViewKind::Modules.build().name(), "modules");
    }
}
