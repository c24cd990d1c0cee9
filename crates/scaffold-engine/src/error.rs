//! Error taxonomy for composition and rendering

use crate::config::UiLibrary;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Fatal failures of a composition or render run.
///
/// `Display` carries operator-side detail (template ids, parser diagnostics).
/// End users only ever see [`ScaffoldError::user_message`].
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("module '{module}' failed: {reason}")]
    ModuleContribution { module: String, reason: String },

    #[error("output path '{path}' contributed by both '{first}' and '{second}'")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("no UI kit provider registered for {0:?}")]
    UnsupportedUiKit(UiLibrary),

    #[error("template not found: {template_id}")]
    TemplateNotFound { template_id: String },

    #[error("failed to parse template '{template_id}': {diagnostics}")]
    TemplateParse {
        template_id: String,
        diagnostics: String,
    },

    #[error("failed to render template '{template_id}': {diagnostics}")]
    TemplateRender {
        template_id: String,
        diagnostics: String,
    },

    #[error("background task failed: {reason}")]
    BackgroundTask { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScaffoldError {
    /// Message safe to show to the person editing the configuration.
    pub fn user_message(&self) -> &'static str {
        match self {
            ScaffoldError::UnsupportedUiKit(_) => "The selected UI library is not supported.",
            _ => "Scaffold generation failed. Please try again later.",
        }
    }

    /// True for failures caused by a module contribution (including path collisions).
    pub fn is_module_failure(&self) -> bool {
        matches!(
            self,
            ScaffoldError::ModuleContribution { .. }
                | ScaffoldError::PathCollision { .. }
                | ScaffoldError::UnsupportedUiKit(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_template_detail() {
        let err = ScaffoldError::TemplateParse {
            template_id: "backend/Program.cs.jinja".to_string(),
            diagnostics: "unexpected end of input".to_string(),
        };
        assert!(err.to_string().contains("backend/Program.cs.jinja"));
        assert!(!err.user_message().contains("Program.cs"));
    }

    #[test]
    fn test_collision_is_module_failure() {
        let err = ScaffoldError::PathCollision {
            path: "README.md".to_string(),
            first: "core".to_string(),
            second: "docs".to_string(),
        };
        assert!(err.is_module_failure());
        assert!(!ScaffoldError::TemplateNotFound {
            template_id: "x".to_string()
        }
        .is_module_failure());
    }
}
