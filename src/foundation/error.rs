/// Result alias used throughout the crate.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors surfaced by graph construction and rendering.
///
/// "Nothing to draw" is never an error: it is reported as `Ok(None)` / `Ok(())` by the render
/// entry points.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// A parameter or request failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A render target could not be allocated or a pass could not be recorded.
    #[error("render error: {0}")]
    Render(String),

    /// Any other error, typically from an external collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FilterError {
    /// Build a [`FilterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FilterError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
