use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to render {template}: {source}")]
    Render {
        template: &'static str,
        source: minijinja::Error,
    },
}
