pub mod config;
pub mod descriptor;
pub mod error;
pub mod naming;
pub mod parse;
pub mod pipeline;
pub mod resolve;
pub mod stage;
pub mod synth;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    /// When false, an existing file at `path` is left untouched.
    pub overwrite: bool,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            overwrite: true,
        }
    }

    /// A file the user owns after its first generation.
    pub fn scaffold(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            overwrite: false,
            ..Self::new(path, content)
        }
    }
}

/// Trait for code generators that produce files from a synthesized result.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        result: &descriptor::GenerationResult,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
