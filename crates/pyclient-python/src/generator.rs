use log::debug;
use pyclient_core::descriptor::{DefinitionKind, GenerationResult};
use pyclient_core::{CodeGenerator, GeneratedFile};

use crate::emitters::{self, endpoints::ModelNames};
use crate::error::GeneratorError;

/// Settings of one emitted package.
#[derive(Debug, Clone)]
pub struct PythonClientConfig {
    /// Import name of the generated package, used in its `__init__.py` docstring.
    pub package_name: String,
}

/// Pydantic + requests client generator.
///
/// Paths of the returned files are relative to the package directory.
pub struct PythonClientGenerator;

impl CodeGenerator for PythonClientGenerator {
    type Config = PythonClientConfig;
    type Error = GeneratorError;

    fn generate(
        &self,
        result: &GenerationResult,
        config: &PythonClientConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let env = emitters::environment()?;
        let support = &result.support;
        let models: ModelNames<'_> = result
            .definitions
            .iter()
            .filter(|d| matches!(d.kind, DefinitionKind::Object { .. }))
            .map(|d| d.name.wire.as_str())
            .collect();

        let mut files = vec![
            emitters::client::emit_package_init(&env, &result.client, &config.package_name)?,
            emitters::client::emit_client(&env, &result.client, support)?,
        ];
        files.extend(emitters::support::emit_utils(&env, support)?);

        files.push(emitters::schemas::emit_base_schema(&env, &support.base_schema)?);
        files.push(emitters::schemas::emit_schemas_init(&env, result)?);
        for def in &result.definitions {
            files.push(emitters::schemas::emit_definition(&env, def, &support.base_schema)?);
        }

        files.push(GeneratedFile::new("endpoints/__init__.py", ""));
        for group in &result.client.groups {
            files.push(emitters::endpoints::emit_group(&env, group, support, &models)?);
        }

        debug!(
            "rendered {} files for package {}",
            files.len(),
            config.package_name
        );
        Ok(files)
    }
}
