use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::{debug, info, warn};

use pyclient_core::config::{self, CONFIG_FILE_NAME, PyclientConfig};
use pyclient_core::descriptor::GenerationResult;
use pyclient_core::naming::normalize_identifier;
use pyclient_core::parse;
use pyclient_core::pipeline;
use pyclient_core::{CodeGenerator, GeneratedFile};
use pyclient_python::{PythonClientConfig, PythonClientGenerator};

/// File the downloaded or read spec is kept in while the client is generated.
const SPEC_FILE_NAME: &str = "api-spec.json";

#[derive(Parser)]
#[command(
    name = "pyclient",
    about = "Generate a typed Python client from an OpenAPI 3.x document",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a client from an OpenAPI document served over HTTP
    FromUrl {
        /// Name of the generated client package
        #[arg(short, long)]
        client_name: String,

        /// URL of the OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        url: String,
    },

    /// Generate a client from a local OpenAPI document
    FromFile {
        /// Name of the generated client package
        #[arg(short, long)]
        client_name: String,

        /// Path to the OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        file_path: PathBuf,
    },

    /// Print the synthesized descriptors of an OpenAPI document
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        file_path: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a default .pyclient.yaml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::FromUrl { client_name, url } => {
            let cfg = try_load_config()?.unwrap_or_default();
            let raw = fetch_spec(&url, cfg.fetch_timeout)?;
            generate(&client_name, &raw, &cfg)?;
            println!("Client '{client_name}' generated from OpenAPI URL: {url}");
            Ok(())
        }

        Commands::FromFile {
            client_name,
            file_path,
        } => {
            let cfg = try_load_config()?.unwrap_or_default();
            let raw = fs::read_to_string(&file_path)
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            generate(&client_name, &raw, &cfg)?;
            println!(
                "Client '{client_name}' generated from file: {}",
                file_path.display()
            );
            Ok(())
        }

        Commands::Inspect { file_path, format } => cmd_inspect(&file_path, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "pyclient", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<PyclientConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn fetch_spec(url: &str, timeout_seconds: u64) -> Result<String> {
    info!("fetching {url}");
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .context("failed to build HTTP client")?;
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .with_context(|| format!("failed to fetch {url}"))
}

fn synthesize(raw: &str, cfg: &PyclientConfig) -> Result<GenerationResult> {
    let spec = parse::from_str_auto(raw)?;
    let result = pipeline::run(&spec, &cfg.pipeline_options())?;
    Ok(result)
}

/// The package directory of client `name`.
fn package_dir(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(normalize_identifier(name))
}

fn generate(client_name: &str, raw: &str, cfg: &PyclientConfig) -> Result<()> {
    let package_name = normalize_identifier(client_name);
    let dir = package_dir(&cfg.output_dir, client_name);
    let created = !dir.exists();
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let spec_path = dir.join(SPEC_FILE_NAME);
    fs::write(&spec_path, spec_as_json(raw)?)
        .with_context(|| format!("failed to write {}", spec_path.display()))?;

    let outcome = synthesize(raw, cfg).and_then(|result| {
        let config = PythonClientConfig { package_name };
        let files = PythonClientGenerator
            .generate(&result, &config)
            .map_err(|e| anyhow::anyhow!(e))?;
        write_files(&dir, &files)?;
        info!("wrote {} files to {}", files.len(), dir.display());
        Ok(())
    });

    if !cfg.post_process.keep_spec {
        fs::remove_file(&spec_path)
            .with_context(|| format!("failed to remove {}", spec_path.display()))?;
        if created && outcome.is_err() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("failed to remove {}", dir.display()))?;
        }
    }
    outcome?;

    if cfg.post_process.ruff {
        try_run_ruff(&dir);
    }
    Ok(())
}

/// Re-encode a JSON or YAML document as pretty JSON.
fn spec_as_json(raw: &str) -> Result<String> {
    let value: serde_json::Value = if raw.trim_start().starts_with('{') {
        serde_json::from_str(raw)?
    } else {
        serde_yaml_ng::from_str(raw)?
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Write generated files under `base`. Scaffold files that already exist are kept.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if !file.overwrite && path.exists() {
            debug!("kept {}", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!("wrote {}", path.display());
    }
    Ok(())
}

/// Lint and format the generated package with ruff, if it is installed.
fn try_run_ruff(dir: &Path) {
    for args in [["check", "--fix"], ["format", "--quiet"]] {
        match Command::new("ruff").args(args).arg(dir).output() {
            Ok(result) if result.status.success() => debug!("ruff {} succeeded", args[0]),
            Ok(result) => warn!(
                "ruff {} exited with {}: {}",
                args[0],
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ),
            Err(_) => {
                warn!(
                    "ruff not found; run `ruff check --fix . && ruff format .` in {} to tidy the client",
                    dir.display()
                );
                return;
            }
        }
    }
}

fn cmd_inspect(file_path: &Path, format: InspectFormat) -> Result<()> {
    let raw = fs::read_to_string(file_path)
        .with_context(|| format!("failed to read {}", file_path.display()))?;
    let result = synthesize(&raw, &PyclientConfig::default())?;

    match format {
        InspectFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&result)?),
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: &str = include_str!("../../pyclient-core/tests/fixtures/store.json");
    const PETSTORE: &str = include_str!("../../pyclient-core/tests/fixtures/petstore.yaml");

    fn config_in(dir: &Path) -> PyclientConfig {
        let mut cfg = PyclientConfig::default();
        cfg.output_dir = dir.to_path_buf();
        cfg.post_process.ruff = false;
        cfg
    }

    #[test]
    fn test_package_dir_is_normalized() {
        assert_eq!(
            package_dir(Path::new("out"), "My Store-Client"),
            Path::new("out").join("my_store_client")
        );
    }

    #[test]
    fn test_generate_writes_tree_and_removes_spec() {
        let tmp = tempfile::tempdir().unwrap();
        generate("Store", STORE, &config_in(tmp.path())).unwrap();

        let dir = tmp.path().join("store");
        assert!(dir.join("client.py").exists());
        assert!(dir.join("endpoints/items_endpoint.py").exists());
        assert!(dir.join("schemas/base_schema.py").exists());
        assert!(!dir.join(SPEC_FILE_NAME).exists());
    }

    #[test]
    fn test_keep_spec_keeps_json_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config_in(tmp.path());
        cfg.post_process.keep_spec = true;
        generate("pets", PETSTORE, &cfg).unwrap();

        let kept = fs::read_to_string(tmp.path().join("pets").join(SPEC_FILE_NAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&kept).unwrap();
        assert_eq!(value["info"]["title"], "Petstore");
    }

    #[test]
    fn test_failed_run_still_removes_spec() {
        let tmp = tempfile::tempdir().unwrap();
        let dangling = include_str!("../../pyclient-core/tests/fixtures/dangling.yaml");
        assert!(generate("broken", dangling, &config_in(tmp.path())).is_err());
        assert!(!tmp.path().join("broken").join(SPEC_FILE_NAME).exists());
        assert!(!tmp.path().join("broken").exists());
    }

    #[test]
    fn test_failed_run_keeps_existing_package_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("notes.txt"), "mine\n").unwrap();

        let dangling = include_str!("../../pyclient-core/tests/fixtures/dangling.yaml");
        assert!(generate("broken", dangling, &config_in(tmp.path())).is_err());
        assert_eq!(fs::read_to_string(dir.join("notes.txt")).unwrap(), "mine\n");
        assert!(!dir.join(SPEC_FILE_NAME).exists());
    }

    #[test]
    fn test_regeneration_keeps_user_owned_base_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        generate("store", STORE, &cfg).unwrap();

        let base = tmp.path().join("store/schemas/base_schema.py");
        fs::write(&base, "# customized\n").unwrap();
        generate("store", STORE, &cfg).unwrap();

        assert_eq!(fs::read_to_string(&base).unwrap(), "# customized\n");
    }
}
