#![deny(missing_docs)]

//! # Generate Command
//!
//! Reads an OpenAPI / Swagger document and writes the resolved model as JSON.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use apigen_core::{generate_from_text, ApiModel, GenerationOptions, TypeOrder};

use crate::error::{CliError, CliResult};

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI (YAML or JSON) document.
    pub input: PathBuf,

    /// Output path for the model. Writes to stdout when omitted.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Drop operations marked `deprecated: true`.
    #[clap(long)]
    pub exclude_deprecated: bool,

    /// Keep only operations whose path matches this regular expression.
    #[clap(long, env = "APIGEN_FILTER")]
    pub filter: Option<String>,

    /// Keep every named type, even when no retained operation reaches it.
    #[clap(long)]
    pub no_tree_shake: bool,

    /// Emit types sorted by name instead of declaration order.
    #[clap(long)]
    pub sort_types: bool,
}

impl GenerateArgs {
    /// Builds pipeline options from the flags.
    pub fn options(&self) -> CliResult<GenerationOptions> {
        let mut options = GenerationOptions::default()
            .with_exclude_deprecated(self.exclude_deprecated)
            .with_tree_shaking(!self.no_tree_shake);
        if self.sort_types {
            options = options.with_type_order(TypeOrder::Lexical);
        }
        if let Some(pattern) = &self.filter {
            options = options.with_path_filter(pattern)?;
        }
        Ok(options)
    }
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> CliResult<ApiModel> {
    if !args.input.exists() {
        return Err(CliError::General(format!(
            "OpenAPI file not found: {:?}",
            args.input
        )));
    }

    // 1. Read
    let content = fs::read_to_string(&args.input)?;

    // 2. Resolve
    let options = args.options()?;
    let model = generate_from_text(&content, &options)?;
    tracing::info!(
        clients = model.clients.len(),
        types = model.types.len(),
        warnings = model.warnings.len(),
        "model generated"
    );

    for warning in &model.warnings {
        eprintln!("warning: {}: {}", warning.location, warning.message);
    }

    // 3. Write
    let json = serde_json::to_string_pretty(&model)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            eprintln!("Wrote model to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen_core::AppError;
    use tempfile::tempdir;

    const PETSTORE: &str = r#"
openapi: 3.0.3
info: {title: Petstore, version: 1.0.0}
paths:
  /pets:
    get:
      tags: [pets]
      operationId: listPets
      responses:
        '200':
          content:
            application/json:
              schema: { type: array, items: { $ref: '#/components/schemas/Pet' } }
  /legacy:
    get:
      deprecated: true
      operationId: legacy
      responses:
        '200':
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Legacy' }
components:
  schemas:
    Pet:
      type: object
      properties:
        name: { type: string }
    Legacy:
      type: object
"#;

    fn args(input: PathBuf, output: Option<PathBuf>) -> GenerateArgs {
        GenerateArgs {
            input,
            output,
            exclude_deprecated: false,
            filter: None,
            no_tree_shake: false,
            sort_types: false,
        }
    }

    #[test]
    fn test_execute_writes_model() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        let output = dir.path().join("out/model.json");
        fs::write(&input, PETSTORE).unwrap();

        let mut args = args(input, Some(output.clone()));
        args.exclude_deprecated = true;
        let model = execute(&args).unwrap();

        assert_eq!(model.serializable_types(), vec!["Pet"]);
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(written["title"], "Petstore");
        assert_eq!(written["clients"][0]["name"], "Pets");
        assert_eq!(
            written["clients"][0]["operations"][0]["method_name"],
            "get_list_pets"
        );
    }

    #[test]
    fn test_no_tree_shake_keeps_types() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, PETSTORE).unwrap();

        let mut args = args(input, Some(dir.path().join("model.json")));
        args.exclude_deprecated = true;
        args.no_tree_shake = true;
        args.sort_types = true;
        let model = execute(&args).unwrap();

        let names: Vec<&str> = model.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Legacy", "Pet"]);
    }

    #[test]
    fn test_invalid_filter() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, PETSTORE).unwrap();

        let mut args = args(input, None);
        args.filter = Some("([".to_string());
        let err = execute(&args).unwrap_err();
        assert!(matches!(err, CliError::Core(AppError::InvalidFilter(_))));
    }

    #[test]
    fn test_execute_missing_input() {
        let dir = tempdir().unwrap();
        let err = execute(&args(dir.path().join("missing.yaml"), None)).unwrap_err();
        assert!(format!("{}", err).contains("OpenAPI file not found"));
    }
}
