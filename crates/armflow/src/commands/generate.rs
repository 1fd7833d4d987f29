use armflow_codegen::{ResourceSchema, generate_file, generate_models};
use colored::Colorize;
use std::path::Path;

pub fn handle(schema: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(output) => {
            generate_file(schema, output)?;
            eprintln!("{} {}", "✓ Wrote".green(), output.display().to_string().cyan());
        }
        None => {
            let schema = ResourceSchema::load(schema)?;
            print!("{}", generate_models(&schema)?);
        }
    }
    Ok(())
}
