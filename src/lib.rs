pub mod ast;
pub mod codegen;
pub mod schema;
pub mod toolbox;
pub mod workspace;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(all(target_arch = "wasm32", feature = "wasm-bindings"))]
pub mod wasm;

use anyhow::{Context, Result};
use codegen::Generator;
use schema::Registry;
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
pub fn run_cli(args: &cli::Args) -> Result<()> {
    if args.input.is_none() && args.emit_toolbox.is_none() {
        anyhow::bail!("Nothing to do: pass a WORKSPACE snapshot and/or --emit-toolbox.");
    }
    let registry = Registry::standard();

    if let Some(toolbox_path) = &args.emit_toolbox {
        let xml = toolbox::toolbox_xml(&registry)?;
        write_text(toolbox_path, &xml)?;
        eprintln!("[Toolbox] Wrote '{}'.", toolbox_path.display());
    }

    let Some(input) = &args.input else {
        return Ok(());
    };
    let total_stages = 3 + usize::from(args.output.is_some());
    let mut progress = CliProgress::new("Generate", total_stages);

    progress.advance("Resolving input path");
    let input = canonicalize_file(input)?;

    progress.advance("Parsing workspace snapshot");
    let snapshot = load_workspace(&input, &registry)?;

    progress.advance("Generating contract source");
    let generator = Generator::new(&registry);
    let document = generator.generate_document(&snapshot)?;

    if let Some(output) = &args.output {
        progress.advance("Writing generated source");
        write_text(output, &document)?;
    } else {
        print!("{}", document);
    }
    Ok(())
}

pub fn generate_source(snapshot: &str, registry: &Registry) -> Result<String> {
    let snapshot = workspace::parse_workspace(snapshot, registry)?;
    let generator = Generator::new(registry);
    Ok(generator.generate_document(&snapshot)?)
}

pub fn load_workspace(input: &Path, registry: &Registry) -> Result<ast::Workspace> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'.", input.display()))?;
    match input.extension().and_then(|e| e.to_str()) {
        Some("xml") => workspace::parse_workspace_xml(&source, registry),
        Some("json") => workspace::parse_workspace_json(&source, registry),
        _ => workspace::parse_workspace(&source, registry),
    }
}

pub fn canonicalize_file(path: &Path) -> Result<PathBuf> {
    if !path.exists() || !path.is_file() {
        return Err(anyhow::anyhow!(
            "Input file not found: '{}'.",
            path.display()
        ));
    }
    Ok(path.canonicalize()?)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, text.as_bytes())
        .with_context(|| format!("Failed to write '{}'.", path.display()))
}

#[cfg(not(target_arch = "wasm32"))]
struct CliProgress {
    prefix: &'static str,
    total: usize,
    current: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl CliProgress {
    fn new(prefix: &'static str, total: usize) -> Self {
        Self {
            prefix,
            total: total.max(1),
            current: 0,
        }
    }

    fn advance(&mut self, label: &str) {
        self.current = (self.current + 1).min(self.total);
        eprintln!(
            "[{}] {}... ({}/{})",
            self.prefix, label, self.current, self.total
        );
    }
}
