//! Render command: draw a recipe to SVG or dump its stripes as JSON.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::common::{CliError, JsonLine, JsonSummary, OutputFormat, flag_value, write_output};
use super::recipe::{EXAMPLE_RECIPE, Recipe};

#[derive(Serialize)]
struct JsonLayer {
    name: String,
    summary: JsonSummary,
    lines: Vec<JsonLine>,
}

#[derive(Serialize)]
struct JsonRecipe {
    name: String,
    layers: Vec<JsonLayer>,
}

/// Execute the render command.
pub fn cmd_render(args: &[String]) -> Result<(), CliError> {
    let mut recipe_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut format = OutputFormat::Svg;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "--output")?),
            "-f" | "--format" => format = OutputFormat::from_name(flag_value(args, &mut i, "--format")?)?,
            "--json" => format = OutputFormat::Json,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            arg if !arg.starts_with('-') && recipe_path.is_none() => recipe_path = Some(arg),
            unknown => return Err(CliError::Usage(format!("unknown option: {}", unknown))),
        }
        i += 1;
    }

    let recipe_path = recipe_path.ok_or_else(|| CliError::Usage("no recipe file specified".into()))?;
    let recipe = Recipe::load(recipe_path)?;
    info!(recipe = %recipe.name, layers = recipe.layers.len(), "loaded recipe");

    let base_dir = Path::new(recipe_path).parent().unwrap_or(Path::new("."));
    let output = render_recipe(&recipe, base_dir, format)?;
    write_output(output_path, &output)
}

/// Render `recipe` in the requested format.
pub fn render_recipe(recipe: &Recipe, base_dir: &Path, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Svg => {
            let (svg, summaries) = recipe.render_svg(base_dir)?;
            let total: usize = summaries.iter().map(|s| s.segments).sum();
            info!(segments = total, layers = summaries.len(), "rendered recipe");
            Ok(svg)
        }
        OutputFormat::Json => {
            let layers = recipe
                .render_segments(base_dir)?
                .into_iter()
                .map(|layer| JsonLayer {
                    summary: JsonSummary::from(&layer.summary),
                    lines: layer.segments.iter().map(JsonLine::from).collect(),
                    name: layer.name,
                })
                .collect();
            Ok(serde_json::to_string_pretty(&JsonRecipe { name: recipe.name.clone(), layers })?)
        }
    }
}

/// Print an example recipe.
pub fn cmd_example() -> Result<(), CliError> {
    write_output(None, EXAMPLE_RECIPE)
}

fn print_usage() {
    eprintln!("striper render - draw a stripe recipe");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    striper render <recipe.yaml|recipe.json> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!("    -f, --format <fmt>     Output format: svg, json (default: svg)");
    eprintln!("    --json                 Same as --format json");
    eprintln!("    -h, --help             Show this help");
    eprintln!();
    eprintln!("EXAMPLE:");
    eprintln!("    striper example > ring.yaml && striper render ring.yaml -o ring.svg");
}
