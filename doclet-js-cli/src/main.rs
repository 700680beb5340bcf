use clap::Parser as ClapParser;
use doclet_js::dictionary::TagDictionary;
use doclet_js::parser::Parser;
use doclet_js::parser::SourceFile;
use std::fs;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

/// Extracts doclets from ESTree JSON files and prints them as a JSON array.
///
/// Each input file must contain one ESTree `Program` (or Babel `File`)
/// document, as produced by a JavaScript parser front-end. Files are
/// processed in the order given.
#[derive(ClapParser)]
#[command(name = "doclet-js", version)]
struct Cli {
  /// ESTree JSON files to process, in order.
  #[arg(required = true)]
  inputs: Vec<PathBuf>,

  /// Include undocumented doclets in the output.
  #[arg(long)]
  undocumented: bool,

  /// Pretty-print the output.
  #[arg(long)]
  pretty: bool,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut files = Vec::new();
  for path in &cli.inputs {
    let filename = path.display().to_string();
    let source = match fs::read_to_string(path) {
      Ok(source) => source,
      Err(err) => {
        tracing::error!(file = %filename, "unable to read the source file: {}", err);
        continue;
      }
    };
    let json: serde_json::Value = match serde_json::from_str(&source) {
      Ok(json) => json,
      Err(err) => {
        tracing::error!(file = %filename, "not valid JSON: {}", err);
        continue;
      }
    };
    match estree_js::from_json(&json) {
      Ok(ast) => files.push(SourceFile { filename, ast }),
      Err(err) => {
        tracing::error!(file = %filename, "not a usable ESTree document: {}", err);
      }
    }
  }

  if files.is_empty() {
    eprintln!("no readable input files");
    exit(1);
  }

  let mut parser = Parser::new(TagDictionary::jsdoc());
  parser.parse(files);
  parser.post_process();
  let (store, diagnostics) = parser.finish();

  for diagnostic in &diagnostics {
    tracing::error!("{}", diagnostic);
  }

  let doclets: Vec<&doclet_js::doclet::Doclet> = store
    .iter()
    .filter(|doclet| cli.undocumented || doclet.is_documented())
    .collect();

  let rendered = if cli.pretty {
    serde_json::to_string_pretty(&doclets)
  } else {
    serde_json::to_string(&doclets)
  };
  match rendered {
    Ok(out) => println!("{}", out),
    Err(err) => {
      eprintln!("failed to serialize doclets: {}", err);
      exit(1);
    }
  }
}
