//! Offline inspection tool for rewrite rules. Parses template patterns,
//! tries them against URLs, and runs full rewrites without a gateway.

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

use rewrite_gateway::urltemplate::matcher::Matcher;
use rewrite_gateway::urltemplate::params::{BasicParams, Params, Resolver};
use rewrite_gateway::urltemplate::parser::{parse_literal, parse_template};
use rewrite_gateway::urltemplate::rewriter::rewrite;
use rewrite_gateway::urltemplate::template::Template;

#[derive(Parser)]
#[command(name = "rewrite-cli")]
#[command(about = "Inspect and test URL rewrite templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a template pattern and show its structure
    Parse {
        /// Template pattern, e.g. "http://{host}:{port}/{path=**}?{**}"
        pattern: String,
    },
    /// Match a URL against a template pattern
    Match {
        /// Template pattern
        pattern: String,
        /// Input URL
        url: String,
    },
    /// Rewrite a URL from a source pattern to a target pattern
    Rewrite {
        /// Source template pattern
        source: String,
        /// Target template pattern
        target: String,
        /// Input URL
        url: String,
        /// Extra parameter bindings, name=value, repeatable
        #[arg(short, long)]
        param: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { pattern } => {
            let template = parse_template(&pattern);
            print_json(&template_json(&template))?;
        }
        Commands::Match { pattern, url } => {
            let mut matcher = Matcher::new();
            matcher.add(parse_template(&pattern), ());
            let input = parse_literal(&url);
            match matcher.match_template(&input) {
                Some(matched) => {
                    let params = params_json(matched.params());
                    print_json(&json!({ "matched": true, "params": params }))?;
                }
                None => print_json(&json!({ "matched": false }))?,
            }
        }
        Commands::Rewrite {
            source,
            target,
            url,
            param,
        } => {
            let mut extra = BasicParams::new();
            for binding in &param {
                match binding.split_once('=') {
                    Some((name, value)) => extra.add(name, Some(value.to_string())),
                    None => extra.add(binding.as_str(), None),
                }
            }
            let source = parse_template(&source);
            let target = parse_template(&target);
            match rewrite(&url, &source, &target, Some(&extra), None) {
                Ok(uri) => print_json(&json!({ "rewritten": uri.to_string() }))?,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn template_json(template: &Template) -> Value {
    json!({
        "pattern": template.pattern(),
        "canonical": template.to_string(),
        "absolute": template.is_absolute(),
        "directory": template.is_directory(),
        "has_scheme": template.has_scheme(),
        "has_authority": template.has_authority(),
        "authority_only": template.is_authority_only(),
        "path_segments": template.path().len(),
        "has_query": template.has_query(),
        "has_fragment": template.has_fragment(),
    })
}

fn params_json(params: &BasicParams) -> Value {
    let mut map = Map::new();
    for name in params.names() {
        let values: Vec<Value> = params
            .resolve(&name)
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.map(Value::String).unwrap_or(Value::Null))
            .collect();
        map.insert(name, Value::Array(values));
    }
    Value::Object(map)
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
