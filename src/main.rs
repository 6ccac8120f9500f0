//! svelte-svg CLI
//!
//! Usage:
//!   svelte-svg [OPTIONS] <FILES>...
//!
//! Options:
//!   -c, --config <FILE>        Config file (TOML format)
//!       --compiler <CMD>       External compiler command
//!       --optimizer <CMD>      External optimizer command
//!       --optimize             Optimize even without an [svgo] table
//!       --markup               Print the markup handed to the compiler
//!       --name                 Print the derived component names
//!   -o, --out-dir <DIR>        Write <Name>.js and <Name>.js.map files
//!   -v, --verbose              Increase log output (repeatable)
//!   -h, --help                 Print help

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use svelte_svg::optimizer::Optimizer;
use svelte_svg::{
    derive_identifier, logging, CommandCompiler, CommandOptimizer, ComponentCompiler,
    ExternalCommand, GenerateMode, Minifier, SvgPlugin, ToolConfig,
};

#[derive(Parser)]
#[command(name = "svelte-svg")]
#[command(about = "Compile SVG files into Svelte components")]
struct Cli {
    /// SVG files to transform
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Config file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// External compiler command, e.g. `--compiler "node compile.mjs"`
    #[arg(long)]
    compiler: Option<String>,

    /// External optimizer command (defaults to the built-in minifier)
    #[arg(long)]
    optimizer: Option<String>,

    /// Enable optimization even when the config has no [svgo] table
    #[arg(long)]
    optimize: bool,

    /// Print the markup handed to the compiler instead of compiling
    #[arg(long, conflicts_with = "name")]
    markup: bool,

    /// Print the derived component names only
    #[arg(long)]
    name: bool,

    /// Directory to write <Name>.js and <Name>.js.map into (prints to stdout otherwise)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Compile in dev mode
    #[arg(long)]
    dev: bool,

    /// Generation mode forwarded to the compiler
    #[arg(long, value_parser = parse_generate)]
    generate: Option<GenerateMode>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_generate(s: &str) -> Result<GenerateMode, String> {
    s.parse()
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Load config
    let tool = match &cli.config {
        Some(path) => match ToolConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ToolConfig::default(),
    };

    let mut config = tool.plugin.clone();
    if config.root.is_none() {
        if let Ok(cwd) = std::env::current_dir() {
            config.root = Some(cwd);
        }
    }
    if cli.dev {
        config.dev = Some(true);
    }
    if let Some(generate) = cli.generate {
        config.generate = Some(generate);
    }
    if cli.optimize && config.svgo.is_none() {
        config.svgo = Some(Default::default());
    }

    if cli.name {
        for file in &cli.files {
            println!("{}", derive_identifier(&module_id(file), config.path_style));
        }
        return;
    }

    let optimizer: Box<dyn Optimizer> = match cli
        .optimizer
        .as_deref()
        .map(split_command)
        .or_else(|| tool.optimizer.as_ref().map(|o| o.command.clone()))
    {
        Some(argv) => Box::new(CommandOptimizer::new(command_or_exit(argv, "optimizer"))),
        None => Box::new(Minifier),
    };

    let compiler: Box<dyn ComponentCompiler> = match cli
        .compiler
        .as_deref()
        .map(split_command)
        .or_else(|| tool.compiler.as_ref().map(|c| c.command.clone()))
    {
        Some(argv) => Box::new(CommandCompiler::new(command_or_exit(argv, "compiler"))),
        None if cli.markup => Box::new(MissingCompiler),
        None => {
            eprintln!("Error: no compiler configured (use --compiler or a [compiler] table)");
            std::process::exit(1);
        }
    };

    let plugin = match SvgPlugin::new(config, optimizer, compiler) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(dir) = &cli.out_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Error creating '{}': {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let mut outputs = OutputNames::default();
    let mut failed = 0;
    for file in &cli.files {
        if !process_file(&plugin, file, &cli, &mut outputs) {
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!("{} of {} file(s) failed", failed, cli.files.len());
        std::process::exit(1);
    }
}

/// Transform one file, printing diagnostics. Returns false on failure.
fn process_file<O, C>(
    plugin: &SvgPlugin<O, C>,
    file: &Path,
    cli: &Cli,
    outputs: &mut OutputNames,
) -> bool
where
    O: Optimizer,
    C: ComponentCompiler,
{
    let id = module_id(file);

    let source = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return false;
        }
    };

    if !plugin.handles(&id) {
        info!(path = %id, "not handled, skipping");
        return true;
    }

    if cli.markup {
        return match plugin.prepare_markup(&source, &id) {
            Ok(markup) => {
                println!("{}", markup);
                true
            }
            Err(e) => {
                eprintln!("{}", e.format(&source));
                false
            }
        };
    }

    let output = match plugin.transform(&source, &id) {
        Ok(Some(output)) => output,
        Ok(None) => return true,
        Err(e) => {
            eprintln!("{}", e.format(&source));
            return false;
        }
    };

    match &cli.out_dir {
        Some(dir) => {
            let name = derive_identifier(&id, plugin.config().path_style);
            let stem = if name.is_empty() { "component".to_string() } else { name };
            if let Some(previous) = outputs.claim(&stem, file) {
                eprintln!(
                    "Error: '{}' and '{}' both compile to {}.js",
                    previous.display(),
                    file.display(),
                    stem
                );
                return false;
            }
            let code_path = dir.join(format!("{}.js", stem));
            let map_path = dir.join(format!("{}.js.map", stem));

            let map = match serde_json::to_string(&output.map) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error encoding source map for '{}': {}", file.display(), e);
                    return false;
                }
            };

            if let Err(e) = fs::write(&code_path, &output.code).and_then(|_| fs::write(&map_path, map))
            {
                eprintln!("Error writing '{}': {}", code_path.display(), e);
                return false;
            }
            info!(path = %id, out = %code_path.display(), "wrote component");
        }
        None => println!("{}", output.code),
    }

    true
}

/// Output stems already written in this run
///
/// Keys are lower-cased so `Icon.js` and `ICON.js` also collide on
/// case-insensitive file systems.
#[derive(Default)]
struct OutputNames {
    claimed: HashMap<String, PathBuf>,
}

impl OutputNames {
    /// Claim `stem` for `file`. Returns the other file already using it.
    fn claim(&mut self, stem: &str, file: &Path) -> Option<PathBuf> {
        let key = stem.to_lowercase();
        match self.claimed.get(&key) {
            Some(previous) if previous != file => Some(previous.clone()),
            Some(_) => None,
            None => {
                self.claimed.insert(key, file.to_path_buf());
                None
            }
        }
    }
}

/// Module id for a file: absolute when possible, so root-relative patterns match
fn module_id(file: &Path) -> String {
    let absolute = if file.is_absolute() {
        file.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(file),
            Err(e) => {
                warn!(error = %e, "cannot resolve current directory");
                file.to_path_buf()
            }
        }
    };
    absolute.to_string_lossy().into_owned()
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

fn command_or_exit(argv: Vec<String>, what: &str) -> ExternalCommand {
    match ExternalCommand::from_argv(argv) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: invalid {} command: {}", what, e);
            std::process::exit(1);
        }
    }
}

/// Stand-in used with `--markup`, where the compiler is never reached
struct MissingCompiler;

impl ComponentCompiler for MissingCompiler {
    fn compile(
        &self,
        _: &str,
        _: &svelte_svg::CompileOptions,
    ) -> Result<svelte_svg::CompileOutput, svelte_svg::error::CollaboratorError> {
        Err("no compiler configured".into())
    }
}
