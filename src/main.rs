//! Stencil CLI
//!
//! Usage:
//!   stencil [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -d, --dir <DIR>        Template directory (default ".")
//!   -x, --ext <EXT>        Template file extension (default "html")
//!   -D, --data <FILE>      TOML data file seeding the environment
//!   -s, --set <KEY=VALUE>  Extra string binding, repeatable
//!   -i, --inline <TEXT>    Render TEXT instead of a named template
//!   --lint                 Report template problems instead of rendering
//!   --pass-cap <N>         Rescans allowed per expansion phase
//!   --max-depth <N>        Maximum nesting of render frames
//!   -h, --help             Print help

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use stencil::data::{self, parse_binding};
use stencil::{lint, Engine, EngineError, Environment, FileSource, RenderConfig, TemplateSource};

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "Render HTML templates with loops, conditionals and includes")]
struct Cli {
    /// Template name, resolved as <DIR>/<TEMPLATE>.<EXT> (reads stdin if not provided)
    template: Option<String>,

    /// Template directory used for the named template and for includes
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Template file extension
    #[arg(short = 'x', long, default_value = "html")]
    ext: String,

    /// TOML data file whose top-level table seeds the environment
    #[arg(short = 'D', long)]
    data: Option<PathBuf>,

    /// Extra string binding (KEY=VALUE), may be repeated
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Render this text instead of loading a template
    #[arg(short, long)]
    inline: Option<String>,

    /// Report malformed directives instead of rendering
    #[arg(long)]
    lint: bool,

    /// Rescans allowed for the loop phase and the conditional phase
    #[arg(long)]
    pass_cap: Option<usize>,

    /// Maximum nesting of loop bodies, branches and includes
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "stencil=warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let source = match FileSource::new(&cli.dir, &cli.ext) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Template text and the name it is reported under
    let (filename, template) = match (&cli.inline, &cli.template) {
        (Some(text), _) => ("<inline>".to_string(), text.clone()),
        (None, Some(name)) => match source.fetch(name) {
            Some(text) => (source.locate(name), text),
            None => {
                let err = EngineError::TemplateNotFound {
                    name: name.clone(),
                    location: source.locate(name),
                };
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        },
        (None, None) => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => ("<stdin>".to_string(), buffer),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    if cli.lint {
        let diagnostics = lint(&template);
        for diagnostic in &diagnostics {
            eprint!("{}", diagnostic.format(&template, &filename));
        }
        if !diagnostics.is_empty() {
            std::process::exit(1);
        }
        return;
    }

    let mut env = match &cli.data {
        Some(path) => match data::load_file(path) {
            Ok(env) => env,
            Err(e) => {
                eprintln!("Error loading data file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Environment::new(),
    };

    for binding in &cli.set {
        match parse_binding(binding) {
            Some((key, value)) => {
                env.insert(key, value);
            }
            None => {
                eprintln!("Error: expected KEY=VALUE, got '{}'", binding);
                std::process::exit(1);
            }
        }
    }

    let mut config = RenderConfig::new();
    if let Some(pass_cap) = cli.pass_cap {
        config = config.with_pass_cap(pass_cap);
    }
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }

    let engine = Engine::new(source).with_config(config).with_globals(env);
    println!("{}", engine.render(&template));
}
