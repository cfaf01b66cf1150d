//! ontoquery CLI: ask questions of an OWL ontology, locally or through a
//! running `ontoqueryd`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde_json::{Map, Value};

use ontoquery::client::OntologyClient;
use ontoquery::config::ServiceConfig;
use ontoquery::dispatch::Dispatcher;
use ontoquery::oracle::{Oracle, OwlOracle};
use ontoquery::protocol::{Request, RequestKind};

#[derive(Parser)]
#[command(name = "ontoquery", version, about = "Ontology query service client")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preferred language tag for labels and comments.
    #[arg(long, global = true)]
    language: Option<String>,

    /// Attribute whose first value labels an individual.
    #[arg(long, global = true)]
    name_attribute: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one request against a local ontology and print the response.
    Query {
        /// Ontology document (defaults to the configured one).
        #[arg(long)]
        ontology: Option<PathBuf>,

        /// Request kind, e.g. GetSuperClasses.
        #[arg(long = "type")]
        kind: String,

        /// Request data as a JSON object, e.g. '{"Class":"Rice"}'.
        #[arg(long)]
        data: Option<String>,
    },

    /// Send one request to a running daemon and print the response.
    Send {
        /// Daemon address (defaults to the configured bind:port).
        #[arg(long)]
        addr: Option<String>,

        #[arg(long = "type")]
        kind: String,

        #[arg(long)]
        data: Option<String>,
    },

    /// Search individuals by keywords.
    Search {
        #[arg(long)]
        ontology: Option<PathBuf>,

        keywords: String,
    },

    /// Show the ontology namespace and entity counts.
    Info {
        #[arg(long)]
        ontology: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env()?;
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(name) = cli.name_attribute {
        config.name_attribute = name;
    }

    match cli.command {
        Commands::Query {
            ontology,
            kind,
            data,
        } => {
            let dispatcher = local_dispatcher(&mut config, ontology)?;
            let request = build_request(kind, data.as_deref())?;
            println!("{}", dispatcher.handle(&request).to_json());
        }

        Commands::Send { addr, kind, data } => {
            let addr = addr.unwrap_or_else(|| config.listen_addr());
            let client = OntologyClient::new(addr.as_str())?
                .with_max_frame_bytes(config.max_frame_bytes);
            let request = build_request(kind, data.as_deref())?;
            println!("{}", client.send(&request)?.to_json());
        }

        Commands::Search { ontology, keywords } => {
            let dispatcher = local_dispatcher(&mut config, ontology)?;
            let request = Request::new(RequestKind::SearchIndividuals).with("Keywords", keywords);
            println!("{}", dispatcher.handle(&request).to_json());
        }

        Commands::Info { ontology } => {
            let dispatcher = local_dispatcher(&mut config, ontology)?;
            let oracle = dispatcher.oracle();
            println!("Ontology:    {}", config.ontology.display());
            println!("Namespace:   {}", oracle.namespace());
            println!("Classes:     {}", oracle.classes()?.len());
            println!("Relations:   {}", oracle.relations()?.len());
            println!("Attributes:  {}", oracle.attributes()?.len());
            println!("Individuals: {}", oracle.individuals()?.len());
        }
    }

    Ok(())
}

fn local_dispatcher(config: &mut ServiceConfig, ontology: Option<PathBuf>) -> Result<Dispatcher> {
    if let Some(path) = ontology {
        config.ontology = path;
    }
    config.validate()?;
    let oracle = OwlOracle::load(&config.ontology, &config.oracle_settings())?;
    let oracle: Arc<dyn Oracle> = Arc::new(oracle);
    Ok(Dispatcher::new(oracle, config.name_attribute.clone())?)
}

fn build_request(kind: String, data: Option<&str>) -> Result<Request> {
    let data = match data {
        Some(text) => Some(serde_json::from_str::<Map<String, Value>>(text).into_diagnostic()?),
        None => None,
    };
    Ok(Request { kind, data })
}
