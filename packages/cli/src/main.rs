//! `hnav`: walk a hypermedia API from the command line.
//!
//! Provides two subcommands:
//!
//! - **`walk`**: GET an entry point, then follow relations hop by hop and
//!   print the final response (or the whole trail with `--history`).
//! - **`links`**: GET a document and list every link it advertises.
//!
//! Headers, query parameters, and the links property are configured once
//! and applied to every hop.

use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hypernav::{hyperlinks, NavError, Navigator, Outcome, Payload};
use hypernav_client::{HttpExecutor, HttpNavigator};
use serde_json::{json, Value};

/// hnav: hypermedia API walker
///
/// Follow advertised relations instead of hard-coding endpoint URIs.
#[derive(Parser)]
#[command(name = "hnav", version, about, long_about = None)]
struct Cli {
    /// Prefix for the entry URI, e.g. `http://localhost:8080`.
    #[arg(long, env = "HNAV_BASE", default_value = "", global = true)]
    base: String,

    /// Prefix for followed hrefs. Defaults to --base.
    #[arg(long, value_name = "URL", global = true)]
    link_base: Option<String>,

    /// Request header, repeatable: -H "Accept: application/json"
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", global = true)]
    headers: Vec<String>,

    /// Query parameter, repeatable: -q page=2
    #[arg(short = 'q', long = "param", value_name = "KEY=VALUE", global = true)]
    params: Vec<String>,

    /// JSON property that holds link arrays.
    #[arg(long, env = "HNAV_LINKS_KEY", default_value = "_links", global = true)]
    links_key: String,

    /// Record error responses and keep going instead of failing.
    #[arg(long, global = true)]
    keep_going: bool,

    /// Per-request timeout in seconds. No timeout by default.
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// GET ENTRY, then follow each STEP with a GET.
    ///
    /// A STEP is either a relation name (`next`) or an item selection
    /// `COLLECTION:KEY=VALUE:REL`, which picks the first entry of the
    /// COLLECTION array whose KEY equals VALUE and follows REL from it.
    ///
    /// Examples:
    ///   hnav --base http://localhost:8080 walk / -f books -f books:isbn=978-0441172719:self
    ///   hnav walk https://api.example.com/ -f orders -f next --history
    Walk {
        /// Entry URI, appended to --base.
        entry: String,

        /// Relation or item selection to follow; repeat for each hop.
        #[arg(short = 'f', long = "follow", value_name = "STEP")]
        steps: Vec<Step>,

        /// Print every exchange as a JSON line instead of the final body.
        #[arg(long)]
        history: bool,
    },

    /// GET ENTRY and list the links it advertises, one per line.
    Links {
        /// Entry URI, appended to --base.
        entry: String,
    },
}

/// One hop of a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Relation(String),
    Item {
        collection: String,
        key: String,
        value: String,
        relation: String,
    },
}

/// Parses `REL` or `COLLECTION:KEY=VALUE:REL`. Anything that does not fit
/// the item form is taken as a relation name, so URI relations such as
/// `http://example.com/rels/next` stay intact.
impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("a step must not be empty".into());
        }
        let item = s.split_once(':').and_then(|(collection, rest)| {
            let (selector, relation) = rest.rsplit_once(':')?;
            let (key, value) = selector.split_once('=')?;
            (!collection.is_empty() && !key.is_empty() && !relation.is_empty()).then(|| {
                Step::Item {
                    collection: collection.to_string(),
                    key: key.to_string(),
                    value: value.to_string(),
                    relation: relation.to_string(),
                }
            })
        });
        Ok(item.unwrap_or_else(|| Step::Relation(s.to_string())))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hnav=warn,hypernav=warn,hypernav_client=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut nav = build_navigator(&cli);
    let link_base = cli.link_base.clone().unwrap_or_else(|| cli.base.clone());

    let outcome = match cli.command {
        Command::Walk {
            entry,
            steps,
            history,
        } => walk(&mut nav, &entry, &steps, &link_base).map(|()| {
            if history {
                for r in nav.results() {
                    println!("{}", summarise(r));
                }
            } else if let Some(r) = nav.result() {
                print_outcome(r);
            }
        }),
        Command::Links { entry } => nav.get(&entry).and_then(|nav| {
            let doc: Value = nav
                .result()
                .ok_or_else(|| NavError::Schema("no response recorded".into()))?
                .json()?;
            for link in hyperlinks(&doc, nav.config().links_property()) {
                match link.method {
                    Some(method) => println!("{}\t{}\t{}", link.rel, link.href, method),
                    None => println!("{}\t{}", link.rel, link.href),
                }
            }
            Ok(())
        }),
    };

    if let Err(e) = outcome {
        eprintln!("hnav: {e}");
        if let Some(text) = e.outcome().and_then(Outcome::error_body) {
            if !text.is_empty() {
                eprintln!("{text}");
            }
        }
        process::exit(1);
    }
}

fn build_navigator(cli: &Cli) -> HttpNavigator {
    let mut builder = reqwest::blocking::Client::builder();
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder
        .build()
        .unwrap_or_else(|e| fatal(&format!("failed to build HTTP client: {e}")));

    let mut nav = Navigator::new(HttpExecutor::with_client(client));
    nav.with_base(cli.base.as_str())
        .with_links_property(cli.links_key.as_str())
        .with_request_errors(!cli.keep_going)
        .accept("application/json");

    for raw in &cli.headers {
        let (name, value) = raw.split_once(':').unwrap_or_else(|| {
            fatal(&format!("invalid --header {raw:?}: expected format NAME:VALUE"))
        });
        let name = name.trim();
        if name.eq_ignore_ascii_case("accept") {
            nav.remove_header("Accept");
        }
        nav.add_header(name, value.trim());
    }
    for raw in &cli.params {
        let (key, value) = raw.split_once('=').unwrap_or_else(|| {
            fatal(&format!("invalid --param {raw:?}: expected format KEY=VALUE"))
        });
        nav.add_parameter(key, value);
    }
    nav
}

fn walk(nav: &mut HttpNavigator, entry: &str, steps: &[Step], link_base: &str) -> Result<(), NavError> {
    nav.get(entry)?;
    for step in steps {
        tracing::info!(?step, "following");
        let transition = match step {
            Step::Relation(rel) => nav.follow_with_base(rel, link_base)?,
            Step::Item {
                collection,
                key,
                value,
                relation,
            } => nav.follow_item_with_base(collection, key, value, relation, link_base)?,
        };
        transition.get()?;
    }
    Ok(())
}

fn print_outcome(r: &Outcome) {
    match r.payload() {
        Payload::Body(bytes) => match serde_json::from_slice::<Value>(bytes) {
            Ok(doc) => println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default()),
            Err(_) => println!("{}", String::from_utf8_lossy(bytes)),
        },
        Payload::Error(text) => {
            eprintln!("{} {}", r.status(), r.status_message());
            println!("{text}");
        }
        Payload::Empty => eprintln!("{} {}", r.status(), r.status_message()),
    }
}

/// One-line JSON summary of an exchange for `--history`.
fn summarise(r: &Outcome) -> Value {
    let (body, error) = match r.payload() {
        Payload::Body(bytes) => (Some(String::from_utf8_lossy(bytes).into_owned()), None),
        Payload::Error(text) => (None, Some(text.clone())),
        Payload::Empty => (None, None),
    };
    json!({
        "method": r.method(),
        "uri": r.uri(),
        "status": r.status(),
        "message": r.status_message(),
        "body": body,
        "error": error,
    })
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("hnav: {}", msg);
    process::exit(2);
}
