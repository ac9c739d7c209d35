use std::env;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use docqa_core::config::Config;
use docqa_core::error::Error;
use docqa_core::traits::EmbeddingProvider;
use docqa_embed::get_default_embedder;
use docqa_retrieval::{Retriever, SourceFilter};
use docqa_vector::LanceVectorIndex;
use tracing_subscriber::EnvFilter;

/// Exit status for index or embedding outages, distinct from bad input.
const EXIT_TRANSIENT: i32 = 2;

struct Args {
    question: String,
    k: Option<usize>,
    no_filter: bool,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <question> [--k N] [--no-filter]");
    eprintln!("Example: {program} 'Who is the consignee?' --k 4");
    process::exit(1);
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut question = None;
    let mut k = None;
    let mut no_filter = false;
    let mut it = args.iter().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--k" => {
                let raw = it.next().context("--k needs a value")?;
                k = Some(raw.parse::<usize>().with_context(|| format!("invalid --k value: {raw}"))?);
            }
            "--no-filter" => no_filter = true,
            flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
            text if question.is_none() => question = Some(text.to_string()),
            extra => bail!("unexpected argument: {extra}"),
        }
    }
    let question = question.context("missing question")?;
    Ok(Args { question, k, no_filter })
}

fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let mut settings = config.settings()?;
    if let Some(k) = args.k { settings.retrieval.k = k; }

    let embedder: Arc<dyn EmbeddingProvider> = Arc::from(get_default_embedder(&settings.embedding)?);
    let uri = config.resolve_path(&settings.vector.uri);
    let index = LanceVectorIndex::open(&uri.to_string_lossy(), &settings.vector.table, embedder.clone(), settings.vector.metric)?;

    let mut retriever = Retriever::from_settings(index, &settings, Some(embedder))?;
    if args.no_filter { retriever = retriever.with_filter(SourceFilter::None); }

    let result = retriever.retrieve(&args.question)?;
    tracing::info!(confidence = result.confidence, sources = result.sources.len(), "answered");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map_or("docqa-ask", String::as_str);
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("❌ {err}");
            usage(program);
        }
    };

    if let Err(err) = run(args) {
        let transient = err.downcast_ref::<Error>().is_some_and(Error::is_transient);
        if transient {
            eprintln!("❌ Temporary system error, try again: {err:#}");
            process::exit(EXIT_TRANSIENT);
        }
        eprintln!("❌ {err:#}");
        process::exit(1);
    }
}
