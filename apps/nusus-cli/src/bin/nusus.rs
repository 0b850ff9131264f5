use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nusus_core::config::{Config, ConsoleSettings, Settings};
use nusus_core::source::load_corpus;
use nusus_core::{CorpusKind, CorpusSelector, RawCorpus, SearchResult, VerseTable};
use nusus_embed::get_default_embedder;
use nusus_search::{Corpora, EngineOptions, SearchEngine, SearchResults};

const SAMPLE_QUERIES: [&str; 3] = ["الرحمة في الإسلام", "الصبر على المصائب", "فضل الزكاة والصدقة"];

#[derive(Parser)]
#[command(name = "nusus", version, about = "Semantic search over the Qur'an and Sahih al-Bukhari")]
struct Cli {
    /// Directory holding config.toml and config.<env>.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search one or both corpora; runs the sample queries when no query is given
    Search(SearchArgs),
    /// Show a verse with its neighbours in the same surah
    Verse {
        surah: usize,
        ayah: usize,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// scripture | narration | both (quran, hadith and all are accepted too)
    #[arg(long, default_value = "both")]
    corpus: CorpusSelector,
    #[arg(long, short = 'k')]
    top_k: Option<usize>,
    /// Hide results scoring below this value (console output only)
    #[arg(long)]
    min_score: Option<f32>,
    #[arg(long)]
    json: bool,
    query: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nusus=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config_dir {
        Some(dir) => Config::load_from(dir)?,
        None => Config::load()?,
    };
    let mut settings = config.settings()?;
    if let Some(dir) = &cli.config_dir {
        settings = settings.relative_to(dir);
    }
    info!(env = config.env_name(), "configuration loaded");

    match cli.command {
        Command::Search(args) => run_search(&settings, args),
        Command::Verse { surah, ayah, json } => run_verse(&settings, surah, ayah, json),
    }
}

/// Load only the corpora the selector asks for; the others stay empty.
fn build_engine(settings: &Settings, selector: CorpusSelector) -> Result<SearchEngine> {
    let data_dir = settings.data.dir_path();
    let load = |kind: CorpusKind, candidates: &[String]| -> Result<RawCorpus> {
        if selector.includes(kind) {
            Ok(load_corpus(kind, &data_dir, candidates)?)
        } else {
            Ok(RawCorpus::default())
        }
    };
    let corpora = Corpora {
        scripture: load(CorpusKind::Scripture, &settings.data.scripture)?,
        narration: load(CorpusKind::Narration, &settings.data.narration)?,
    };

    let embedder = get_default_embedder(&settings.model)?;
    let options = EngineOptions { show_progress: true, ..EngineOptions::from_settings(settings) };
    let start = Instant::now();
    let engine = SearchEngine::new(&corpora, embedder, options)?;
    info!(elapsed = ?start.elapsed(), "engine ready");
    Ok(engine)
}

fn run_search(settings: &Settings, args: SearchArgs) -> Result<()> {
    let top_k = args.top_k.unwrap_or(settings.search.default_top_k);
    if top_k == 0 || top_k > settings.search.max_top_k {
        bail!("--top-k must be between 1 and {}", settings.search.max_top_k);
    }
    let queries: Vec<String> = if args.query.is_empty() {
        SAMPLE_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        vec![args.query.join(" ")]
    };

    let engine = build_engine(settings, args.corpus)?;
    let console = ConsoleSettings {
        min_score: args.min_score.unwrap_or(settings.console.min_score),
        ..settings.console.clone()
    };

    for query in &queries {
        let results = engine.search(query, args.corpus, top_k)?;
        if args.json {
            let out = serde_json::json!({ "query": query, "results": results });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            print_results(query, &results, &console);
        }
    }
    Ok(())
}

/// Reads the scripture file only; nothing is embedded.
fn run_verse(settings: &Settings, surah: usize, ayah: usize, json: bool) -> Result<()> {
    let raw = load_corpus(CorpusKind::Scripture, &settings.data.dir_path(), &settings.data.scripture)?;
    let verses = VerseTable::new(&raw, &settings.citation);
    let Some(ctx) = verses.context(surah, ayah) else {
        bail!("no verse at {surah}:{ayah}");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&ctx)?);
        return Ok(());
    }
    if let Some(prev) = ctx.previous {
        println!("   {}", prev.text);
    }
    println!("📖 {}", ctx.verse.text);
    println!("   → {}", ctx.verse.citation);
    if let Some(next) = ctx.next {
        println!("   {}", next.text);
    }
    Ok(())
}

fn print_results(query: &str, results: &SearchResults, console: &ConsoleSettings) {
    println!("\nSearch Query: '{query}'");
    println!("{}", "=".repeat(60));
    for (kind, hits) in results {
        let heading = match kind {
            CorpusKind::Scripture => "📖 Qur'an Matches:",
            CorpusKind::Narration => "📚 Hadith Matches:",
        };
        println!("\n{heading}");
        print_hits(hits, console);
    }
    println!("{}", "=".repeat(60));
}

fn print_hits(hits: &[SearchResult], console: &ConsoleSettings) {
    let mut shown_any = false;
    // Numbering keeps the rank, so hidden results leave gaps.
    for (i, hit) in hits.iter().enumerate() {
        if hit.score < console.min_score {
            continue;
        }
        println!("{}. {}", i + 1, truncate(&hit.text, console.max_text_len));
        println!("   → {}", hit.citation());
        println!("   → Relevance: {:.3}", hit.score);
        shown_any = true;
    }
    if !shown_any {
        println!("   (no items above threshold)");
    }
}

/// Cut to at most `max_chars` characters, the last three being "...".
fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
