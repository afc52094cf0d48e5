use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use designdb_core::config::{resolve_with_base, Config, Settings};
use designdb_core::document_source::JsonDirectorySource;
use designdb_core::traits::{DocumentRanker, DocumentSource};
use designdb_core::types::{DesignRequest, Domain, GenerationMode, PatternQuery};
use designdb_hybrid::{HybridOrchestrator, Recommendation};
use designdb_patterns::PatternRepository;
use designdb_remote::{GuardedAdapter, HttpDesignAdapter};
use designdb_text::{DocumentStore, RankingEngine};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

#[derive(Parser)]
#[command(name = "designdb")]
#[command(about = "Design token recommendations from local patterns and an optional remote generator")]
struct Cli {
    /// Directory holding config.toml (defaults to the current directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a complete token set for a project brief
    Recommend {
        #[arg(long)]
        app_type: String,
        #[arg(long)]
        industry: String,
        /// Brand mood keyword, repeatable
        #[arg(long = "mood")]
        moods: Vec<String>,
        #[arg(long)]
        primary_color: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Use the quick generator
        #[arg(long)]
        quick: bool,
        /// Skip the remote generator entirely
        #[arg(long)]
        local_only: bool,
        /// Print the full recommendation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ranked search over one document domain (styles, colors, typography, guidelines, products, charts, stack:<name>)
    Search {
        domain: String,
        query: Vec<String>,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// List stored patterns
    Patterns {
        #[arg(long)]
        category: Option<String>,
        /// Tag filter, repeatable (any match)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

fn load_documents(settings: &Settings, base: &Path) -> Result<DocumentStore> {
    let store = if settings.data.use_builtin { DocumentStore::builtin()? } else { DocumentStore::new() };
    let Some(dir) = settings.data.documents_dir.as_deref() else { return Ok(store) };

    let root = resolve_with_base(base, dir);
    let collections = JsonDirectorySource::new(&root).load().with_context(|| format!("Failed to load documents from {}", root.display()))?;
    let pb = ProgressBar::new(collections.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} collections {msg}")?.progress_chars("#>-"));
    for (name, documents) in collections {
        pb.set_message(name.clone());
        store.insert(&name, documents);
        pb.inc(1);
    }
    pb.finish_with_message("indexed");
    Ok(store)
}

fn load_patterns(settings: &Settings, base: &Path) -> Result<PatternRepository> {
    let repo = if settings.data.use_builtin { PatternRepository::with_builtin() } else { PatternRepository::new() };
    match settings.data.patterns_file.as_deref() {
        Some(file) => {
            let path = resolve_with_base(base, file);
            repo.with_persistence(&path).with_context(|| format!("Failed to open pattern store {}", path.display()))
        }
        None => Ok(repo),
    }
}

fn print_recommendation(rec: &Recommendation) {
    let t = &rec.tokens;
    println!("Design tokens ({:?} mode, adaptation {})", rec.mode, if rec.adaptation_applied { "applied" } else { "not applied" });
    println!("==============");
    println!("colors      primary={} secondary={} accent={} background={} text={}", t.colors.primary, t.colors.secondary, t.colors.accent, t.colors.background, t.colors.text);
    println!("on colors   primary={} secondary={} accent={}", t.on_colors.primary, t.on_colors.secondary, t.on_colors.accent);
    println!("states      hover={} active={} disabled={}", t.states.primary_hover, t.states.primary_active, t.states.primary_disabled);
    println!("dark        background={} surface={} text={}", t.dark.background, t.dark.surface, t.dark.text);
    println!("typography  heading={} body={} mono={} base={} ratio={}", t.typography.font_family.heading, t.typography.font_family.body, t.typography.font_family.mono, t.typography.base_size, t.typography.scale_ratio);
    println!("spacing     unit={} md={}  radius md={}", t.spacing.unit, t.spacing.md, t.radius.md);
    if !rec.references.patterns.is_empty() {
        println!("\nPatterns: {}", rec.references.patterns.join(", "));
    }
    for d in &rec.references.documents {
        println!("  {} / {} (score {:.3})", d.collection, d.title, d.score);
    }
    if !rec.issues.is_empty() {
        println!("\nIssues:");
        for issue in &rec.issues {
            println!("  [{:?}] {}: {}{}", issue.severity, issue.component, issue.message, if issue.auto_fixed { " (fixed)" } else { "" });
        }
    }
    if let Some(id) = &rec.promoted {
        println!("\nSaved as pattern {id}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base = cli.config_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let settings = Config::load_in(&base)?.settings()?;

    match cli.command {
        Commands::Recommend { app_type, industry, moods, primary_color, description, quick, local_only, json } => {
            let store = Arc::new(load_documents(&settings, &base)?);
            let patterns = Arc::new(load_patterns(&settings, &base)?);
            let mut orchestrator = HybridOrchestrator::new(Arc::new(RankingEngine::new(store)), patterns).with_settings(&settings);
            if !local_only {
                match HttpDesignAdapter::from_settings(&settings.remote)? {
                    Some(adapter) => {
                        info!("Remote generator at {}", adapter.endpoint());
                        orchestrator = orchestrator.with_remote(Arc::new(GuardedAdapter::from_settings(Arc::new(adapter), &settings)));
                    }
                    None => info!("No remote endpoint configured, using local foundation only"),
                }
            }

            let request = DesignRequest { app_type, industry, brand_mood: moods, primary_color, description };
            let mode = if quick { GenerationMode::Quick } else { GenerationMode::Full };
            let rec = orchestrator.recommend_with_mode(&request, mode).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rec)?);
            } else {
                print_recommendation(&rec);
            }
        }
        Commands::Search { domain, query, top_k } => {
            let domain = Domain::parse(&domain).with_context(|| format!("Unknown domain '{domain}'"))?;
            let query = query.join(" ");
            let engine = RankingEngine::new(Arc::new(load_documents(&settings, &base)?));
            let hits = engine.search_domain(&domain, &query, top_k.unwrap_or(settings.search.top_k));
            println!("Found {} results in {} for \"{}\"", hits.len(), domain, query);
            for (i, hit) in hits.iter().enumerate() {
                println!("\n{:>2}. score={:.4}", i + 1, hit.score);
                for (field, value) in hit.document.fields() {
                    println!("    {field}: {value}");
                }
            }
        }
        Commands::Patterns { category, tags } => {
            let repo = load_patterns(&settings, &base)?;
            let query = PatternQuery { category, tags: if tags.is_empty() { None } else { Some(tags) } };
            let found = repo.find(&query);
            println!("{} patterns", found.len());
            for p in found {
                println!("  {:<24} {:<11} {:<24} [{}]", p.id, p.category, p.name, p.tags().join(", "));
            }
        }
    }
    Ok(())
}
