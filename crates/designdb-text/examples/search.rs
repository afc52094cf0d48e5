use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use designdb_core::document_source::JsonDirectorySource;
use designdb_core::traits::DocumentRanker;
use designdb_core::types::Domain;
use designdb_text::{DocumentStore, RankingEngine};

// Rank documents of one domain and print the hits.
// Usage:
//   cargo run -p designdb-text --example search -- <domain> "your query" \
//     [--data DIR] [--limit 10]
// Domains: styles, colors, typography, guidelines, products, charts, stack:<name>

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run -p designdb-text --example search -- <domain> <query> [--data DIR] [--limit N]");
        std::process::exit(1);
    }
    let mut positional: Vec<String> = Vec::new();
    let mut data_dir: Option<PathBuf> = None;
    let mut limit: usize = 10;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--data" => {
                if i + 1 >= args.len() { eprintln!("--data requires a path"); std::process::exit(2); }
                data_dir = Some(PathBuf::from(&args[i + 1]));
                i += 2; continue;
            }
            "--limit" => {
                if i + 1 >= args.len() { eprintln!("--limit requires a number"); std::process::exit(2); }
                limit = args[i + 1].parse().unwrap_or(limit);
                i += 2; continue;
            }
            s if s.starts_with("--") => {
                eprintln!("Unknown flag: {}", s); std::process::exit(2);
            }
            s => { positional.push(s.to_string()); i += 1; }
        }
    }

    let Some(domain) = positional.first().and_then(|d| Domain::parse(d)) else {
        eprintln!("Unknown domain: {}", positional.first().map(String::as_str).unwrap_or_default());
        std::process::exit(2);
    };
    let query = positional[1..].join(" ");

    let store = match &data_dir {
        Some(dir) => {
            let store = DocumentStore::new();
            store.load_from(&JsonDirectorySource::new(dir))?;
            store
        }
        None => DocumentStore::builtin()?,
    };

    println!("BM25 search\n===========");
    println!("Collection: {} ({} documents loaded)", domain.collection(), store.document_count());
    println!("Query: {} (limit {})\n", query, limit);

    let engine = RankingEngine::new(Arc::new(store));
    for (i, hit) in engine.search_domain(&domain, &query, limit).iter().enumerate() {
        let fields: Vec<String> = hit.document.fields().take(3).map(|(k, v)| format!("{k}={v}")).collect();
        println!("{:>2}. score={:.4}  {}", i + 1, hit.score, fields.join("  "));
    }
    Ok(())
}
