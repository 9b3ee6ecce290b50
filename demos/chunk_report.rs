use std::env;
use std::fs;
use std::sync::Arc;

use tracing_subscriber::FmtSubscriber;

use chunksmith::{
    ChunkingConfig, ChunkingEngine, HeuristicCounter, TokenCounter, WordCounter,
};
#[cfg(feature = "tiktoken-counter")]
use chunksmith::TiktokenCounter;

#[cfg(feature = "tiktoken-counter")]
const DEFAULT_COUNTER: &str = "tiktoken";
#[cfg(not(feature = "tiktoken-counter"))]
const DEFAULT_COUNTER: &str = "words";

const SAMPLE: &str = "\
# The Project\n\n\
An introduction paragraph that sets the scene for everything below.\n\n\
## Getting Started\n\n\
Install the toolchain. Clone the repository. Run the test suite once to \
make sure the environment is sound.\n\n\
```\n\
# this hash line is code, not a header\n\
cargo test\n\
```\n\n\
## Configuration\n\n\
Budgets are expressed in tokens and the overlap is a percentage of each \
flushed chunk. Defaults work well for embedding models with a 512 token \
window.\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let budget = env::var("CHUNK_TOKENS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(64);
    let overlap = env::var("CHUNK_OVERLAP")
        .ok()
        .and_then(|value| value.parse::<u8>().ok())
        .unwrap_or(10);
    let counter_name =
        env::var("CHUNK_COUNTER").unwrap_or_else(|_| DEFAULT_COUNTER.to_string());

    let content = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path)?,
        None => SAMPLE.to_string(),
    };

    let counter = build_counter(&counter_name)?;
    let engine = ChunkingEngine::builder()
        .config(
            ChunkingConfig::new()
                .chunk_token_num(budget)
                .overlapped_percent(overlap),
        )
        .counter_arc(counter)
        .build()?;

    let outcome = engine.chunk(&content);

    for (index, chunk) in outcome.chunks.iter().enumerate() {
        let marker = if chunk.oversized { " [oversized]" } else { "" };
        println!(
            "--- chunk {} · {} · {} tokens{}",
            index + 1,
            chunk.header_path,
            chunk.token_count,
            marker
        );
        println!("{}\n", chunk.text);
    }

    println!("Chunking complete");
    println!("  counter        : {}", counter_name);
    println!("  budget         : {} tokens ({}% overlap)", budget, overlap);
    println!("  sections       : {}", outcome.stats.total_sections);
    println!("  chunks         : {}", outcome.stats.total_chunks);
    println!("  avg tokens     : {:.1}", outcome.stats.average_tokens);
    println!("  oversized      : {}", outcome.stats.oversized_chunks);

    Ok(())
}

fn build_counter(name: &str) -> Result<Arc<dyn TokenCounter>, Box<dyn std::error::Error>> {
    match name {
        "words" => Ok(Arc::new(WordCounter)),
        "heuristic" => Ok(Arc::new(HeuristicCounter::english())),
        "heuristic-cjk" => Ok(Arc::new(HeuristicCounter::cjk())),
        #[cfg(feature = "tiktoken-counter")]
        "tiktoken" => Ok(Arc::new(TiktokenCounter::new()?)),
        #[cfg(feature = "tiktoken-counter")]
        model if model.starts_with("tiktoken:") => Ok(Arc::new(TiktokenCounter::for_model(
            model.trim_start_matches("tiktoken:"),
        )?)),
        other => Err(format!("unknown counter '{other}'").into()),
    }
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder().with_env_filter("info").finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
