use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_corpus, MatchArgs, OutputFormat};
use crate::corpus::fragments::FragmentStore;
use crate::corpus::source::Page;
use crate::matching::aggregate::MatchCandidate;
use crate::matching::engine::{MatchingEngine, ScoredFragment};

#[derive(Args)]
pub struct SearchArgs {
    /// JSON file with an array of fragments ({ "id", "notes", "signs" })
    #[arg(long, required = true)]
    pub fragments: PathBuf,

    /// Number of fragments to skip (ordered by id)
    #[arg(long, default_value = "0")]
    pub skip: usize,

    /// Number of fragments to score
    #[arg(long, default_value = "10")]
    pub limit: usize,

    #[command(flatten)]
    pub matching: MatchArgs,
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the corpus or fragments cannot be loaded, or if matching fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.matching.matching_config()?;
    args.matching.init_threads()?;

    let corpus = load_corpus(args.matching.corpus.as_ref())?;
    let fragments = FragmentStore::load_from_file(&args.fragments)?;

    if verbose {
        eprintln!(
            "Loaded {} chapters and {} fragments; scoring fragments with {}-{} signs",
            corpus.len(),
            fragments.len(),
            config.min_signs,
            config.max_signs
        );
    }

    if corpus.is_empty() {
        eprintln!("Warning: Corpus is empty, no chapters to match against.");
        return Ok(());
    }

    let engine = MatchingEngine::with_config(&corpus, config);
    let ranked = engine.search(&fragments, Page::new(args.skip, Some(args.limit)))?;

    if ranked.is_empty() {
        eprintln!("No fragment matched any chapter.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_text_results(&ranked, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Tsv => print_tsv_results(&ranked),
    }

    Ok(())
}

/// Candidates with the most matching positions first
pub(crate) fn by_position_matches(candidates: &[MatchCandidate]) -> Vec<&MatchCandidate> {
    let mut sorted: Vec<_> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
        b.position_matches
            .cmp(&a.position_matches)
            .then_with(|| a.chapter_id.cmp(&b.chapter_id))
    });
    sorted
}

pub(crate) fn print_candidates(result: &ScoredFragment, max_candidates: Option<usize>) {
    let sorted = by_position_matches(&result.candidates);
    let shown = max_candidates.unwrap_or(sorted.len()).min(sorted.len());

    println!("   Candidates:");
    for candidate in &sorted[..shown] {
        let stage = if candidate.stage.is_empty() {
            String::new()
        } else {
            format!(", {}", candidate.stage)
        };
        println!(
            "   - {} {} ({}{stage}): {}/{} signs",
            candidate.text_name,
            candidate.chapter_name,
            candidate.chapter_id,
            candidate.position_matches,
            result.sign_count
        );
    }
    if shown < sorted.len() {
        println!("   ... and {} more", sorted.len() - shown);
    }
}

fn print_text_results(ranked: &[ScoredFragment], verbose: bool) {
    for (i, result) in ranked.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }

        println!(
            "\n#{} {} ({:.1}%)",
            i + 1,
            result.fragment_id,
            result.best_match_ratio * 100.0
        );
        println!(
            "   Signs: {}, longest repeat: {}",
            result.sign_count, result.longest_repeat
        );
        if !result.notes.is_empty() {
            println!("   Notes: {}", result.notes);
        }

        print_candidates(result, if verbose { None } else { Some(5) });
    }

    println!();
}

fn print_tsv_results(ranked: &[ScoredFragment]) {
    println!(
        "rank\tfragment_id\tbest_match_ratio\tsign_count\tlongest_repeat\tchapter_id\ttext_id\ttext_name\tchapter_name\tstage\tposition_matches"
    );
    for (i, result) in ranked.iter().enumerate() {
        for candidate in by_position_matches(&result.candidates) {
            println!(
                "{}\t{}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                i + 1,
                result.fragment_id,
                result.best_match_ratio,
                result.sign_count,
                result.longest_repeat,
                candidate.chapter_id,
                candidate.text_id,
                candidate.text_name,
                candidate.chapter_name,
                candidate.stage,
                candidate.position_matches,
            );
        }
    }
}
