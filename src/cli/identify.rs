use std::path::PathBuf;

use clap::Args;

use crate::cli::search::{by_position_matches, print_candidates};
use crate::cli::{load_corpus, MatchArgs, OutputFormat};
use crate::core::fragment::Fragment;
use crate::core::grid::SignGrid;
use crate::corpus::store::CorpusStore;
use crate::matching::engine::{FragmentResult, MatchingEngine, ScoredFragment};
use crate::matching::pattern::SignPattern;
use crate::utils::validation::validate_annotation;

#[derive(Args)]
pub struct IdentifyArgs {
    /// File holding the sign annotation, one manuscript line per line.
    /// Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Number of candidates to show
    #[arg(short = 'n', long, default_value = "5")]
    pub max_candidates: usize,

    /// Print the search pattern compiled for each sign position
    #[arg(long)]
    pub show_patterns: bool,

    #[command(flatten)]
    pub matching: MatchArgs,
}

/// Execute identify subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read, is too large, or matching fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: IdentifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.matching.matching_config()?;
    args.matching.init_threads()?;

    let annotation = read_input(&args)?;
    validate_annotation(&annotation)?;

    let fragment = Fragment::new(input_name(&args), annotation);
    let grid = fragment.grid();

    if verbose {
        eprintln!(
            "Parsed {} signs in {} rows from input",
            grid.sign_count(),
            grid.rows().len()
        );
    }

    let corpus = load_corpus(args.matching.corpus.as_ref())?;
    if verbose {
        eprintln!("Loaded corpus with {} chapters", corpus.len());
    }

    if args.show_patterns {
        print_patterns(&grid, &corpus)?;
    }

    let engine = MatchingEngine::with_config(&corpus, config);
    let scored = match engine.score_fragment(&fragment)? {
        FragmentResult::Scored(scored) => scored,
        FragmentResult::Skipped(_) => {
            anyhow::bail!(
                "Input has {} signs; only fragments with {}-{} signs are scored",
                grid.sign_count(),
                engine.config().min_signs,
                engine.config().max_signs
            );
        }
    };

    if scored.candidates.is_empty() {
        eprintln!("No matching chapters found.");
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_text_result(&scored, args.max_candidates),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&scored)?),
        OutputFormat::Tsv => print_tsv_result(&scored, args.max_candidates),
    }

    Ok(())
}

fn read_input(args: &IdentifyArgs) -> anyhow::Result<String> {
    use std::io::{self, Read};

    if args.input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    Ok(std::fs::read_to_string(&args.input)?)
}

fn input_name(args: &IdentifyArgs) -> String {
    if args.input.to_string_lossy() == "-" {
        "stdin".to_string()
    } else {
        args.input
            .file_name()
            .map_or_else(|| "input".to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// Print each position's pattern and the text it matched in every chapter
fn print_patterns(grid: &SignGrid, corpus: &CorpusStore) -> anyhow::Result<()> {
    for position in grid.positions() {
        let pattern = SignPattern::compile(grid, position)?;
        eprintln!("{position}\t{pattern}");
        for chapter in &corpus.chapters {
            if let Some((start, end)) = pattern.find(&chapter.signs) {
                eprintln!("  {}\t{:?}", chapter.id, &chapter.signs[start..end]);
            }
        }
    }
    Ok(())
}

fn print_text_result(scored: &ScoredFragment, max_candidates: usize) {
    println!(
        "\n{}: {} signs, best match {:.1}%, longest repeat {}",
        scored.fragment_id,
        scored.sign_count,
        scored.best_match_ratio * 100.0,
        scored.longest_repeat
    );
    print_candidates(scored, Some(max_candidates));
    println!();
}

fn print_tsv_result(scored: &ScoredFragment, max_candidates: usize) {
    println!("rank\tchapter_id\ttext_id\ttext_name\tchapter_name\tstage\tposition_matches\tsign_count");
    for (i, candidate) in by_position_matches(&scored.candidates)
        .into_iter()
        .take(max_candidates)
        .enumerate()
    {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            i + 1,
            candidate.chapter_id,
            candidate.text_id,
            candidate.text_name,
            candidate.chapter_name,
            candidate.stage,
            candidate.position_matches,
            scored.sign_count,
        );
    }
}
