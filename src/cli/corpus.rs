use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::cli::{load_corpus, OutputFormat};
use crate::core::types::ChapterId;
use crate::parsing::signs::count_signs;

#[derive(Args)]
pub struct CorpusArgs {
    #[command(subcommand)]
    pub command: CorpusCommands,
}

#[derive(Subcommand)]
pub enum CorpusCommands {
    /// List all chapters in the corpus
    List {
        /// Path to custom corpus file
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Only list chapters of this text (e.g., "L.1.2")
        #[arg(long)]
        text: Option<String>,
    },

    /// Show details of a specific chapter
    Show {
        /// Chapter ID
        #[arg(required = true)]
        id: String,

        /// Path to custom corpus file
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Export the corpus to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom corpus file to export (defaults to embedded)
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

/// Execute corpus subcommand
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded, the chapter is unknown,
/// or the export cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CorpusArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CorpusCommands::List { corpus, text } => run_list(corpus, text.as_deref(), format, verbose),
        CorpusCommands::Show { id, corpus } => run_show(&id, corpus, format),
        CorpusCommands::Export { output, corpus } => run_export(&output, corpus),
    }
}

fn run_list(
    corpus_path: Option<PathBuf>,
    text_filter: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let corpus = load_corpus(corpus_path.as_ref())?;

    if verbose {
        eprintln!(
            "Loaded corpus with {} chapters from {} texts",
            corpus.len(),
            corpus.texts().len()
        );
    }

    let filtered: Vec<_> = corpus
        .chapters
        .iter()
        .filter(|c| text_filter.map_or(true, |t| c.text_id.as_str() == t))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Tsv => {
            println!("id\ttext_id\ttext_name\tname\tstage\tsigns");
            for chapter in &filtered {
                let text_name = corpus.text(&chapter.text_id).map_or("", |t| t.name.as_str());
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    chapter.id,
                    chapter.text_id,
                    text_name,
                    chapter.name,
                    chapter.stage,
                    count_signs(&chapter.signs)
                );
            }
        }
        OutputFormat::Text => {
            println!("Corpus chapters ({}):\n", filtered.len());
            for chapter in &filtered {
                let text_name = corpus.text(&chapter.text_id).map_or("?", |t| t.name.as_str());
                println!("  {} - {} {}", chapter.id, text_name, chapter.name);
                if !chapter.stage.is_empty() {
                    println!("    Stage: {}", chapter.stage);
                }
                println!("    Signs: {}", count_signs(&chapter.signs));
            }
        }
    }

    Ok(())
}

fn run_show(id: &str, corpus_path: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let corpus = load_corpus(corpus_path.as_ref())?;

    let chapter = corpus
        .get(&ChapterId::new(id))
        .ok_or_else(|| anyhow::anyhow!("Chapter not found: {id}"))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(chapter)?);
        }
        OutputFormat::Text | OutputFormat::Tsv => {
            let text_name = corpus.text(&chapter.text_id).map_or("?", |t| t.name.as_str());
            println!("Chapter: {}", chapter.id);
            println!("Text: {} ({})", text_name, chapter.text_id);
            println!("Name: {}", chapter.name);
            if !chapter.stage.is_empty() {
                println!("Stage: {}", chapter.stage);
            }
            println!("Signs: {}", count_signs(&chapter.signs));
            println!();
            println!("{}", chapter.signs);
        }
    }

    Ok(())
}

fn run_export(output: &Path, corpus_path: Option<PathBuf>) -> anyhow::Result<()> {
    let corpus = load_corpus(corpus_path.as_ref())?;
    std::fs::write(output, corpus.to_json()?)?;

    println!(
        "Exported {} chapters to {}",
        corpus.len(),
        output.display()
    );

    Ok(())
}
