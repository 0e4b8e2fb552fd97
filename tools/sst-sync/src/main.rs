//! SST Sync Tool
//!
//! Downloads the Stanford Sentiment Treebank and exposes its splits for
//! inspection, JSONL export and vocabulary building.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sentitree_core::parser::{BasicEnglishTokenizer, WhitespaceTokenizer};
use sentitree_core::{Dataset, SpecialTokens, Split, Vocab, VocabBuilder};
use sentitree_datasets::{SstConfig, SstLoader, SST};
use tracing::info;

/// Default data directory
fn default_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentitree")
}

/// CLI arguments
#[derive(Parser)]
#[command(name = "sst-sync")]
#[command(about = "Download, inspect and export the Stanford Sentiment Treebank")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root directory for downloaded corpora
    #[arg(short, long, env = "SENTITREE_ROOT")]
    root: Option<PathBuf>,

    /// Folder name of the corpus within the root directory
    #[arg(short, long, env = "SENTITREE_DATASET", default_value = "sst")]
    name: String,

    /// Archive URL (defaults to the Stanford mirror)
    #[arg(short, long, env = "SENTITREE_URL")]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and extract the corpus
    Download {
        /// Replace an existing download
        #[arg(short, long)]
        force: bool,
    },
    /// Print example and label counts per split
    Stats {
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Write one split as JSON lines of {"text": [...], "label": "..."}
    Export {
        /// Split to export
        #[arg(short, long, value_enum)]
        split: SplitArg,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Build a vocabulary over the training split and save it as JSON
    Vocab {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Minimum token frequency
        #[arg(long, default_value_t = 1)]
        min_freq: usize,
        /// Maximum number of regular tokens
        #[arg(long)]
        max_size: Option<usize>,
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Show where the corpus lives and how many trees each split has
    Status,
    /// Remove the downloaded corpus
    Clean {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Options shared by every command that loads splits.
#[derive(Args, Clone, Copy, Debug)]
struct LoadArgs {
    /// Expand every subtree of the training trees into an example
    #[arg(long)]
    subtrees: bool,
    /// Keep five sentiment classes
    #[arg(long)]
    fine_grained: bool,
    /// Re-tokenize sentences instead of keeping tree leaves
    #[arg(long, value_enum)]
    tokenizer: Option<TokenizerArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SplitArg {
    Train,
    Validation,
    Test,
}

impl From<SplitArg> for Split {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Train => Split::Train,
            SplitArg::Validation => Split::Validation,
            SplitArg::Test => Split::Test,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TokenizerArg {
    Whitespace,
    BasicEnglish,
}

/// Build the loader for the selected corpus.
fn loader(config: SstConfig, load: LoadArgs) -> Result<SstLoader> {
    let config = config
        .with_train_subtrees(load.subtrees)
        .with_fine_grained(load.fine_grained);

    let loader = SstLoader::new(config);
    Ok(match load.tokenizer {
        None => loader,
        Some(TokenizerArg::Whitespace) => loader.with_tokenizer(WhitespaceTokenizer::new()),
        Some(TokenizerArg::BasicEnglish) => loader.with_tokenizer(
            BasicEnglishTokenizer::new().context("Failed to build basic english tokenizer")?,
        ),
    })
}

/// Write each example as one JSON line; returns the number written.
fn export_jsonl(dataset: &Dataset, out: &mut impl Write) -> Result<usize> {
    for example in dataset {
        serde_json::to_writer(&mut *out, example)?;
        writeln!(out)?;
    }
    Ok(dataset.len())
}

/// Vocabulary with `<pad>`, `<cls>` and `<sep>` specials over `dataset`.
fn build_vocab(dataset: &Dataset, min_freq: usize, max_size: Option<usize>) -> Vocab {
    let mut builder = VocabBuilder::new()
        .with_specials(SpecialTokens::standard())
        .with_min_freq(min_freq);
    if let Some(max) = max_size {
        builder = builder.with_max_size(max);
    }
    builder.add_dataset(dataset);
    builder.build()
}

/// Number of non-blank lines in each split file that exists.
fn split_line_counts(config: &SstConfig) -> Result<Vec<(Split, Option<usize>)>> {
    Split::ALL
        .into_iter()
        .map(|split| {
            let path = config.split_path(split);
            if !path.is_file() {
                return Ok((split, None));
            }
            Ok((split, Some(count_trees(&path)?)))
        })
        .collect()
}

fn count_trees(path: &Path) -> Result<usize> {
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    );
    let mut count = 0;
    for line in reader.lines() {
        if !line?.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

fn print_stats(split: Split, dataset: &Dataset) {
    println!("{split}: {} examples", dataset.len());
    for (label, count) in dataset.label_counts() {
        println!("  {label:<14} {count}");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = SstConfig::new()
        .with_root(cli.root.unwrap_or_else(default_root))
        .with_name(cli.name)
        .with_url(cli.url.unwrap_or_else(|| SST.url.to_string()));

    match cli.command {
        Commands::Download { force } => {
            info!(root = %config.root.display(), "Downloading SST...");
            config = config.with_overwrite(force);
            let dir = SstLoader::new(config)
                .fetch()
                .context("Failed to download dataset")?;
            println!("Dataset ready at {}", dir.display());
        }
        Commands::Stats { load } => {
            let splits = loader(config, load)?.load().context("Failed to load dataset")?;
            for split in Split::ALL {
                print_stats(split, splits.get(split));
            }
        }
        Commands::Export {
            split,
            output,
            load,
        } => {
            let loader = loader(config, load)?;
            loader.fetch().context("Failed to download dataset")?;
            let dataset = loader
                .load_split(split.into())
                .context("Failed to load split")?;

            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let mut writer = BufWriter::new(file);
            let written = export_jsonl(&dataset, &mut writer)?;
            writer.flush()?;

            println!("Exported {written} examples to {}", output.display());
        }
        Commands::Vocab {
            output,
            min_freq,
            max_size,
            load,
        } => {
            let loader = loader(config, load)?;
            loader.fetch().context("Failed to download dataset")?;
            let train = loader
                .load_split(Split::Train)
                .context("Failed to load training split")?;

            let vocab = build_vocab(&train, min_freq, max_size);
            vocab
                .save_json(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!("Saved {} tokens to {}", vocab.len(), output.display());
        }
        Commands::Status => {
            let dir = config.dataset_dir();
            println!("Dataset directory: {}", dir.display());
            if !dir.exists() {
                println!("Not downloaded. Run `sst-sync download`.");
                return Ok(());
            }
            for (split, count) in split_line_counts(&config)? {
                match count {
                    Some(n) => println!("  {split:<10} {n} trees"),
                    None => println!("  {split:<10} missing"),
                }
            }
        }
        Commands::Clean { yes } => {
            let dir = config.dataset_dir();
            if !dir.exists() {
                info!("Nothing to clean");
                return Ok(());
            }
            if !yes {
                println!("This will remove {}.", dir.display());
                print!("Are you sure? [y/N]: ");
                std::io::stdout().flush()?;

                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;

                if !input.trim().eq_ignore_ascii_case("y") {
                    info!("Clean cancelled");
                    return Ok(());
                }
            }
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
            info!(path = %dir.display(), "Removed dataset");
        }
    }

    Ok(())
}
