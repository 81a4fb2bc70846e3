use std::path::PathBuf;

use clap::Parser;
use log::info;

use dawg_rs::dawg::{Dawg, DawgConfig};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Word list, one word per line.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Initial bucket table size (in bits, so the actual size is `2^size` buckets).
    #[clap(
        long,
        value_name = "INT",
        default_value = "16",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=24)
    )]
    size: usize,

    /// Remap the symbols in use to a dense label range after loading.
    #[clap(long)]
    optimize: bool,

    /// Print the words starting with this prefix.
    #[clap(long, value_name = "STR")]
    prefix: Option<String>,

    /// Print the words ending with this suffix.
    #[clap(long, value_name = "STR")]
    suffix: Option<String>,

    /// Print the nearest neighbours of this word.
    #[clap(long, value_name = "STR")]
    near: Option<String>,

    /// Maximum number of words printed per query.
    #[clap(long, value_name = "INT", default_value = "20")]
    limit: usize,

    /// Write the automaton in DOT format to this file.
    #[clap(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Enable debug logging.
    #[clap(long)]
    verbose: bool,
}

fn print_words(title: &str, words: impl Iterator<Item = dawg_rs::error::Result<String>>, limit: usize) -> color_eyre::Result<()> {
    println!("{}:", title);
    let mut count = 0;
    for word in words {
        let word = word?;
        if count < limit {
            println!("  {}", word);
        }
        count += 1;
    }
    if count > limit {
        println!("  ... and {} more", count - limit);
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let text = std::fs::read_to_string(&args.input)?;
    let dawg = Dawg::new(DawgConfig::default().with_bucket_bits(args.size));

    let time_build = std::time::Instant::now();
    let mut lines = 0;
    for word in text.lines().map(str::trim).filter(|w| !w.is_empty()) {
        lines += 1;
        dawg.insert(word)?;
    }
    info!(
        "Loaded {} words ({} lines) in {:.3}s",
        dawg.len(),
        lines,
        time_build.elapsed().as_secs_f64()
    );
    println!("dawg = {:?}", dawg);
    println!(
        "nodes = {}, transitions = {}",
        dawg.node_count(),
        dawg.transition_count()
    );

    if args.optimize {
        dawg.optimize_alphabet();
        println!("alphabet size = {:?}", dawg.alphabet_size());
    }

    if let (Some(first), Some(last)) = (dawg.first(), dawg.last()) {
        println!("first = {:?}, last = {:?}", first, last);
    }

    if let Some(prefix) = &args.prefix {
        print_words(
            &format!("Words starting with {:?}", prefix),
            dawg.strings_starting_with(prefix),
            args.limit,
        )?;
    }

    if let Some(suffix) = &args.suffix {
        print_words(
            &format!("Words ending with {:?}", suffix),
            dawg.strings_ending_with(suffix),
            args.limit,
        )?;
    }

    if let Some(word) = &args.near {
        println!("Neighbours of {:?}:", word);
        println!("  lower   = {:?}", dawg.lower(word));
        println!("  floor   = {:?}", dawg.floor(word));
        println!("  ceiling = {:?}", dawg.ceiling(word));
        println!("  higher  = {:?}", dawg.higher(word));
    }

    if let Some(path) = &args.dot {
        let dot = dawg.to_dot()?;
        std::fs::write(path, dot)?;
        info!("Written DOT to {}", path.display());
    }

    let time_total = time_total.elapsed();
    println!("\nAll done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
