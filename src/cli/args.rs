//! Command line argument parsing for the docwalk CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// docwalk - evaluate phrase, proximity and anchored queries and their scores
#[derive(Parser, Debug, Clone)]
#[command(name = "docwalk")]
#[command(about = "Evaluate positional full-text queries and Okapi TF-IDF weights")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DocwalkArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DocwalkArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Evaluate a score calculator for given corpus statistics
    Weight(WeightArgs),

    /// Run a phrase query over a JSON corpus of tokenized documents
    Search(SearchArgs),
}

/// Arguments for evaluating a calculator
#[derive(Parser, Debug, Clone)]
pub struct WeightArgs {
    /// Calculator specification, Name[:k:x:y:q:a:s]
    #[arg(short, long, default_value = "OkapiTfIdf")]
    pub calculator: String,

    /// Number of documents containing the term
    #[arg(long)]
    pub df: u32,

    /// Number of documents in the corpus
    #[arg(long)]
    pub total: u32,

    /// Occurrences of the term in the document
    #[arg(long, default_value = "1")]
    pub tf: u32,

    /// Document length in tokens
    #[arg(long)]
    pub length: Option<u32>,

    /// Average document length in tokens
    #[arg(long)]
    pub avg: Option<f64>,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Corpus file: a JSON array of {"id": N, "tokens": [..]}
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: PathBuf,

    /// Query configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Phrase terms, in order
    #[arg(short, long, num_args = 1.., required = true)]
    pub terms: Vec<String>,

    /// Accept the terms in order with a start-to-start width in LOWER:UPPER
    #[arg(long, value_name = "LOWER:UPPER", value_parser = parse_window)]
    pub within: Option<(u32, u32)>,

    /// Only match the phrase at the start of a document
    #[arg(long, conflicts_with = "tail")]
    pub head: bool,

    /// Only match the phrase at the end of a document
    #[arg(long)]
    pub tail: bool,

    /// Drop documents containing any of these words
    #[arg(short = 'x', long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Override the configured calculator
    #[arg(short, long)]
    pub calculator: Option<String>,

    /// Maximum number of results to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Parse `LOWER:UPPER`.
pub fn parse_window(value: &str) -> std::result::Result<(u32, u32), String> {
    let (lower, upper) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LOWER:UPPER, got '{value}'"))?;
    let lower: u32 = lower
        .trim()
        .parse()
        .map_err(|_| format!("invalid lower bound '{lower}'"))?;
    let upper: u32 = upper
        .trim()
        .parse()
        .map_err(|_| format!("invalid upper bound '{upper}'"))?;
    if lower > upper {
        return Err(format!("lower bound {lower} exceeds upper bound {upper}"));
    }
    Ok((lower, upper))
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_command() {
        let args = DocwalkArgs::try_parse_from([
            "docwalk",
            "weight",
            "--calculator",
            "OkapiTfIdf:1.2:0.2:1",
            "--df",
            "10",
            "--total",
            "1000",
        ])
        .unwrap();

        if let Command::Weight(weight_args) = args.command {
            assert_eq!(weight_args.calculator, "OkapiTfIdf:1.2:0.2:1");
            assert_eq!(weight_args.df, 10);
            assert_eq!(weight_args.total, 1000);
            assert_eq!(weight_args.tf, 1);
            assert_eq!(weight_args.length, None);
        } else {
            panic!("Expected Weight command");
        }
    }

    #[test]
    fn test_search_command() {
        let args = DocwalkArgs::try_parse_from([
            "docwalk",
            "search",
            "--corpus",
            "corpus.json",
            "--terms",
            "new",
            "york",
            "--within",
            "0:3",
            "--head",
            "--exclude",
            "boston",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.corpus, PathBuf::from("corpus.json"));
            assert_eq!(search_args.terms, vec!["new", "york"]);
            assert_eq!(search_args.within, Some((0, 3)));
            assert!(search_args.head);
            assert!(!search_args.tail);
            assert_eq!(search_args.exclude, vec!["boston"]);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_head_conflicts_with_tail() {
        let result = DocwalkArgs::try_parse_from([
            "docwalk", "search", "--corpus", "c.json", "--terms", "a", "--head", "--tail",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_window_parser() {
        assert_eq!(parse_window("2:5"), Ok((2, 5)));
        assert!(parse_window("5").is_err());
        assert!(parse_window("a:5").is_err());
        assert!(parse_window("5:2").is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        let base = ["docwalk", "weight", "--df", "1", "--total", "1"];

        let args = DocwalkArgs::try_parse_from(base).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = DocwalkArgs::try_parse_from(
            ["docwalk", "-vv"].into_iter().chain(base.into_iter().skip(1)),
        )
        .unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = DocwalkArgs::try_parse_from(
            ["docwalk", "--quiet"].into_iter().chain(base.into_iter().skip(1)),
        )
        .unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            DocwalkArgs::try_parse_from(["docwalk", "--format", "json", "weight", "--df", "1", "--total", "2"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
