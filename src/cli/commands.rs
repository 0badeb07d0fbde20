//! Command implementations for the docwalk CLI.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::QueryConfig;
use crate::error::{DocwalkError, Result};
use crate::index::MemoryIndex;
use crate::query::{NodeFactory, QueryNode};
use crate::scoring::{ScoreArgument, create_calculator};
use crate::search::{Searcher, rank};
use crate::types::DocumentId;

/// One entry of a corpus file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub id: DocumentId,
    pub tokens: Vec<String>,
}

/// Execute a CLI command.
pub fn execute_command(args: DocwalkArgs) -> Result<()> {
    match &args.command {
        Command::Weight(weight_args) => compute_weight(weight_args.clone(), &args),
        Command::Search(search_args) => search_corpus(search_args.clone(), &args),
    }
}

/// Evaluate a calculator.
fn compute_weight(args: WeightArgs, cli_args: &DocwalkArgs) -> Result<()> {
    let calculator = create_calculator(&args.calculator)?;
    let average = args.avg.unwrap_or(0.0);
    let argument = ScoreArgument {
        term_frequency: args.tf,
        document_frequency: args.df,
        total_document_count: args.total,
        document_length: args.length.unwrap_or(average.round() as u32),
        average_document_length: average,
    };

    let first_step = calculator.first_step(
        argument.term_frequency,
        argument.document_length,
        argument.average_document_length,
    );
    let second_step = calculator.second_step(&argument);

    output_result(
        "Score calculated",
        &WeightResult {
            calculator: calculator.name().to_string(),
            parameters: calculator.parameters().to_string(),
            first_step,
            second_step,
            score: calculator.score(&argument),
        },
        cli_args,
    )
}

/// Load a corpus file into an in-memory index.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<MemoryIndex> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read corpus {}", path.display()))?;
    let documents: Vec<CorpusDocument> = serde_json::from_str(&text)
        .with_context(|| format!("cannot parse corpus {}", path.display()))?;
    MemoryIndex::from_documents(documents.into_iter().map(|doc| (doc.id, doc.tokens)))
}

/// Build the query tree for the search command.
pub fn build_query(
    args: &SearchArgs,
    factory: &NodeFactory,
    index: &MemoryIndex,
) -> Result<Box<dyn QueryNode>> {
    if args.terms.is_empty() {
        return Err(DocwalkError::invalid_argument("at least one term is required"));
    }
    let words: Vec<Box<dyn QueryNode>> = args
        .terms
        .iter()
        .map(|term| factory.word_in(index, term))
        .collect();

    let phrase = match args.within {
        Some((lower, upper)) => factory.within(words, lower, upper)?,
        None => factory.ordered_distance(words)?,
    };

    let anchored = if args.head {
        factory.head(phrase, 1)?
    } else if args.tail {
        factory.tail(phrase, 0, index.search_information())
    } else {
        phrase
    };

    if args.exclude.is_empty() {
        return Ok(anchored);
    }
    let excluded = factory.or(
        args.exclude
            .iter()
            .map(|word| factory.word_in(index, word))
            .collect(),
    )?;
    Ok(factory.and_not(anchored, excluded))
}

/// Run a phrase query over a corpus file.
fn search_corpus(args: SearchArgs, cli_args: &DocwalkArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => QueryConfig::from_json_file(path)?,
        None => QueryConfig::default(),
    };
    if let Some(calculator) = &args.calculator {
        config.calculator = calculator.clone();
    }
    if args.limit.is_some() {
        config.max_hits = args.limit;
    }
    config.validate()?;

    let index = load_corpus(&args.corpus)?;
    if index.term_count() == 0 {
        warn!("corpus {} holds no tokens", args.corpus.display());
    }
    info!(
        "loaded {} distinct terms from {}",
        index.term_count(),
        args.corpus.display()
    );

    let start_time = Instant::now();
    let factory = NodeFactory::new(config.clone());
    let mut root = build_query(&args, &factory, &index)?;
    let searcher = Searcher::from_config(&config, index.search_information())?;

    let set = searcher.collect(root.as_mut());
    let total_hits = set.document_frequency;
    let mut hits = set
        .matches
        .into_iter()
        .map(|hit| searcher.score(hit, total_hits))
        .collect::<Result<Vec<_>>>()?;
    rank(&mut hits);

    output_result(
        "Search completed",
        &SearchResults {
            query: root.description(),
            hits,
            total_hits,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::query::test_support::collect;

    fn corpus_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "tokens": ["new", "york", "city"]}},
                {{"id": 2, "tokens": ["york", "is", "not", "new"]}},
                {{"id": 3, "tokens": ["a", "new", "big", "york"]}}
            ]"#
        )
        .unwrap();
        file
    }

    fn search_args(file: &NamedTempFile, extra: &[&str]) -> SearchArgs {
        let path = file.path().to_string_lossy().to_string();
        let mut argv = vec!["docwalk", "search", "--corpus", path.as_str(), "--terms", "new", "york"];
        argv.extend_from_slice(extra);
        match DocwalkArgs::try_parse_from(argv).unwrap().command {
            Command::Search(args) => args,
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_load_corpus() {
        let file = corpus_file();
        let index = load_corpus(file.path()).unwrap();
        assert!(index.postings("york").is_some());
        assert!(index.postings("boston").is_none());
    }

    #[test]
    fn test_load_corpus_errors_name_the_file() {
        let missing = load_corpus("/nonexistent/corpus.json").unwrap_err();
        assert!(matches!(missing, DocwalkError::Anyhow(_)));
        assert!(missing.to_string().contains("/nonexistent/corpus.json"));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"id\": 1}}").unwrap();
        let malformed = load_corpus(file.path()).unwrap_err();
        assert!(malformed.to_string().contains("cannot parse corpus"));
    }

    #[test]
    fn test_build_query_with_exclusions() {
        let file = corpus_file();
        let index = load_corpus(file.path()).unwrap();
        let factory = NodeFactory::default();

        let mut without_city =
            build_query(&search_args(&file, &["--exclude", "city"]), &factory, &index).unwrap();
        assert_eq!(collect(without_city.as_mut()), vec![3]);
        assert!(without_city.description().starts_with("AndNot("));

        let mut absent =
            build_query(&search_args(&file, &["--exclude", "boston", "big"]), &factory, &index)
                .unwrap();
        assert_eq!(collect(absent.as_mut()), vec![1]);

        let mut anchored = build_query(
            &search_args(&file, &["--head", "--exclude", "city"]),
            &factory,
            &index,
        )
        .unwrap();
        assert!(collect(anchored.as_mut()).is_empty());
    }

    #[test]
    fn test_build_phrase_within_and_anchor_queries() {
        let file = corpus_file();
        let index = load_corpus(file.path()).unwrap();
        let factory = NodeFactory::default();

        let mut phrase = build_query(&search_args(&file, &[]), &factory, &index).unwrap();
        assert_eq!(collect(phrase.as_mut()), vec![1, 3]);

        let mut near = build_query(&search_args(&file, &["--within", "0:1"]), &factory, &index).unwrap();
        assert_eq!(collect(near.as_mut()), vec![1]);

        let mut head = build_query(&search_args(&file, &["--head"]), &factory, &index).unwrap();
        assert_eq!(collect(head.as_mut()), vec![1]);

        let mut tail = build_query(&search_args(&file, &["--tail"]), &factory, &index).unwrap();
        assert_eq!(collect(tail.as_mut()), vec![3]);
    }

    #[test]
    fn test_execute_commands() {
        let file = corpus_file();
        let path = file.path().to_string_lossy().to_string();
        let args = DocwalkArgs::try_parse_from([
            "docwalk", "-q", "-f", "json", "search", "--corpus", path.as_str(), "--terms", "new", "york",
        ])
        .unwrap();
        assert!(execute_command(args).is_ok());

        let args = DocwalkArgs::try_parse_from([
            "docwalk", "-q", "weight", "--calculator", "Bogus", "--df", "1", "--total", "2",
        ])
        .unwrap();
        assert!(execute_command(args).unwrap_err().is_configuration());
    }
}
