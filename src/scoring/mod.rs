//! Okapi-family TF-IDF scoring.
//!
//! A score is the product of a TF step, computed from the term frequency
//! and the document length, and an IDF step, computed from the document
//! frequency and the number of documents. Calculators are built from a
//! specification string such as `OkapiTfIdf:1.2:0.2:1`.

pub mod okapi;
pub mod params;
pub mod tfidf;

use std::fmt::Debug;

use log::debug;

use crate::error::{DocwalkError, Result};

pub use okapi::{OkapiTfIdfScoreCalculator, OkapiTfScoreCalculator};
pub use params::{IdfFormula, OkapiParameters};
pub use tfidf::TfIdfScoreCalculator;

/// Statistic a calculator reads from a [`ScoreArgument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreArgumentKind {
    TermFrequency,
    DocumentFrequency,
    TotalDocumentCount,
    DocumentLength,
    AverageDocumentLength,
}

/// Statistics of one (term, document) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreArgument {
    pub term_frequency: u32,
    pub document_frequency: u32,
    pub total_document_count: u32,
    pub document_length: u32,
    pub average_document_length: f64,
}

/// A weighting scheme.
pub trait ScoreCalculator: Send + Debug {
    /// Append the statistics this calculator reads to `arguments`, skipping
    /// those already present.
    fn initialize(&mut self, arguments: &mut Vec<ScoreArgumentKind>);

    /// TF component.
    fn first_step(&self, term_frequency: u32, document_length: u32, average_document_length: f64) -> f64;

    /// IDF component.
    fn second_step(&self, argument: &ScoreArgument) -> f64;

    /// Product of both steps.
    fn score(&self, argument: &ScoreArgument) -> f64 {
        self.first_step(
            argument.term_frequency,
            argument.document_length,
            argument.average_document_length,
        ) * self.second_step(argument)
    }

    /// Name accepted by [`create_calculator`].
    fn name(&self) -> &'static str;

    /// The parameters in effect.
    fn parameters(&self) -> OkapiParameters;

    /// Independent copy with the same parameters.
    fn copy(&self) -> Box<dyn ScoreCalculator>;
}

pub(crate) fn declare(arguments: &mut Vec<ScoreArgumentKind>, kinds: &[ScoreArgumentKind]) {
    for kind in kinds {
        if !arguments.contains(kind) {
            arguments.push(*kind);
        }
    }
}

/// Build a calculator from `Name[:k:x:y:q:a:s]`.
///
/// Names are case-insensitive; an empty name selects `OkapiTfIdf`.
/// Unknown names and malformed parameters are configuration errors.
pub fn create_calculator(specification: &str) -> Result<Box<dyn ScoreCalculator>> {
    let (name, parameters) = match specification.split_once(':') {
        Some((name, parameters)) => (name.trim(), parameters),
        None => (specification.trim(), ""),
    };
    let parameters = OkapiParameters::parse(parameters)?;

    let calculator: Box<dyn ScoreCalculator> = match name.to_ascii_lowercase().as_str() {
        "" | "okapitfidf" => Box::new(OkapiTfIdfScoreCalculator::new(parameters)),
        "okapitf" => Box::new(OkapiTfScoreCalculator::new(parameters)),
        "tfidf" => Box::new(TfIdfScoreCalculator::new(parameters)),
        _ => {
            return Err(DocwalkError::configuration(format!(
                "unknown score calculator '{name}'"
            )));
        }
    };
    debug!(
        "created {} calculator with parameters {}",
        calculator.name(),
        parameters
    );
    Ok(calculator)
}
