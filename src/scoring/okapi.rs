//! Okapi calculators.

use crate::scoring::params::OkapiParameters;
use crate::scoring::{ScoreArgument, ScoreArgumentKind, ScoreCalculator, declare};

/// Okapi TF: `tf / (tf + k·dl/avgdl)`.
///
/// An unknown (zero) average length counts as equal to the document length.
pub(crate) fn okapi_tf(k: f64, term_frequency: u32, document_length: u32, average_document_length: f64) -> f64 {
    if term_frequency == 0 {
        return 0.0;
    }
    let tf = term_frequency as f64;
    let ratio = if average_document_length > 0.0 {
        document_length as f64 / average_document_length
    } else {
        1.0
    };
    let denominator = tf + k * ratio;
    if denominator <= 0.0 {
        return 0.0;
    }
    tf / denominator
}

/// Okapi TF times the selected IDF formula.
#[derive(Debug, Clone, Default)]
pub struct OkapiTfIdfScoreCalculator {
    parameters: OkapiParameters,
}

impl OkapiTfIdfScoreCalculator {
    pub fn new(parameters: OkapiParameters) -> Self {
        OkapiTfIdfScoreCalculator { parameters }
    }
}

impl ScoreCalculator for OkapiTfIdfScoreCalculator {
    fn initialize(&mut self, arguments: &mut Vec<ScoreArgumentKind>) {
        declare(
            arguments,
            &[
                ScoreArgumentKind::TermFrequency,
                ScoreArgumentKind::DocumentLength,
                ScoreArgumentKind::AverageDocumentLength,
                ScoreArgumentKind::DocumentFrequency,
                ScoreArgumentKind::TotalDocumentCount,
            ],
        );
    }

    fn first_step(&self, term_frequency: u32, document_length: u32, average_document_length: f64) -> f64 {
        okapi_tf(
            self.parameters.k,
            term_frequency,
            document_length,
            average_document_length,
        )
    }

    fn second_step(&self, argument: &ScoreArgument) -> f64 {
        self.parameters.formula.weight(
            &self.parameters,
            argument.document_frequency,
            argument.total_document_count,
        )
    }

    fn name(&self) -> &'static str {
        "OkapiTfIdf"
    }

    fn parameters(&self) -> OkapiParameters {
        self.parameters
    }

    fn copy(&self) -> Box<dyn ScoreCalculator> {
        Box::new(self.clone())
    }
}

/// Okapi TF alone; every term weighs 1.
#[derive(Debug, Clone, Default)]
pub struct OkapiTfScoreCalculator {
    parameters: OkapiParameters,
}

impl OkapiTfScoreCalculator {
    pub fn new(parameters: OkapiParameters) -> Self {
        OkapiTfScoreCalculator { parameters }
    }
}

impl ScoreCalculator for OkapiTfScoreCalculator {
    fn initialize(&mut self, arguments: &mut Vec<ScoreArgumentKind>) {
        declare(
            arguments,
            &[
                ScoreArgumentKind::TermFrequency,
                ScoreArgumentKind::DocumentLength,
                ScoreArgumentKind::AverageDocumentLength,
            ],
        );
    }

    fn first_step(&self, term_frequency: u32, document_length: u32, average_document_length: f64) -> f64 {
        okapi_tf(
            self.parameters.k,
            term_frequency,
            document_length,
            average_document_length,
        )
    }

    fn second_step(&self, _argument: &ScoreArgument) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "OkapiTf"
    }

    fn parameters(&self) -> OkapiParameters {
        self.parameters
    }

    fn copy(&self) -> Box<dyn ScoreCalculator> {
        Box::new(self.clone())
    }
}
