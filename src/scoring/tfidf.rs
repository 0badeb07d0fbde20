//! Raw term frequency times the selected IDF formula.

use crate::scoring::params::OkapiParameters;
use crate::scoring::{ScoreArgument, ScoreArgumentKind, ScoreCalculator, declare};

#[derive(Debug, Clone, Default)]
pub struct TfIdfScoreCalculator {
    parameters: OkapiParameters,
}

impl TfIdfScoreCalculator {
    pub fn new(parameters: OkapiParameters) -> Self {
        TfIdfScoreCalculator { parameters }
    }
}

impl ScoreCalculator for TfIdfScoreCalculator {
    fn initialize(&mut self, arguments: &mut Vec<ScoreArgumentKind>) {
        declare(
            arguments,
            &[
                ScoreArgumentKind::TermFrequency,
                ScoreArgumentKind::DocumentFrequency,
                ScoreArgumentKind::TotalDocumentCount,
            ],
        );
    }

    fn first_step(&self, term_frequency: u32, _document_length: u32, _average_document_length: f64) -> f64 {
        term_frequency as f64
    }

    fn second_step(&self, argument: &ScoreArgument) -> f64 {
        self.parameters.formula.weight(
            &self.parameters,
            argument.document_frequency,
            argument.total_document_count,
        )
    }

    fn name(&self) -> &'static str {
        "TfIdf"
    }

    fn parameters(&self) -> OkapiParameters {
        self.parameters
    }

    fn copy(&self) -> Box<dyn ScoreCalculator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::IdfFormula;

    #[test]
    fn test_raw_frequency_times_idf() {
        let parameters = OkapiParameters {
            formula: IdfFormula::Ogawa2,
            a: 1.0,
            s: 1.0,
            ..OkapiParameters::default()
        };
        let calculator = TfIdfScoreCalculator::new(parameters);
        let argument = ScoreArgument {
            term_frequency: 3,
            document_frequency: 10,
            total_document_count: 10,
            ..ScoreArgument::default()
        };
        // ln(N/df) = 0, so the weight is `a`.
        assert_eq!(calculator.second_step(&argument), 1.0);
        assert_eq!(calculator.score(&argument), 3.0);
        assert_eq!(calculator.first_step(7, 0, 0.0), 7.0);
    }

    #[test]
    fn test_initialize_declares_counts_only() {
        let mut calculator = TfIdfScoreCalculator::default();
        let mut arguments = vec![ScoreArgumentKind::DocumentLength];
        calculator.initialize(&mut arguments);
        assert_eq!(arguments.len(), 4);
        assert_eq!(calculator.copy().name(), "TfIdf");
    }
}
