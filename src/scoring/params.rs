//! Okapi parameters and the `k:x:y:q:a:s` parameter string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DocwalkError, Result};

/// Largest number of fields in a parameter string.
pub const MAX_PARAMETERS: usize = 6;

/// IDF weighting formula, selected by the `y` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdfFormula {
    /// `y = 0`: `ln(x + N/df)`.
    Robertson,
    /// `y = 1`: `ln(1 + x·N/df) / ln(1 + x)`.
    RobertsonNormalized,
    /// `y = 2`: `ln((N - df + 0.5) / (df + 0.5))`, floored at 0.
    RobertsonSparckJones,
    /// `y = 3`: `ln(1 + (N - df + 0.5) / (df + 0.5))`.
    RobertsonSparckJonesShifted,
    /// `y = 4`: `ln(x + (N - df) / df)`, floored at 0.
    Ogawa,
    /// `y = 5`: `ln(1 + x·(N - df)/df) / ln(1 + x·(N - 1))`.
    OgawaNormalized,
    /// `y = 6`: `a + s·ln(N/df)`.
    Ogawa2,
    /// `y = 7`: `ln(1 + N/df)^q`.
    Ogawa2Powered,
    /// `y = 8`: `ln((N - df + s) / (df + s))`, floored at 0.
    HarperCroft,
    /// `y = 9`: `a + ln((N - df + s) / (df + s))`, floored at 0.
    HarperCroftConstant,
}

impl IdfFormula {
    /// Every formula, in selector order.
    pub const ALL: [IdfFormula; 10] = [
        IdfFormula::Robertson,
        IdfFormula::RobertsonNormalized,
        IdfFormula::RobertsonSparckJones,
        IdfFormula::RobertsonSparckJonesShifted,
        IdfFormula::Ogawa,
        IdfFormula::OgawaNormalized,
        IdfFormula::Ogawa2,
        IdfFormula::Ogawa2Powered,
        IdfFormula::HarperCroft,
        IdfFormula::HarperCroftConstant,
    ];

    /// Formula for selector `y`, if it is in `0..=9`.
    pub fn from_selector(selector: u8) -> Option<Self> {
        Self::ALL.get(selector as usize).copied()
    }

    /// The `y` value selecting this formula.
    pub fn selector(self) -> u8 {
        self as u8
    }

    /// Weight of a term found in `document_frequency` of
    /// `total_documents` documents.
    ///
    /// A formula switched off by its parameter (`x = 0` for the normalized
    /// forms, `q = 0` for the powered one) weighs 1 for any counts. Otherwise
    /// the weight is 0 when either count is 0.
    pub fn weight(self, parameters: &OkapiParameters, document_frequency: u32, total_documents: u32) -> f64 {
        if self.is_neutral(parameters) {
            return 1.0;
        }
        if document_frequency == 0 || total_documents == 0 {
            return 0.0;
        }
        let n = total_documents as f64;
        let df = document_frequency.min(total_documents) as f64;
        let OkapiParameters { x, q, a, s, .. } = *parameters;

        match self {
            IdfFormula::Robertson => (x + n / df).ln(),
            IdfFormula::RobertsonNormalized => (x * (n / df)).ln_1p() / x.ln_1p(),
            IdfFormula::RobertsonSparckJones => ((n - df + 0.5) / (df + 0.5)).ln().max(0.0),
            IdfFormula::RobertsonSparckJonesShifted => ((n - df + 0.5) / (df + 0.5)).ln_1p(),
            IdfFormula::Ogawa => (x + (n - df) / df).ln().max(0.0),
            IdfFormula::OgawaNormalized => {
                if total_documents <= 1 {
                    1.0
                } else {
                    (x * (n - df) / df).ln_1p() / (x * (n - 1.0)).ln_1p()
                }
            }
            IdfFormula::Ogawa2 => a + s * (n / df).ln(),
            IdfFormula::Ogawa2Powered => (n / df).ln_1p().powf(q),
            IdfFormula::HarperCroft => ((n - df + s) / (df + s)).ln().max(0.0),
            IdfFormula::HarperCroftConstant => (a + ((n - df + s) / (df + s)).ln()).max(0.0),
        }
    }

    fn is_neutral(self, parameters: &OkapiParameters) -> bool {
        match self {
            IdfFormula::RobertsonNormalized | IdfFormula::OgawaNormalized => parameters.x == 0.0,
            IdfFormula::Ogawa2Powered => parameters.q == 0.0,
            _ => false,
        }
    }
}

impl fmt::Display for IdfFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

/// Tunable constants of the Okapi family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OkapiParameters {
    /// Length normalization strength of the TF step.
    pub k: f64,
    /// IDF smoothing constant.
    pub x: f64,
    /// IDF formula (`y`).
    pub formula: IdfFormula,
    /// Exponent of [`IdfFormula::Ogawa2Powered`].
    pub q: f64,
    /// Additive constant of the Ogawa2 and Harper/Croft formulas.
    pub a: f64,
    /// Smoothing / scale constant of the Ogawa2 and Harper/Croft formulas.
    pub s: f64,
}

impl Default for OkapiParameters {
    fn default() -> Self {
        OkapiParameters {
            k: 1.0,
            x: 0.2,
            formula: IdfFormula::RobertsonNormalized,
            q: 1.0,
            a: 0.0,
            s: 0.5,
        }
    }
}

impl OkapiParameters {
    /// Parse `k:x:y:q:a:s`.
    ///
    /// Missing or empty fields keep their default; an empty string yields
    /// the defaults.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parameters = OkapiParameters::default();
        if text.trim().is_empty() {
            return Ok(parameters);
        }

        let fields: Vec<&str> = text.split(':').map(str::trim).collect();
        if fields.len() > MAX_PARAMETERS {
            return Err(DocwalkError::configuration(format!(
                "too many scoring parameters in '{text}': expected at most {MAX_PARAMETERS}"
            )));
        }

        for (index, field) in fields.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let value: f64 = field.parse().map_err(|_| {
                DocwalkError::configuration(format!("scoring parameter '{field}' is not a number"))
            })?;
            if !value.is_finite() {
                return Err(DocwalkError::configuration(format!(
                    "scoring parameter '{field}' is not finite"
                )));
            }
            match index {
                0 => parameters.k = value,
                1 => parameters.x = value,
                2 => parameters.formula = Self::formula_for(value)?,
                3 => parameters.q = value,
                4 => parameters.a = value,
                _ => parameters.s = value,
            }
        }
        Ok(parameters)
    }

    fn formula_for(value: f64) -> Result<IdfFormula> {
        let selector = (value.fract() == 0.0 && (0.0..=9.0).contains(&value)).then_some(value as u8);
        selector
            .and_then(IdfFormula::from_selector)
            .ok_or_else(|| DocwalkError::configuration(format!("unsupported IDF formula selector {value}")))
    }
}

impl FromStr for OkapiParameters {
    type Err = DocwalkError;

    fn from_str(s: &str) -> Result<Self> {
        OkapiParameters::parse(s)
    }
}

impl fmt::Display for OkapiParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}",
            self.k, self.x, self.formula, self.q, self.a, self.s
        )
    }
}
