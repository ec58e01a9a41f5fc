use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Three-letter code printed on an indicator plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorLabel {
    Snd,
    Clr,
    Car,
    Ind,
    Frq,
    Sig,
    Nsa,
    Msa,
    Trn,
    Bob,
    Frk,
    Nll,
}

impl IndicatorLabel {
    /// Every label, in the order reference glyphs are built and compared.
    pub const ALL: [IndicatorLabel; 12] = [
        IndicatorLabel::Snd,
        IndicatorLabel::Clr,
        IndicatorLabel::Car,
        IndicatorLabel::Ind,
        IndicatorLabel::Frq,
        IndicatorLabel::Sig,
        IndicatorLabel::Nsa,
        IndicatorLabel::Msa,
        IndicatorLabel::Trn,
        IndicatorLabel::Bob,
        IndicatorLabel::Frk,
        IndicatorLabel::Nll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorLabel::Snd => "SND",
            IndicatorLabel::Clr => "CLR",
            IndicatorLabel::Car => "CAR",
            IndicatorLabel::Ind => "IND",
            IndicatorLabel::Frq => "FRQ",
            IndicatorLabel::Sig => "SIG",
            IndicatorLabel::Nsa => "NSA",
            IndicatorLabel::Msa => "MSA",
            IndicatorLabel::Trn => "TRN",
            IndicatorLabel::Bob => "BOB",
            IndicatorLabel::Frk => "FRK",
            IndicatorLabel::Nll => "NLL",
        }
    }
}

impl fmt::Display for IndicatorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        IndicatorLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == upper)
            .ok_or_else(|| anyhow!("Unknown indicator label: '{}'", s))
    }
}
