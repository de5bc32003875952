//! `transition-system` section of the manifest (spec §4.7).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeType {
    Discrete,
    Stochastic,
    UrgentStochastic,
}

impl Default for TimeType {
    fn default() -> Self {
        TimeType::Discrete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppliesTo {
    States,
    Choices,
    Branches,
}

/// The restricted numeric type enum allowed for `branch-probability-type`
/// and `exit-rate-type`: a subset of [`crate::datatypes::CommonType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericWireType {
    Double,
    Rational,
    DoubleInterval,
    RationalInterval,
}

impl From<NumericWireType> for crate::datatypes::CommonType {
    fn from(value: NumericWireType) -> Self {
        use crate::datatypes::CommonType as CT;
        match value {
            NumericWireType::Double => CT::Double,
            NumericWireType::Rational => CT::Rational,
            NumericWireType::DoubleInterval => CT::DoubleInterval,
            NumericWireType::RationalInterval => CT::RationalInterval,
        }
    }
}

impl TryFrom<crate::datatypes::CommonType> for NumericWireType {
    type Error = anyhow::Error;

    fn try_from(value: crate::datatypes::CommonType) -> anyhow::Result<Self> {
        use crate::datatypes::CommonType as CT;
        Ok(match value {
            CT::Double => NumericWireType::Double,
            CT::Rational => NumericWireType::Rational,
            CT::DoubleInterval => NumericWireType::DoubleInterval,
            CT::RationalInterval => NumericWireType::RationalInterval,
            other => anyhow::bail!(crate::error::UmbError::UnsupportedType(format!(
                "{other:?} is not a valid branch-probability/exit-rate type"
            ))),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionSystem {
    #[serde(default)]
    pub time: TimeType,
    #[serde(rename = "#players")]
    pub num_players: u64,
    #[serde(rename = "#states")]
    pub num_states: u64,
    #[serde(rename = "#initial-states")]
    pub num_initial_states: u64,
    #[serde(rename = "#choices")]
    pub num_choices: u64,
    #[serde(rename = "#choice-actions")]
    pub num_choice_actions: u64,
    #[serde(rename = "#branches")]
    pub num_branches: u64,
    #[serde(rename = "#branch-actions")]
    pub num_branch_actions: u64,
    #[serde(rename = "#observations")]
    pub num_observations: u64,
    #[serde(rename = "observations-apply-to")]
    pub observations_apply_to: Option<AppliesTo>,
    #[serde(rename = "branch-probability-type")]
    pub branch_probability_type: Option<NumericWireType>,
    #[serde(rename = "exit-rate-type")]
    pub exit_rate_type: Option<NumericWireType>,
}
