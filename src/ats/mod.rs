//! ATS façade (component C9, spec §4.9): the public, structured in-memory
//! model plus the converter to and from the raw UMB container.
//!
//! Grounded on `original_source/umbi/ats/ats.py`'s `ExplicitAts`/
//! `ExplicitAtsConverter` pair: the façade owns named accessors over the
//! flat CSR arrays, the converter owns the split between manifest-level
//! annotation descriptors and their values mapping.

pub mod annotation;
pub mod model_info;
pub mod variable_valuations;

pub use annotation::{AtomicPropositionAnnotation, ObservationAnnotation, RewardAnnotation};
pub use model_info::ModelInfo;
pub use variable_valuations::{ItemValuations, Variable};

use crate::datatypes::{CommonType, Scalar, StructType};
use crate::error::UmbError;
use crate::index::annotations::{Annotation, AnnotationType, Annotations};
use crate::index::transition_system::{AppliesTo, NumericWireType, TimeType, TransitionSystem};
use crate::index::{FileData, UmbIndex};
use crate::io::{AnnotationValues, ExplicitUmb};
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitAts {
    pub time: TimeType,
    pub num_players: u64,
    pub initial_states: Vec<bool>,
    pub state_to_choice: Vec<u64>,
    pub state_to_player: Option<Vec<u32>>,
    pub markovian_states: Option<Vec<bool>>,
    pub exit_rates: Option<Vec<Scalar>>,
    pub choice_to_branch: Vec<u64>,
    pub choice_to_action: Option<Vec<u32>>,
    pub action_strings: Option<Vec<String>>,
    pub branch_to_target: Vec<u64>,
    pub branch_to_probability: Option<Vec<Scalar>>,
    pub branch_to_branch_action: Option<Vec<u32>>,
    pub branch_action_strings: Option<Vec<String>>,
    pub num_observations: u64,
    pub observations_apply_to: Option<AppliesTo>,
    pub rewards: IndexMap<String, RewardAnnotation>,
    pub aps: IndexMap<String, AtomicPropositionAnnotation>,
    pub observations: IndexMap<String, ObservationAnnotation>,
    pub model_info: Option<ModelInfo>,
    pub state_valuation_struct: Option<StructType>,
    pub state_valuations: Option<Vec<Scalar>>,
}

impl ExplicitAts {
    pub fn num_states(&self) -> usize {
        self.initial_states.len()
    }

    pub fn num_choices(&self) -> usize {
        self.state_to_choice.last().copied().unwrap_or(0) as usize
    }

    pub fn num_branches(&self) -> usize {
        self.choice_to_branch.last().copied().unwrap_or(0) as usize
    }

    pub fn initial_state_indices(&self) -> Vec<u64> {
        self.initial_states.iter().enumerate().filter(|(_, b)| **b).map(|(i, _)| i as u64).collect()
    }

    pub fn markovian_state_indices(&self) -> Vec<u64> {
        self.markovian_states
            .as_ref()
            .map(|v| v.iter().enumerate().filter(|(_, b)| **b).map(|(i, _)| i as u64).collect())
            .unwrap_or_default()
    }

    pub fn state_choice_range(&self, state: usize) -> anyhow::Result<(u64, u64)> {
        crate::csr::csr_to_ranges(&self.state_to_choice)?
            .get(state)
            .copied()
            .ok_or_else(|| UmbError::SchemaViolation(format!("state {state} out of range")).into())
    }

    pub fn choice_branch_range(&self, choice: usize) -> anyhow::Result<(u64, u64)> {
        crate::csr::csr_to_ranges(&self.choice_to_branch)?
            .get(choice)
            .copied()
            .ok_or_else(|| UmbError::SchemaViolation(format!("choice {choice} out of range")).into())
    }

    pub fn get_branch_target(&self, branch: usize) -> anyhow::Result<u64> {
        self.branch_to_target
            .get(branch)
            .copied()
            .ok_or_else(|| UmbError::SchemaViolation(format!("branch {branch} out of range")).into())
    }

    pub fn get_branch_probability(&self, branch: usize) -> Option<&Scalar> {
        self.branch_to_probability.as_ref().and_then(|v| v.get(branch))
    }

    pub fn get_choice_action(&self, choice: usize) -> Option<u32> {
        self.choice_to_action.as_ref().and_then(|v| v.get(choice)).copied()
    }

    pub fn get_action_name(&self, action: usize) -> Option<&str> {
        self.action_strings.as_ref().and_then(|v| v.get(action)).map(String::as_str)
    }

    pub fn get_reward_annotation(&self, name: &str) -> Option<&RewardAnnotation> {
        self.rewards.get(name)
    }

    pub fn get_ap_annotation(&self, name: &str) -> Option<&AtomicPropositionAnnotation> {
        self.aps.get(name)
    }

    pub fn observation_annotation(&self, name: &str) -> Option<&ObservationAnnotation> {
        self.observations.get(name)
    }

    pub fn state_valuation(&self, state: usize) -> Option<&Scalar> {
        self.state_valuations.as_ref().and_then(|v| v.get(state))
    }

    pub fn branch_probability_type(&self) -> anyhow::Result<Option<CommonType>> {
        match &self.branch_to_probability {
            None => Ok(None),
            Some(values) => {
                let types: Vec<CommonType> = values.iter().map(Scalar::tag_of).collect();
                Ok(Some(crate::datatypes::promotion::common_numeric(&types)?))
            }
        }
    }

    pub fn exit_rate_type(&self) -> anyhow::Result<Option<CommonType>> {
        match &self.exit_rates {
            None => Ok(None),
            Some(values) => {
                let types: Vec<CommonType> = values.iter().map(Scalar::tag_of).collect();
                Ok(Some(crate::datatypes::promotion::common_numeric(&types)?))
            }
        }
    }

    /// Checks structural invariants 1-9 (spec §3.4). Called before every
    /// encode and after every decode.
    pub fn validate(&self) -> anyhow::Result<()> {
        let n_states = self.num_states();
        let n_choices = self.num_choices();
        let n_branches = self.num_branches();

        crate::csr::validate_csr(&self.state_to_choice)?;
        if self.state_to_choice.len() != n_states + 1 {
            anyhow::bail!(UmbError::StructuralInvariant(format!(
                "state-to-choice length {} does not match #states+1 ({})",
                self.state_to_choice.len(),
                n_states + 1
            )));
        }
        crate::csr::validate_csr(&self.choice_to_branch)?;
        if self.choice_to_branch.len() != n_choices + 1 {
            anyhow::bail!(UmbError::StructuralInvariant(format!(
                "choice-to-branch length {} does not match #choices+1 ({})",
                self.choice_to_branch.len(),
                n_choices + 1
            )));
        }
        if let Some(bad) = self.branch_to_target.iter().find(|t| **t as usize >= n_states) {
            anyhow::bail!(UmbError::StructuralInvariant(format!("branch target {bad} is not a valid state index")));
        }
        for i in self.initial_state_indices() {
            if i as usize >= n_states {
                anyhow::bail!(UmbError::StructuralInvariant(format!("initial state {i} is not a valid state index")));
            }
        }
        if self.num_players > 1 {
            match &self.state_to_player {
                Some(players) if players.len() == n_states && players.iter().all(|p| (*p as u64) < self.num_players) => {}
                _ => anyhow::bail!(UmbError::StructuralInvariant(
                    "multi-player ATS requires a state-to-player vector of length #states with values < #players".to_string()
                )),
            }
        }
        if self.num_observations > 0 {
            for obs in self.observations.values() {
                if let Some(bad) = obs.values.iter().find(|v| **v >= self.num_observations) {
                    anyhow::bail!(UmbError::StructuralInvariant(format!(
                        "observation value {bad} is not in [0, {})",
                        self.num_observations
                    )));
                }
            }
        }
        for (name, reward) in &self.rewards {
            let expected = entity_count(reward.applies_to, n_states, n_choices, n_branches);
            if reward.values.len() != expected {
                anyhow::bail!(UmbError::StructuralInvariant(format!(
                    "reward annotation {name} has {} values, expected {expected}",
                    reward.values.len()
                )));
            }
        }
        for (name, ap) in &self.aps {
            let expected = entity_count(ap.applies_to, n_states, n_choices, n_branches);
            if ap.values.len() != expected {
                anyhow::bail!(UmbError::StructuralInvariant(format!(
                    "atomic proposition {name} has {} values, expected {expected}",
                    ap.values.len()
                )));
            }
        }
        if let Some(values) = &self.state_valuations {
            if values.len() != n_states {
                anyhow::bail!(UmbError::StructuralInvariant(format!(
                    "state valuations has {} records, expected #states ({n_states})",
                    values.len()
                )));
            }
        }
        Ok(())
    }
}

fn entity_count(applies_to: AppliesTo, n_states: usize, n_choices: usize, n_branches: usize) -> usize {
    match applies_to {
        AppliesTo::States => n_states,
        AppliesTo::Choices => n_choices,
        AppliesTo::Branches => n_branches,
    }
}

/// Converter between the façade and the raw, manifest-shaped container.
pub struct ExplicitAtsConverter;

impl ExplicitAtsConverter {
    pub fn from_explicit_umb(umb: ExplicitUmb) -> anyhow::Result<ExplicitAts> {
        let ts = &umb.index.transition_system;
        let rewards = collect_rewards(&umb.index.annotations, &umb.reward_values)?;
        let aps = collect_aps(&umb.index.annotations, &umb.ap_values)?;
        let observations = collect_observations(ts, &umb.index.annotations, &umb.observation_values)?;

        let ats = ExplicitAts {
            time: ts.time,
            num_players: ts.num_players,
            initial_states: umb.initial_states,
            state_to_choice: umb.state_to_choice.unwrap_or_default(),
            state_to_player: umb.state_to_player,
            markovian_states: umb.markovian_states,
            exit_rates: umb.exit_rates,
            choice_to_branch: umb.choice_to_branch.unwrap_or_default(),
            choice_to_action: umb.choice_to_action,
            action_strings: umb.action_strings,
            branch_to_target: umb.branch_to_target.unwrap_or_default(),
            branch_to_probability: umb.branch_probabilities,
            branch_to_branch_action: umb.branch_to_branch_action,
            branch_action_strings: umb.branch_action_strings,
            num_observations: ts.num_observations,
            observations_apply_to: ts.observations_apply_to,
            rewards,
            aps,
            observations,
            model_info: umb.index.model_data.map(ModelInfo::from),
            state_valuation_struct: umb.state_valuation_struct,
            state_valuations: umb.state_valuations,
        };
        ats.validate()?;
        Ok(ats)
    }

    pub fn to_explicit_umb(ats: &ExplicitAts) -> anyhow::Result<ExplicitUmb> {
        ats.validate()?;
        let n_states = ats.num_states();
        let n_choices = ats.num_choices();
        let n_branches = ats.num_branches();

        let branch_probability_type =
            ats.branch_probability_type()?.map(NumericWireType::try_from).transpose()?;
        let exit_rate_type = ats.exit_rate_type()?.map(NumericWireType::try_from).transpose()?;

        let transition_system = TransitionSystem {
            time: ats.time,
            num_players: ats.num_players,
            num_states: n_states as u64,
            num_initial_states: ats.initial_state_indices().len() as u64,
            num_choices: n_choices as u64,
            num_choice_actions: ats.action_strings.as_ref().map(Vec::len).unwrap_or(0) as u64,
            num_branches: n_branches as u64,
            num_branch_actions: ats.branch_action_strings.as_ref().map(Vec::len).unwrap_or(0) as u64,
            num_observations: ats.num_observations,
            observations_apply_to: ats.observations_apply_to,
            branch_probability_type,
            exit_rate_type,
        };

        let mut reward_descriptors = IndexMap::new();
        let mut reward_values = std::collections::HashMap::new();
        for (name, reward) in &ats.rewards {
            reward_descriptors.insert(
                name.clone(),
                Annotation {
                    alias: reward.alias.clone(),
                    description: reward.description.clone(),
                    applies_to: Some(vec![reward.applies_to]),
                    ty: numeric_annotation_type(reward.ty).ok(),
                    lower: None,
                    upper: None,
                },
            );
            let mut per_apply = std::collections::HashMap::new();
            per_apply.insert(reward.applies_to, reward.values.clone());
            reward_values.insert(name.clone(), AnnotationValues { values: per_apply });
        }

        let mut ap_descriptors = IndexMap::new();
        let mut ap_values = std::collections::HashMap::new();
        for (name, ap) in &ats.aps {
            ap_descriptors.insert(
                name.clone(),
                Annotation {
                    alias: ap.alias.clone(),
                    description: ap.description.clone(),
                    applies_to: Some(vec![ap.applies_to]),
                    ty: Some(AnnotationType::Bool),
                    lower: None,
                    upper: None,
                },
            );
            let mut per_apply = std::collections::HashMap::new();
            per_apply.insert(ap.applies_to, ap.values.iter().copied().map(Scalar::Bool).collect());
            ap_values.insert(name.clone(), AnnotationValues { values: per_apply });
        }

        let mut observation_descriptors = IndexMap::new();
        let mut observation_values = std::collections::HashMap::new();
        for (name, obs) in &ats.observations {
            observation_descriptors.insert(
                name.clone(),
                Annotation {
                    alias: obs.alias.clone(),
                    description: obs.description.clone(),
                    applies_to: Some(vec![obs.applies_to]),
                    ty: None,
                    lower: None,
                    upper: None,
                },
            );
            let mut per_apply = std::collections::HashMap::new();
            per_apply.insert(obs.applies_to, obs.values.iter().map(|v| Scalar::Uint64(*v)).collect());
            observation_values.insert(name.clone(), AnnotationValues { values: per_apply });
        }

        let annotations = (!reward_descriptors.is_empty() || !ap_descriptors.is_empty() || !observation_descriptors.is_empty())
            .then_some(Annotations { rewards: reward_descriptors, aps: ap_descriptors, observations: observation_descriptors });

        let state_valuations =
            ats.state_valuation_struct.as_ref().map(crate::io::struct_type_to_state_valuations).transpose()?;

        let index = UmbIndex {
            format_version: crate::config::FORMAT_VERSION,
            format_revision: crate::config::FORMAT_REVISION,
            model_data: ats.model_info.clone().map(Into::into),
            file_data: Some(FileData::stamp_now()),
            transition_system,
            annotations,
            state_valuations,
            extra: Default::default(),
        };

        Ok(ExplicitUmb {
            index,
            initial_states: ats.initial_states.clone(),
            state_to_choice: Some(ats.state_to_choice.clone()),
            state_to_player: ats.state_to_player.clone(),
            markovian_states: ats.markovian_states.clone(),
            state_to_exit_rate: None,
            exit_rates: ats.exit_rates.clone(),
            choice_to_branch: Some(ats.choice_to_branch.clone()),
            choice_to_action: ats.choice_to_action.clone(),
            action_to_action_string: None,
            action_strings: ats.action_strings.clone(),
            branch_to_target: Some(ats.branch_to_target.clone()),
            branch_to_probability: None,
            branch_probabilities: ats.branch_to_probability.clone(),
            branch_to_branch_action: ats.branch_to_branch_action.clone(),
            branch_action_strings: ats.branch_action_strings.clone(),
            reward_values,
            ap_values,
            observation_values,
            state_valuation_struct: ats.state_valuation_struct.clone(),
            state_valuations: ats.state_valuations.clone(),
        })
    }
}

fn numeric_annotation_type(ty: CommonType) -> anyhow::Result<AnnotationType> {
    Ok(match ty {
        CommonType::Double => AnnotationType::Double,
        CommonType::Rational => AnnotationType::Rational,
        CommonType::DoubleInterval => AnnotationType::DoubleInterval,
        CommonType::RationalInterval => AnnotationType::RationalInterval,
        other => anyhow::bail!(UmbError::UnsupportedType(format!("{other:?} is not a valid annotation type"))),
    })
}

fn collect_rewards(
    annotations: &Option<Annotations>,
    reward_values: &std::collections::HashMap<String, AnnotationValues>,
) -> anyhow::Result<IndexMap<String, RewardAnnotation>> {
    let mut out = IndexMap::new();
    let Some(annotations) = annotations else { return Ok(out) };
    for (name, descriptor) in &annotations.rewards {
        let Some(values) = reward_values.get(name) else { continue };
        let applies_to = descriptor.applies_to.as_ref().and_then(|v| v.first().copied()).unwrap_or(AppliesTo::States);
        let Some(vals) = values.values.get(&applies_to) else { continue };
        let ty = vals.first().map(Scalar::tag_of).unwrap_or(CommonType::Double);
        let mut annotation = RewardAnnotation::new(name.clone(), ty, applies_to, vals.clone())?;
        annotation.alias = descriptor.alias.clone();
        annotation.description = descriptor.description.clone();
        out.insert(name.clone(), annotation);
    }
    Ok(out)
}

fn collect_aps(
    annotations: &Option<Annotations>,
    ap_values: &std::collections::HashMap<String, AnnotationValues>,
) -> anyhow::Result<IndexMap<String, AtomicPropositionAnnotation>> {
    let mut out = IndexMap::new();
    let Some(annotations) = annotations else { return Ok(out) };
    for (name, descriptor) in &annotations.aps {
        let Some(values) = ap_values.get(name) else { continue };
        let applies_to = descriptor.applies_to.as_ref().and_then(|v| v.first().copied()).unwrap_or(AppliesTo::States);
        let Some(vals) = values.values.get(&applies_to) else { continue };
        let bools: anyhow::Result<Vec<bool>> = vals
            .iter()
            .map(|v| match v {
                Scalar::Bool(b) => Ok(*b),
                other => anyhow::bail!(UmbError::UnsupportedType(format!("expected bool, got {:?}", other.tag_of()))),
            })
            .collect();
        let mut annotation = AtomicPropositionAnnotation::new(name.clone(), applies_to, bools?);
        annotation.alias = descriptor.alias.clone();
        annotation.description = descriptor.description.clone();
        out.insert(name.clone(), annotation);
    }
    Ok(out)
}

fn collect_observations(
    ts: &TransitionSystem,
    annotations: &Option<Annotations>,
    observation_values: &std::collections::HashMap<String, AnnotationValues>,
) -> anyhow::Result<IndexMap<String, ObservationAnnotation>> {
    let mut out = IndexMap::new();
    let Some(annotations) = annotations else { return Ok(out) };
    for (name, descriptor) in &annotations.observations {
        let Some(values) = observation_values.get(name) else { continue };
        let applies_to = descriptor
            .applies_to
            .as_ref()
            .and_then(|v| v.first().copied())
            .or(ts.observations_apply_to)
            .unwrap_or(AppliesTo::States);
        let Some(vals) = values.values.get(&applies_to) else { continue };
        let ints: anyhow::Result<Vec<u64>> = vals
            .iter()
            .map(|v| match v {
                Scalar::Uint64(x) => Ok(*x),
                Scalar::Uint32(x) => Ok(*x as u64),
                other => anyhow::bail!(UmbError::UnsupportedType(format!("expected integer, got {:?}", other.tag_of()))),
            })
            .collect();
        let mut annotation = ObservationAnnotation::new(name.clone(), applies_to, ints?, ts.num_observations)?;
        annotation.alias = descriptor.alias.clone();
        annotation.description = descriptor.description.clone();
        out.insert(name.clone(), annotation);
    }
    Ok(out)
}

/// Reads and validates a complete ATS from a UMB archive.
pub fn read_ats(path: &Path) -> anyhow::Result<ExplicitAts> {
    let umb = crate::io::read_umb(path)?;
    ExplicitAtsConverter::from_explicit_umb(umb)
}

/// Validates and writes a complete ATS as a UMB archive.
pub fn write_ats(ats: &ExplicitAts, path: &Path) -> anyhow::Result<()> {
    let umb = ExplicitAtsConverter::to_explicit_umb(ats)?;
    crate::io::write_umb(&umb, path)
}

#[cfg(test)]
mod test {
    use super::*;

    fn minimal_ats() -> ExplicitAts {
        ExplicitAts {
            time: TimeType::Discrete,
            num_players: 1,
            initial_states: vec![true, false],
            state_to_choice: vec![0, 1, 2],
            choice_to_branch: vec![0, 1, 1],
            branch_to_target: vec![1],
            ..Default::default()
        }
    }

    #[test]
    fn validate_accepts_a_well_formed_ats() {
        assert!(minimal_ats().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_branch_target() {
        let mut ats = minimal_ats();
        ats.branch_to_target = vec![99];
        assert!(ats.validate().is_err());
    }

    #[test]
    fn validate_rejects_mismatched_csr_length() {
        let mut ats = minimal_ats();
        ats.state_to_choice = vec![0, 1];
        assert!(ats.validate().is_err());
    }

    #[test]
    fn validate_rejects_multiplayer_without_player_vector() {
        let mut ats = minimal_ats();
        ats.num_players = 2;
        assert!(ats.validate().is_err());
    }
}
