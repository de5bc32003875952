//! UMB file I/O (component C8, spec §4.8): orchestrates C2–C7, enumerating
//! every known member path, resolving each payload's type from the
//! manifest, and tracking unread archive members.
//!
//! Grounded on `original_source/umbi/io/umb.py`'s `UmbFile` enum and load
//! sequence, with the branch-action pair and per-annotation path template
//! added per the model's supplemental entity features.

use crate::archive::{ArchiveReader, Compress};
use crate::binary::vectors::{bytes_to_vector, vector_to_bytes};
use crate::datatypes::{CommonType, Scalar, StructType};
use crate::error::UmbError;
use crate::index::transition_system::AppliesTo;
use crate::index::UmbIndex;
use std::collections::HashMap;
use std::path::Path;

/// Known member paths within a UMB archive (spec.md §4.8's table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UmbFile {
    IndexJson,
    InitialStates,
    StateToChoice,
    StateToPlayer,
    MarkovianStates,
    StateToExitRate,
    ExitRates,
    ChoiceToBranch,
    ChoiceToAction,
    ActionToActionString,
    ActionStrings,
    BranchToTarget,
    BranchToProbability,
    BranchProbabilities,
    BranchToBranchAction,
    BranchActionStrings,
    StateToValuation,
    StateValuations,
}

impl UmbFile {
    pub fn path(self) -> &'static str {
        match self {
            UmbFile::IndexJson => "index.json",
            UmbFile::InitialStates => "initial-states.bin",
            UmbFile::StateToChoice => "state-to-choice.bin",
            UmbFile::StateToPlayer => "state-to-player.bin",
            UmbFile::MarkovianStates => "markovian-states.bin",
            UmbFile::StateToExitRate => "state-to-exit-rate.bin",
            UmbFile::ExitRates => "exit-rates.bin",
            UmbFile::ChoiceToBranch => "choice-to-branch.bin",
            UmbFile::ChoiceToAction => "choice-to-action.bin",
            UmbFile::ActionToActionString => "action-to-action-string.bin",
            UmbFile::ActionStrings => "action-strings.bin",
            UmbFile::BranchToTarget => "branch-to-target.bin",
            UmbFile::BranchToProbability => "branch-to-probability.bin",
            UmbFile::BranchProbabilities => "branch-probabilities.bin",
            UmbFile::BranchToBranchAction => "branch-to-branch-action.bin",
            UmbFile::BranchActionStrings => "branch-action-strings.bin",
            UmbFile::StateToValuation => "state-to-valuation.bin",
            UmbFile::StateValuations => "state-valuations.bin",
        }
    }
}

/// An annotation's path kind, used to assemble its two possible member
/// paths: `annotations/<kind>/<name>/for-<apply>/values.bin` plus the
/// optional chunk CSR sibling `to-values.bin`.
pub fn annotation_values_path(kind: &str, name: &str, applies_to: AppliesTo) -> String {
    format!("annotations/{kind}/{name}/for-{}/values.bin", applies_to_label(applies_to))
}

pub fn annotation_csr_path(kind: &str, name: &str, applies_to: AppliesTo) -> String {
    format!("annotations/{kind}/{name}/for-{}/to-values.bin", applies_to_label(applies_to))
}

/// Auxiliary chunk CSR backing `branch-action-strings.bin`, distinct from
/// `branch-to-branch-action.bin` (which holds the per-branch action index,
/// not the string table's own chunk offsets).
const BRANCH_ACTION_STRING_CSR: &str = "branch-action-to-branch-action-string.bin";

fn applies_to_label(applies_to: AppliesTo) -> &'static str {
    match applies_to {
        AppliesTo::States => "states",
        AppliesTo::Choices => "choices",
        AppliesTo::Branches => "branches",
    }
}

/// One annotation's decoded values, keyed by the entity kind it applies to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationValues {
    pub values: HashMap<AppliesTo, Vec<Scalar>>,
}

/// The raw, manifest-shaped in-memory container: one field per known
/// member, directly answering the "raw UMB object" the façade converts
/// to and from.
#[derive(Debug, Clone, Default)]
pub struct ExplicitUmb {
    pub index: UmbIndex,
    pub initial_states: Vec<bool>,
    pub state_to_choice: Option<Vec<u64>>,
    pub state_to_player: Option<Vec<u32>>,
    pub markovian_states: Option<Vec<bool>>,
    pub state_to_exit_rate: Option<Vec<u64>>,
    pub exit_rates: Option<Vec<Scalar>>,
    pub choice_to_branch: Option<Vec<u64>>,
    pub choice_to_action: Option<Vec<u32>>,
    pub action_to_action_string: Option<Vec<u64>>,
    pub action_strings: Option<Vec<String>>,
    pub branch_to_target: Option<Vec<u64>>,
    pub branch_to_probability: Option<Vec<u64>>,
    pub branch_probabilities: Option<Vec<Scalar>>,
    pub branch_to_branch_action: Option<Vec<u32>>,
    pub branch_action_strings: Option<Vec<String>>,
    pub reward_values: HashMap<String, AnnotationValues>,
    pub ap_values: HashMap<String, AnnotationValues>,
    pub observation_values: HashMap<String, AnnotationValues>,
    pub state_valuation_struct: Option<StructType>,
    pub state_valuations: Option<Vec<Scalar>>,
}

fn read_u32_vector(reader: &mut ArchiveReader, path: &str) -> anyhow::Result<Vec<u32>> {
    let bytes = reader.read(path)?;
    let values = bytes_to_vector(bytes, CommonType::Uint32, None, None, None)?;
    values
        .into_iter()
        .map(|v| match v {
            Scalar::Uint32(x) => Ok(x),
            other => anyhow::bail!(UmbError::UnsupportedType(format!("expected uint32, got {:?}", other.tag_of()))),
        })
        .collect()
}

fn read_u64_vector(reader: &mut ArchiveReader, path: &str) -> anyhow::Result<Vec<u64>> {
    let bytes = reader.read(path)?;
    let values = bytes_to_vector(bytes, CommonType::Uint64, None, None, None)?;
    values
        .into_iter()
        .map(|v| match v {
            Scalar::Uint64(x) => Ok(x),
            other => anyhow::bail!(UmbError::UnsupportedType(format!("expected uint64, got {:?}", other.tag_of()))),
        })
        .collect()
}

fn read_csr(reader: &mut ArchiveReader, path: &str) -> anyhow::Result<Vec<u64>> {
    read_u64_vector(reader, path)
}

fn read_bitvector(reader: &mut ArchiveReader, path: &str, entity_count: usize) -> anyhow::Result<Vec<bool>> {
    let bytes = reader.read(path)?;
    let values = bytes_to_vector(bytes, CommonType::Bool, None, None, Some(entity_count))?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            Scalar::Bool(b) => b,
            _ => unreachable!(),
        })
        .collect())
}

fn read_typed_values(
    reader: &mut ArchiveReader,
    values_path: &str,
    csr_path: &str,
    ty: CommonType,
) -> anyhow::Result<Vec<Scalar>> {
    let csr = if reader.contains(csr_path) { Some(read_csr(reader, csr_path)?) } else { None };
    let bytes = reader.read(values_path)?;
    bytes_to_vector(bytes, ty, None, csr.as_deref(), None)
}

/// Loads a full UMB archive: (1) reads `index.json`; (2) for each declared
/// section reads the corresponding files with the type resolved from the
/// manifest; (3) iterates annotations' declared `applies-to` sets; (4)
/// truncates boolean vectors to the exact entity count; (5) warns once per
/// unread archive member.
pub fn read_umb(path: &Path) -> anyhow::Result<ExplicitUmb> {
    let mut reader = ArchiveReader::open(path)?;
    let index_bytes = reader.read(UmbFile::IndexJson.path())?;
    let index_text = String::from_utf8(index_bytes.to_vec())?;
    let index = UmbIndex::from_json(&index_text)?;

    let ts = &index.transition_system;
    let n_states = ts.num_states as usize;
    let n_choices = ts.num_choices as usize;
    let n_branches = ts.num_branches as usize;

    let initial_states = read_bitvector(&mut reader, UmbFile::InitialStates.path(), n_states)?;

    let state_to_choice =
        reader.contains(UmbFile::StateToChoice.path()).then(|| read_csr(&mut reader, UmbFile::StateToChoice.path())).transpose()?;
    let state_to_player = reader
        .contains(UmbFile::StateToPlayer.path())
        .then(|| read_u32_vector(&mut reader, UmbFile::StateToPlayer.path()))
        .transpose()?;
    let markovian_states = reader
        .contains(UmbFile::MarkovianStates.path())
        .then(|| read_bitvector(&mut reader, UmbFile::MarkovianStates.path(), n_states))
        .transpose()?;

    let (state_to_exit_rate, exit_rates) = if reader.contains(UmbFile::ExitRates.path()) {
        let ty = ts.exit_rate_type.map(CommonType::from).unwrap_or(CommonType::Double);
        let csr = reader
            .contains(UmbFile::StateToExitRate.path())
            .then(|| read_csr(&mut reader, UmbFile::StateToExitRate.path()))
            .transpose()?;
        let values = read_typed_values(&mut reader, UmbFile::ExitRates.path(), UmbFile::StateToExitRate.path(), ty)?;
        (csr, Some(values))
    } else {
        (None, None)
    };

    let choice_to_branch =
        reader.contains(UmbFile::ChoiceToBranch.path()).then(|| read_csr(&mut reader, UmbFile::ChoiceToBranch.path())).transpose()?;
    let choice_to_action = reader
        .contains(UmbFile::ChoiceToAction.path())
        .then(|| read_u32_vector(&mut reader, UmbFile::ChoiceToAction.path()))
        .transpose()?;

    let (action_to_action_string, action_strings) = if reader.contains(UmbFile::ActionStrings.path()) {
        let values = read_typed_values(
            &mut reader,
            UmbFile::ActionStrings.path(),
            UmbFile::ActionToActionString.path(),
            CommonType::String,
        )?;
        let csr = reader
            .contains(UmbFile::ActionToActionString.path())
            .then(|| read_csr(&mut reader, UmbFile::ActionToActionString.path()))
            .transpose()?;
        let strings = values
            .into_iter()
            .map(|v| match v {
                Scalar::String(s) => s,
                _ => unreachable!(),
            })
            .collect();
        (csr, Some(strings))
    } else {
        (None, None)
    };

    let branch_to_target = reader
        .contains(UmbFile::BranchToTarget.path())
        .then(|| read_u64_vector(&mut reader, UmbFile::BranchToTarget.path()))
        .transpose()?;

    let (branch_to_probability, branch_probabilities) = if reader.contains(UmbFile::BranchProbabilities.path()) {
        let ty = ts.branch_probability_type.map(CommonType::from).unwrap_or(CommonType::Double);
        let csr = reader
            .contains(UmbFile::BranchToProbability.path())
            .then(|| read_csr(&mut reader, UmbFile::BranchToProbability.path()))
            .transpose()?;
        let values =
            read_typed_values(&mut reader, UmbFile::BranchProbabilities.path(), UmbFile::BranchToProbability.path(), ty)?;
        (csr, Some(values))
    } else {
        (None, None)
    };

    let branch_to_branch_action = reader
        .contains(UmbFile::BranchToBranchAction.path())
        .then(|| read_u32_vector(&mut reader, UmbFile::BranchToBranchAction.path()))
        .transpose()?;
    let branch_action_strings = if reader.contains(UmbFile::BranchActionStrings.path()) {
        let values = read_typed_values(&mut reader, UmbFile::BranchActionStrings.path(), BRANCH_ACTION_STRING_CSR, CommonType::String)?;
        Some(values.into_iter().map(|v| match v {
            Scalar::String(s) => s,
            _ => unreachable!(),
        }).collect())
    } else {
        None
    };

    let mut reward_values = HashMap::new();
    let mut ap_values = HashMap::new();
    let mut observation_values = HashMap::new();
    if let Some(annotations) = &index.annotations {
        read_annotation_kind(&mut reader, "rewards", &annotations.rewards, &mut reward_values, n_states, n_choices, n_branches)?;
        read_annotation_kind(&mut reader, "aps", &annotations.aps, &mut ap_values, n_states, n_choices, n_branches)?;
        read_observation_kind(&mut reader, &annotations.observations, &mut observation_values)?;
    }

    let (state_valuation_struct, state_valuations) = if let Some(sv) = &index.state_valuations {
        let struct_ty = state_valuations_to_struct_type(sv)?;
        let csr = reader
            .contains(UmbFile::StateToValuation.path())
            .then(|| read_csr(&mut reader, UmbFile::StateToValuation.path()))
            .transpose()?;
        let bytes = reader.read(UmbFile::StateValuations.path())?;
        let values = bytes_to_vector(bytes, CommonType::Struct, Some(&struct_ty), csr.as_deref(), None)?;
        (Some(struct_ty), Some(values))
    } else {
        (None, None)
    };

    for name in reader.unread_members() {
        tracing::warn!(member = %name, "unread archive member");
    }

    Ok(ExplicitUmb {
        index,
        initial_states,
        state_to_choice,
        state_to_player,
        markovian_states,
        state_to_exit_rate,
        exit_rates,
        choice_to_branch,
        choice_to_action,
        action_to_action_string,
        action_strings,
        branch_to_target,
        branch_to_probability,
        branch_probabilities,
        branch_to_branch_action,
        branch_action_strings,
        reward_values,
        ap_values,
        observation_values,
        state_valuation_struct,
        state_valuations,
    })
}

fn read_annotation_kind(
    reader: &mut ArchiveReader,
    kind: &str,
    entries: &indexmap::IndexMap<String, crate::index::annotations::Annotation>,
    out: &mut HashMap<String, AnnotationValues>,
    n_states: usize,
    n_choices: usize,
    n_branches: usize,
) -> anyhow::Result<()> {
    for (name, descriptor) in entries {
        let applies = descriptor.applies_to.clone().unwrap_or_default();
        let mut per_apply = HashMap::new();
        for apply in applies {
            let values_path = annotation_values_path(kind, name, apply);
            let csr_path = annotation_csr_path(kind, name, apply);
            let ty = descriptor.ty.map(annotation_type_to_common).unwrap_or(CommonType::Bool);
            let entity_count = match apply {
                AppliesTo::States => n_states,
                AppliesTo::Choices => n_choices,
                AppliesTo::Branches => n_branches,
            };
            let values = if ty == CommonType::Bool {
                read_bitvector(reader, &values_path, entity_count)?.into_iter().map(Scalar::Bool).collect()
            } else {
                read_typed_values(reader, &values_path, &csr_path, ty)?
            };
            per_apply.insert(apply, values);
        }
        out.insert(name.clone(), AnnotationValues { values: per_apply });
    }
    Ok(())
}

/// Observations carry no manifest type tag of their own (always `uint64`),
/// but otherwise follow the same per-descriptor `applies-to` shape as
/// rewards/aps.
fn read_observation_kind(
    reader: &mut ArchiveReader,
    entries: &indexmap::IndexMap<String, crate::index::annotations::Annotation>,
    out: &mut HashMap<String, AnnotationValues>,
) -> anyhow::Result<()> {
    for (name, descriptor) in entries {
        let applies = descriptor.applies_to.clone().unwrap_or_default();
        let mut per_apply = HashMap::new();
        for apply in applies {
            let values_path = annotation_values_path("observations", name, apply);
            let csr_path = annotation_csr_path("observations", name, apply);
            let values = read_typed_values(reader, &values_path, &csr_path, CommonType::Uint64)?;
            per_apply.insert(apply, values);
        }
        out.insert(name.clone(), AnnotationValues { values: per_apply });
    }
    Ok(())
}

fn write_observation_kind(
    members: &mut HashMap<String, Vec<u8>>,
    entries: &indexmap::IndexMap<String, crate::index::annotations::Annotation>,
    values: &HashMap<String, AnnotationValues>,
) -> anyhow::Result<()> {
    for name in entries.keys() {
        let Some(annotation_values) = values.get(name) else { continue };
        for (apply, vals) in &annotation_values.values {
            let values_path = annotation_values_path("observations", name, *apply);
            let csr_path = annotation_csr_path("observations", name, *apply);
            let (bytes, csr) = vector_to_bytes(vals, CommonType::Uint64, None)?;
            members.insert(values_path, bytes);
            if let Some(csr) = csr {
                insert_u64_vector(members, &csr_path, &csr)?;
            }
        }
    }
    Ok(())
}

fn annotation_type_to_common(ty: crate::index::annotations::AnnotationType) -> CommonType {
    use crate::index::annotations::AnnotationType as AT;
    match ty {
        AT::Bool => CommonType::Bool,
        AT::Double => CommonType::Double,
        AT::Rational => CommonType::Rational,
        AT::DoubleInterval => CommonType::DoubleInterval,
        AT::RationalInterval => CommonType::RationalInterval,
        AT::String => CommonType::String,
    }
}

fn state_valuations_to_struct_type(sv: &crate::index::StateValuations) -> anyhow::Result<StructType> {
    use crate::datatypes::{StructAttribute, StructField};
    use crate::index::state_valuations::ValuationField;
    use std::num::NonZeroU32;

    let mut fields = Vec::with_capacity(sv.variables.len());
    for field in &sv.variables {
        match field {
            ValuationField::Padding(p) => {
                let bits = NonZeroU32::new(p.padding)
                    .ok_or_else(|| UmbError::SchemaViolation("padding field must be positive".to_string()))?;
                fields.push(StructField::Padding(bits));
            }
            ValuationField::Attribute(a) => {
                let mut attr = StructAttribute::new(a.name.clone(), a.ty, a.size)?;
                attr.lower = a.lower;
                attr.upper = a.upper;
                fields.push(StructField::Attribute(attr));
            }
        }
    }
    StructType::new(sv.alignment, fields)
}

/// Inverse of [`state_valuations_to_struct_type`]: rebuilds the manifest's
/// `state-valuations` schema from a decoded [`StructType`].
pub fn struct_type_to_state_valuations(struct_ty: &StructType) -> anyhow::Result<crate::index::StateValuations> {
    use crate::datatypes::StructField;
    use crate::index::state_valuations::{ValuationAttribute, ValuationField, ValuationPadding};

    let mut variables = Vec::with_capacity(struct_ty.fields.len());
    for field in &struct_ty.fields {
        match field {
            StructField::Padding(bits) => {
                variables.push(ValuationField::Padding(ValuationPadding { padding: bits.get() }));
            }
            StructField::Attribute(a) => {
                variables.push(ValuationField::Attribute(ValuationAttribute {
                    name: a.name.clone(),
                    ty: a.ty,
                    size: a.size,
                    lower: a.lower,
                    upper: a.upper,
                }));
            }
        }
    }
    Ok(crate::index::StateValuations { alignment: struct_ty.alignment, variables })
}

/// Writes `umb` as a gzip-compressed archive at `path`, consulting the
/// manifest to decide which files to emit and which types to use.
pub fn write_umb(umb: &ExplicitUmb, path: &Path) -> anyhow::Result<()> {
    let mut members = HashMap::new();
    members.insert(UmbFile::IndexJson.path().to_string(), umb.index.to_json()?.into_bytes());

    let (bytes, _) = vector_to_bytes(&umb.initial_states.iter().copied().map(Scalar::Bool).collect::<Vec<_>>(), CommonType::Bool, None)?;
    members.insert(UmbFile::InitialStates.path().to_string(), bytes);

    if let Some(csr) = &umb.state_to_choice {
        insert_u64_vector(&mut members, UmbFile::StateToChoice.path(), csr)?;
    }
    if let Some(players) = &umb.state_to_player {
        insert_u32_vector(&mut members, UmbFile::StateToPlayer.path(), players)?;
    }
    if let Some(markovian) = &umb.markovian_states {
        let (bytes, _) = vector_to_bytes(&markovian.iter().copied().map(Scalar::Bool).collect::<Vec<_>>(), CommonType::Bool, None)?;
        members.insert(UmbFile::MarkovianStates.path().to_string(), bytes);
    }
    if let Some(values) = &umb.exit_rates {
        let ty = umb.index.transition_system.exit_rate_type.map(CommonType::from).unwrap_or(CommonType::Double);
        let (bytes, csr) = vector_to_bytes(values, ty, None)?;
        members.insert(UmbFile::ExitRates.path().to_string(), bytes);
        if let Some(csr) = csr.or_else(|| umb.state_to_exit_rate.clone()) {
            insert_u64_vector(&mut members, UmbFile::StateToExitRate.path(), &csr)?;
        }
    }
    if let Some(csr) = &umb.choice_to_branch {
        insert_u64_vector(&mut members, UmbFile::ChoiceToBranch.path(), csr)?;
    }
    if let Some(actions) = &umb.choice_to_action {
        insert_u32_vector(&mut members, UmbFile::ChoiceToAction.path(), actions)?;
    }
    if let Some(strings) = &umb.action_strings {
        let values: Vec<Scalar> = strings.iter().cloned().map(Scalar::String).collect();
        let (bytes, csr) = vector_to_bytes(&values, CommonType::String, None)?;
        members.insert(UmbFile::ActionStrings.path().to_string(), bytes);
        if let Some(csr) = csr {
            insert_u64_vector(&mut members, UmbFile::ActionToActionString.path(), &csr)?;
        }
    }
    if let Some(targets) = &umb.branch_to_target {
        insert_u64_vector(&mut members, UmbFile::BranchToTarget.path(), targets)?;
    }
    if let Some(values) = &umb.branch_probabilities {
        let ty = umb.index.transition_system.branch_probability_type.map(CommonType::from).unwrap_or(CommonType::Double);
        let (bytes, csr) = vector_to_bytes(values, ty, None)?;
        members.insert(UmbFile::BranchProbabilities.path().to_string(), bytes);
        if let Some(csr) = csr {
            insert_u64_vector(&mut members, UmbFile::BranchToProbability.path(), &csr)?;
        }
    }
    if let Some(branch_actions) = &umb.branch_to_branch_action {
        insert_u32_vector(&mut members, UmbFile::BranchToBranchAction.path(), branch_actions)?;
    }
    if let Some(strings) = &umb.branch_action_strings {
        let values: Vec<Scalar> = strings.iter().cloned().map(Scalar::String).collect();
        let (bytes, csr) = vector_to_bytes(&values, CommonType::String, None)?;
        members.insert(UmbFile::BranchActionStrings.path().to_string(), bytes);
        if let Some(csr) = csr {
            insert_u64_vector(&mut members, BRANCH_ACTION_STRING_CSR, &csr)?;
        }
    }

    if let Some(annotations) = &umb.index.annotations {
        write_annotation_kind(&mut members, "rewards", &annotations.rewards, &umb.reward_values)?;
        write_annotation_kind(&mut members, "aps", &annotations.aps, &umb.ap_values)?;
        write_observation_kind(&mut members, &annotations.observations, &umb.observation_values)?;
    }

    if let (Some(struct_ty), Some(values)) = (&umb.state_valuation_struct, &umb.state_valuations) {
        let (bytes, csr) = vector_to_bytes(values, CommonType::Struct, Some(struct_ty))?;
        members.insert(UmbFile::StateValuations.path().to_string(), bytes);
        if let Some(csr) = csr {
            insert_u64_vector(&mut members, UmbFile::StateToValuation.path(), &csr)?;
        }
    }

    crate::archive::write_archive(path, &members, Compress::Gzip)
}

fn insert_u64_vector(members: &mut HashMap<String, Vec<u8>>, path: &str, values: &[u64]) -> anyhow::Result<()> {
    let scalars: Vec<Scalar> = values.iter().map(|v| Scalar::Uint64(*v)).collect();
    let (bytes, _) = vector_to_bytes(&scalars, CommonType::Uint64, None)?;
    members.insert(path.to_string(), bytes);
    Ok(())
}

fn insert_u32_vector(members: &mut HashMap<String, Vec<u8>>, path: &str, values: &[u32]) -> anyhow::Result<()> {
    let scalars: Vec<Scalar> = values.iter().map(|v| Scalar::Uint32(*v)).collect();
    let (bytes, _) = vector_to_bytes(&scalars, CommonType::Uint32, None)?;
    members.insert(path.to_string(), bytes);
    Ok(())
}

fn write_annotation_kind(
    members: &mut HashMap<String, Vec<u8>>,
    kind: &str,
    entries: &indexmap::IndexMap<String, crate::index::annotations::Annotation>,
    values: &HashMap<String, AnnotationValues>,
) -> anyhow::Result<()> {
    for (name, descriptor) in entries {
        let Some(annotation_values) = values.get(name) else { continue };
        let ty = descriptor.ty.map(annotation_type_to_common).unwrap_or(CommonType::Bool);
        for (apply, vals) in &annotation_values.values {
            let values_path = annotation_values_path(kind, name, *apply);
            let csr_path = annotation_csr_path(kind, name, *apply);
            let (bytes, csr) = vector_to_bytes(vals, ty, None)?;
            members.insert(values_path, bytes);
            if let Some(csr) = csr {
                insert_u64_vector(members, &csr_path, &csr)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn umb_file_paths_match_manifest_table() {
        assert_eq!(UmbFile::IndexJson.path(), "index.json");
        assert_eq!(UmbFile::BranchToBranchAction.path(), "branch-to-branch-action.bin");
        assert_eq!(
            annotation_values_path("rewards", "step_cost", AppliesTo::Choices),
            "annotations/rewards/step_cost/for-choices/values.bin"
        );
    }
}
