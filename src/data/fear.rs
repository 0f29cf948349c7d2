use std::collections::HashMap;

use crate::{
    data::rows::FearRow,
    foundation::error::{HitMatrixError, HitMatrixResult},
};

/// Closed vocabulary of canonical fear categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum FearLabel {
    /// Mortality.
    Death,
    /// Being alone or trapped.
    Isolation,
    /// Possession and compulsion.
    LossOfControl,
    /// Collapse of sanity.
    Madness,
    /// Violation of the body.
    BodyHorror,
    /// Contagion.
    Disease,
    /// Human cruelty.
    Violence,
    /// Institutions failing.
    SocialCollapse,
    /// Machines and science gone wrong.
    Technology,
    /// Unexplained threats.
    TheUnknown,
    /// Ghosts, demons, curses.
    Supernatural,
}

impl FearLabel {
    /// Every canonical label, in declaration order.
    pub const ALL: [FearLabel; 11] = [
        Self::Death,
        Self::Isolation,
        Self::LossOfControl,
        Self::Madness,
        Self::BodyHorror,
        Self::Disease,
        Self::Violence,
        Self::SocialCollapse,
        Self::Technology,
        Self::TheUnknown,
        Self::Supernatural,
    ];

    /// Display name, also the bar key.
    pub fn name(self) -> &'static str {
        match self {
            Self::Death => "Death",
            Self::Isolation => "Isolation",
            Self::LossOfControl => "Loss of Control",
            Self::Madness => "Madness",
            Self::BodyHorror => "Body Horror",
            Self::Disease => "Disease",
            Self::Violence => "Violence",
            Self::SocialCollapse => "Social Collapse",
            Self::Technology => "Technology",
            Self::TheUnknown => "The Unknown",
            Self::Supernatural => "Supernatural",
        }
    }

    /// Static sentence shown in the ungrouped bar tooltip.
    pub fn description(self) -> &'static str {
        match self {
            Self::Death => "Mortality and the dread of dying or of losing someone close.",
            Self::Isolation => "Being cut off, trapped, or left utterly alone.",
            Self::LossOfControl => "Possession, compulsion, and a will that is no longer yours.",
            Self::Madness => "Unreliable perception and the slow collapse of sanity.",
            Self::BodyHorror => "Mutation, transformation, and violation of the body.",
            Self::Disease => "Contagion, infection, and plague.",
            Self::Violence => "Stalkers, slashers, and brutal human cruelty.",
            Self::SocialCollapse => "Institutions failing and neighbors turning on each other.",
            Self::Technology => "Machines, surveillance, and science gone wrong.",
            Self::TheUnknown => "Unseen threats whose nature is never explained.",
            Self::Supernatural => "Ghosts, demons, and curses beyond natural law.",
        }
    }

    /// Case-insensitive parse; `_`/`-` are treated as spaces. Non-canonical text yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let norm = normalize_label(s);
        if norm.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|l| normalize_label(l.name()) == norm)
    }

    /// Supergroup per [`SUPERGROUP_MAPPING`].
    pub fn supergroup(self) -> Option<Supergroup> {
        supergroup_in(SUPERGROUP_MAPPING, self)
    }
}

/// Thematic partition of the fear vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum Supergroup {
    /// Fears of the mind.
    Psychological,
    /// Fears of the flesh.
    Body,
    /// Fears of other people and systems.
    Societal,
    /// Fears of what lies beyond.
    Cosmic,
}

impl Supergroup {
    /// Every supergroup, in declaration order.
    pub const ALL: [Supergroup; 4] = [
        Self::Psychological,
        Self::Body,
        Self::Societal,
        Self::Cosmic,
    ];

    /// Display name, also the grouped bar key.
    pub fn name(self) -> &'static str {
        match self {
            Self::Psychological => "Psychological",
            Self::Body => "Body",
            Self::Societal => "Societal",
            Self::Cosmic => "Cosmic",
        }
    }

    /// Identifier suffix used by `bars_<slug>` scenes.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Psychological => "psychological",
            Self::Body => "body",
            Self::Societal => "societal",
            Self::Cosmic => "cosmic",
        }
    }

    /// Parse from slug or display name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|g| g.slug() == s)
    }

    /// Canonical labels in this group.
    pub fn members(self) -> Vec<FearLabel> {
        SUPERGROUP_MAPPING
            .iter()
            .filter(|(_, g)| *g == self)
            .map(|(l, _)| *l)
            .collect()
    }
}

/// Fixed label -> supergroup table. Must be total over [`FearLabel::ALL`].
pub const SUPERGROUP_MAPPING: &[(FearLabel, Supergroup)] = &[
    (FearLabel::Isolation, Supergroup::Psychological),
    (FearLabel::LossOfControl, Supergroup::Psychological),
    (FearLabel::Madness, Supergroup::Psychological),
    (FearLabel::BodyHorror, Supergroup::Body),
    (FearLabel::Disease, Supergroup::Body),
    (FearLabel::Death, Supergroup::Body),
    (FearLabel::Violence, Supergroup::Societal),
    (FearLabel::SocialCollapse, Supergroup::Societal),
    (FearLabel::Technology, Supergroup::Societal),
    (FearLabel::TheUnknown, Supergroup::Cosmic),
    (FearLabel::Supernatural, Supergroup::Cosmic),
];

fn supergroup_in(mapping: &[(FearLabel, Supergroup)], label: FearLabel) -> Option<Supergroup> {
    mapping.iter().find(|(l, _)| *l == label).map(|(_, g)| *g)
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check that `mapping` assigns every canonical label to exactly one supergroup.
pub fn validate_mapping(mapping: &[(FearLabel, Supergroup)]) -> HitMatrixResult<()> {
    for label in FearLabel::ALL {
        let n = mapping.iter().filter(|(l, _)| *l == label).count();
        if n != 1 {
            return Err(HitMatrixError::validation(format!(
                "fear label '{}' maps to {n} supergroups (expected exactly 1)",
                label.name()
            )));
        }
    }
    Ok(())
}

/// Startup check of the built-in [`SUPERGROUP_MAPPING`].
pub fn validate_supergroup_mapping() -> HitMatrixResult<()> {
    validate_mapping(SUPERGROUP_MAPPING)
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Bar datum: a canonical label (or supergroup name) and its frequency.
pub struct FearCount {
    /// Bar key.
    pub label: String,
    /// Frequency (>= 1).
    pub count: u32,
}

/// Tally keys in first-seen order, then sort descending by count (stable, so ties keep
/// first-seen order).
fn tally<K: Copy + Eq + std::hash::Hash>(
    keys: impl IntoIterator<Item = K>,
    name: impl Fn(K) -> &'static str,
) -> Vec<FearCount> {
    let mut order: Vec<K> = Vec::new();
    let mut counts: HashMap<K, u32> = HashMap::new();
    for k in keys {
        let c = counts.entry(k).or_insert_with(|| {
            order.push(k);
            0
        });
        *c += 1;
    }
    let mut out: Vec<FearCount> = order
        .into_iter()
        .map(|k| FearCount {
            label: name(k).to_string(),
            count: counts[&k],
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Per-label counts over canonical labels; blank and non-canonical rows are skipped.
pub fn count_fears(rows: &[FearRow]) -> Vec<FearCount> {
    tally(
        rows.iter()
            .filter_map(|r| r.label.as_deref().and_then(FearLabel::parse)),
        FearLabel::name,
    )
}

/// Per-supergroup counts using the built-in mapping.
pub fn count_fears_grouped(rows: &[FearRow]) -> HitMatrixResult<Vec<FearCount>> {
    count_fears_grouped_with(rows, SUPERGROUP_MAPPING)
}

/// Per-supergroup counts using an explicit mapping.
///
/// A canonical label missing from `mapping` is a configuration defect and is reported as an
/// error rather than dropped.
pub fn count_fears_grouped_with(
    rows: &[FearRow],
    mapping: &[(FearLabel, Supergroup)],
) -> HitMatrixResult<Vec<FearCount>> {
    let groups = rows
        .iter()
        .filter_map(|r| r.label.as_deref().and_then(FearLabel::parse))
        .map(|label| {
            supergroup_in(mapping, label).ok_or_else(|| {
                HitMatrixError::validation(format!(
                    "fear label '{}' has no supergroup",
                    label.name()
                ))
            })
        })
        .collect::<HitMatrixResult<Vec<_>>>()?;
    Ok(tally(groups, Supergroup::name))
}

#[cfg(test)]
#[path = "../../tests/unit/data/fear.rs"]
mod tests;
