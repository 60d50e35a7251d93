use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Upper bound of both scoring axes.
pub const SCORE_MAX: u8 = 10;

/// An effort or benefit score, always within `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("score must be between 0 and 10, got {0}")]
pub struct ScoreError(pub i64);

impl Score {
    pub const MIN: Score = Score(0);
    pub const MID: Score = Score(5);
    pub const MAX: Score = Score(SCORE_MAX);

    pub fn new(value: u8) -> Result<Self, ScoreError> {
        if value > SCORE_MAX {
            return Err(ScoreError(value as i64));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Slider step up, clamped at the top of the range.
    pub fn saturating_add(self, step: u8) -> Self {
        Self(self.0.saturating_add(step).min(SCORE_MAX))
    }

    /// Slider step down, clamped at zero.
    pub fn saturating_sub(self, step: u8) -> Self {
        Self(self.0.saturating_sub(step))
    }

    /// Every valid score, lowest first.
    pub fn all() -> impl Iterator<Item = Score> {
        (0..=SCORE_MAX).map(Score)
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= SCORE_MAX)
            .map(Score)
            .ok_or(ScoreError(value))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the signed-in user, as issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque project identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The free-text fields of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NarrativeField {
    DiscoveryScope,
    ComplexityFactors,
    Blockers,
    NeedsDependencies,
    NextSteps,
    ResearchFocus,
}

impl NarrativeField {
    pub const ALL: [NarrativeField; 6] = [
        NarrativeField::DiscoveryScope,
        NarrativeField::ComplexityFactors,
        NarrativeField::Blockers,
        NarrativeField::NeedsDependencies,
        NarrativeField::NextSteps,
        NarrativeField::ResearchFocus,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name in the `projects` table.
    pub fn column(self) -> &'static str {
        match self {
            NarrativeField::DiscoveryScope => "discovery_scope",
            NarrativeField::ComplexityFactors => "complexity_factors",
            NarrativeField::Blockers => "blockers",
            NarrativeField::NeedsDependencies => "needs_dependencies",
            NarrativeField::NextSteps => "next_steps",
            NarrativeField::ResearchFocus => "research_focus",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NarrativeField::DiscoveryScope => "Discovery and Scope",
            NarrativeField::ComplexityFactors => "Complexity Factors",
            NarrativeField::Blockers => "Blockers",
            NarrativeField::NeedsDependencies => "Needs and Dependencies",
            NarrativeField::NextSteps => "Next Steps",
            NarrativeField::ResearchFocus => "Research Focus",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            NarrativeField::DiscoveryScope => "Describe the project scope and discovery phase...",
            NarrativeField::ComplexityFactors => "What makes this project complex?",
            NarrativeField::Blockers => "Current blockers or obstacles...",
            NarrativeField::NeedsDependencies => "What does this project depend on?",
            NarrativeField::NextSteps => "What are the immediate next steps?",
            NarrativeField::ResearchFocus => "Areas requiring research or investigation...",
        }
    }
}

/// The six narrative fields, each optional. Blank text is stored as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative([Option<String>; 6]);

impl Narrative {
    pub fn get(&self, field: NarrativeField) -> Option<&str> {
        self.0[field.index()].as_deref()
    }

    pub fn set(&mut self, field: NarrativeField, text: Option<String>) {
        self.0[field.index()] = text.filter(|t| !t.trim().is_empty());
    }

    pub fn with(mut self, field: NarrativeField, text: impl Into<String>) -> Self {
        self.set(field, Some(text.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (NarrativeField, Option<&str>)> {
        NarrativeField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

/// A user-owned project on the prioritization matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub user_id: UserId,
    pub title: String,
    pub effort: Score,
    pub benefit: Score,
    pub narrative: Narrative,
    pub assigned_date: Option<NaiveDate>,
    /// Palette slot, looked up modulo the palette size.
    pub color_index: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new project. Owner and color are added by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub effort: Score,
    pub benefit: Score,
    pub narrative: Narrative,
    pub assigned_date: Option<NaiveDate>,
}

impl NewProject {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            effort: Score::MID,
            benefit: Score::MID,
            narrative: Narrative::default(),
            assigned_date: None,
        }
    }

    pub fn with_scores(mut self, effort: Score, benefit: Score) -> Self {
        self.effort = effort;
        self.benefit = benefit;
        self
    }
}

/// Partial update of a project's editable fields.
///
/// `None` leaves a field untouched. For the nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub effort: Option<Score>,
    pub benefit: Option<Score>,
    pub narrative: BTreeMap<NarrativeField, Option<String>>,
    pub assigned_date: Option<Option<NaiveDate>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.effort.is_none()
            && self.benefit.is_none()
            && self.narrative.is_empty()
            && self.assigned_date.is_none()
    }

    pub fn with_benefit(mut self, benefit: Score) -> Self {
        self.benefit = Some(benefit);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Apply the patch in place. Timestamps are the store's business.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(effort) = self.effort {
            project.effort = effort;
        }
        if let Some(benefit) = self.benefit {
            project.benefit = benefit;
        }
        for (field, text) in &self.narrative {
            project.narrative.set(*field, text.clone());
        }
        if let Some(date) = self.assigned_date {
            project.assigned_date = date;
        }
    }
}
