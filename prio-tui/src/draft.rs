use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{Narrative, NarrativeField, NewProject, Project, ProjectPatch, Score};

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Project title is required")]
    BlankTitle,
}

/// The editor's working copy of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub effort: Score,
    pub benefit: Score,
    pub narrative: Narrative,
    pub assigned_date: Option<NaiveDate>,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            effort: Score::MID,
            benefit: Score::MID,
            narrative: Narrative::default(),
            assigned_date: None,
        }
    }
}

impl ProjectDraft {
    /// Pre-fill from an existing project. Scores are copied as-is, zero included.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            effort: project.effort,
            benefit: project.benefit,
            narrative: project.narrative.clone(),
            assigned_date: project.assigned_date,
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::BlankTitle);
        }
        Ok(())
    }

    pub fn into_new_project(self) -> Result<NewProject, DraftError> {
        self.validate()?;
        Ok(NewProject {
            title: self.title.trim().to_string(),
            effort: self.effort,
            benefit: self.benefit,
            narrative: self.normalized_narrative(),
            assigned_date: self.assigned_date,
        })
    }

    /// The fields that differ from `original`.
    pub fn patch_against(&self, original: &Project) -> Result<ProjectPatch, DraftError> {
        self.validate()?;

        let mut patch = ProjectPatch::default();
        let title = self.title.trim();
        if title != original.title {
            patch.title = Some(title.to_string());
        }
        if self.effort != original.effort {
            patch.effort = Some(self.effort);
        }
        if self.benefit != original.benefit {
            patch.benefit = Some(self.benefit);
        }

        let narrative = self.normalized_narrative();
        for field in NarrativeField::ALL {
            let text = narrative.get(field);
            if text != original.narrative.get(field) {
                patch.narrative.insert(field, text.map(str::to_string));
            }
        }

        if self.assigned_date != original.assigned_date {
            patch.assigned_date = Some(self.assigned_date);
        }
        Ok(patch)
    }

    // Re-applying every field drops text that is blank after editing.
    fn normalized_narrative(&self) -> Narrative {
        let mut narrative = Narrative::default();
        for (field, text) in self.narrative.iter() {
            narrative.set(field, text.map(str::to_string));
        }
        narrative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProjectId, UserId};
    use chrono::Utc;

    fn project() -> Project {
        let now = Utc::now();
        Project {
            id: ProjectId::from("p1"),
            user_id: UserId::from("u1"),
            title: "Alpha".to_string(),
            effort: Score::MIN,
            benefit: Score::new(8).unwrap(),
            narrative: Narrative::default().with(NarrativeField::Blockers, "Budget"),
            assigned_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            color_index: 3,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_draft_starts_mid_scale() {
        let draft = ProjectDraft::default();
        assert_eq!(draft.effort, Score::MID);
        assert_eq!(draft.benefit, Score::MID);
        assert_eq!(draft.validate(), Err(DraftError::BlankTitle));
    }

    #[test]
    fn zero_scores_survive_prefill() {
        let draft = ProjectDraft::from_project(&project());
        assert_eq!(draft.effort, Score::MIN);
        assert_eq!(draft.benefit.value(), 8);
        assert_eq!(draft.narrative.get(NarrativeField::Blockers), Some("Budget"));
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let draft = ProjectDraft {
            title: "   ".to_string(),
            ..ProjectDraft::default()
        };
        assert_eq!(draft.into_new_project(), Err(DraftError::BlankTitle));
    }

    #[test]
    fn new_project_is_trimmed() {
        let draft = ProjectDraft {
            title: "  Launch  ".to_string(),
            ..ProjectDraft::default()
        };
        let new = draft.into_new_project().unwrap();
        assert_eq!(new.title, "Launch");
        assert_eq!(new.effort, Score::MID);
    }

    #[test]
    fn unchanged_draft_yields_empty_patch() {
        let original = project();
        let draft = ProjectDraft::from_project(&original);
        assert!(draft.patch_against(&original).unwrap().is_empty());
    }

    #[test]
    fn patch_holds_only_changes() {
        let original = project();
        let mut draft = ProjectDraft::from_project(&original);
        draft.benefit = Score::new(2).unwrap();
        draft.narrative.set(NarrativeField::Blockers, None);
        draft.assigned_date = None;

        let patch = draft.patch_against(&original).unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.effort, None);
        assert_eq!(patch.benefit, Score::new(2).ok());
        assert_eq!(patch.narrative.get(&NarrativeField::Blockers), Some(&None));
        assert_eq!(patch.narrative.len(), 1);
        assert_eq!(patch.assigned_date, Some(None));
    }
}
