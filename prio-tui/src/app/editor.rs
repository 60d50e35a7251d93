use chrono::{Duration, NaiveDate};

use crate::draft::ProjectDraft;
use crate::types::{
    Narrative, NarrativeField, NewProject, Project, ProjectId, ProjectPatch, Score,
};

use super::state::TextInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(Project),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Effort,
    Benefit,
    AssignedDate,
    Narrative(NarrativeField),
}

impl EditorField {
    const ORDER: [EditorField; 10] = [
        EditorField::Title,
        EditorField::Effort,
        EditorField::Benefit,
        EditorField::AssignedDate,
        EditorField::Narrative(NarrativeField::DiscoveryScope),
        EditorField::Narrative(NarrativeField::ComplexityFactors),
        EditorField::Narrative(NarrativeField::Blockers),
        EditorField::Narrative(NarrativeField::NeedsDependencies),
        EditorField::Narrative(NarrativeField::NextSteps),
        EditorField::Narrative(NarrativeField::ResearchFocus),
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Saving,
    Deleting,
}

/// What a submit asks the repository to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Create(NewProject),
    Update { id: ProjectId, patch: ProjectPatch },
}

/// State of the project dialog.
#[derive(Debug, Clone)]
pub struct Editor {
    pub mode: EditorMode,
    pub focused: EditorField,
    pub title: TextInput,
    pub effort: Score,
    pub benefit: Score,
    pub assigned_date: Option<NaiveDate>,
    pub narrative: [TextInput; 6],
    pub pending: Option<Pending>,
    pub validation_error: Option<String>,
}

impl Editor {
    pub fn create() -> Self {
        Self::from_draft(EditorMode::Create, ProjectDraft::default())
    }

    pub fn edit(project: Project) -> Self {
        let draft = ProjectDraft::from_project(&project);
        Self::from_draft(EditorMode::Edit(project), draft)
    }

    fn from_draft(mode: EditorMode, draft: ProjectDraft) -> Self {
        let narrative = NarrativeField::ALL
            .map(|field| TextInput::from_str(draft.narrative.get(field).unwrap_or("")));
        Self {
            mode,
            focused: EditorField::Title,
            title: TextInput::from_str(&draft.title),
            effort: draft.effort,
            benefit: draft.benefit,
            assigned_date: draft.assigned_date,
            narrative,
            pending: None,
            validation_error: None,
        }
    }

    pub fn draft(&self) -> ProjectDraft {
        let mut narrative = Narrative::default();
        for field in NarrativeField::ALL {
            narrative.set(field, Some(self.narrative[field.index()].value.clone()));
        }
        ProjectDraft {
            title: self.title.value.clone(),
            effort: self.effort,
            benefit: self.benefit,
            narrative,
            assigned_date: self.assigned_date,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        match &self.mode {
            EditorMode::Edit(project) => Some(&project.id),
            EditorMode::Create => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Create New Project",
            EditorMode::Edit(_) => "Edit Project",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (&self.mode, self.pending) {
            (_, Some(Pending::Deleting)) => "Deleting...",
            (EditorMode::Create, Some(Pending::Saving)) => "Creating...",
            (EditorMode::Edit(_), Some(Pending::Saving)) => "Saving...",
            (EditorMode::Create, None) => "Create Project",
            (EditorMode::Edit(_), None) => "Save Changes",
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            EditorField::Title => Some(&mut self.title),
            EditorField::Narrative(field) => Some(&mut self.narrative[field.index()]),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(input) = self.focused_input() {
            input.insert(c);
            self.validation_error = None;
        }
    }

    pub fn newline(&mut self) {
        if let EditorField::Narrative(field) = self.focused {
            self.narrative[field.index()].insert('\n');
        }
    }

    pub fn backspace(&mut self) {
        match self.focused {
            EditorField::AssignedDate => self.assigned_date = None,
            _ => {
                if let Some(input) = self.focused_input() {
                    input.backspace();
                }
            }
        }
    }

    pub fn home(&mut self) {
        if let Some(input) = self.focused_input() {
            input.home();
        }
    }

    pub fn end(&mut self) {
        if let Some(input) = self.focused_input() {
            input.end();
        }
    }

    /// Left: cursor in text, slider down, date one day back.
    pub fn left(&mut self, today: NaiveDate) {
        match self.focused {
            EditorField::Effort | EditorField::Benefit => self.adjust(-1),
            EditorField::AssignedDate => self.shift_date(-1, today),
            _ => {
                if let Some(input) = self.focused_input() {
                    input.move_left();
                }
            }
        }
    }

    pub fn right(&mut self, today: NaiveDate) {
        match self.focused {
            EditorField::Effort | EditorField::Benefit => self.adjust(1),
            EditorField::AssignedDate => self.shift_date(1, today),
            _ => {
                if let Some(input) = self.focused_input() {
                    input.move_right();
                }
            }
        }
    }

    /// Move the focused slider by `delta`, clamped to the score range.
    pub fn adjust(&mut self, delta: i8) {
        let step = delta.unsigned_abs();
        let apply = |score: Score| {
            if delta < 0 {
                score.saturating_sub(step)
            } else {
                score.saturating_add(step)
            }
        };
        match self.focused {
            EditorField::Effort => self.effort = apply(self.effort),
            EditorField::Benefit => self.benefit = apply(self.benefit),
            _ => {}
        }
    }

    /// Move the date by `days`. An empty date starts from `today`.
    pub fn shift_date(&mut self, days: i64, today: NaiveDate) {
        let Some(current) = self.assigned_date else {
            self.assigned_date = Some(today);
            return;
        };
        if let Some(shifted) = current.checked_add_signed(Duration::days(days)) {
            self.assigned_date = Some(shifted);
        }
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.assigned_date = date;
    }

    /// Validate and mark the dialog as saving. `None` when blank or already busy.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.is_pending() {
            return None;
        }

        let draft = self.draft();
        let request = match &self.mode {
            EditorMode::Create => draft.into_new_project().map(SubmitRequest::Create),
            EditorMode::Edit(project) => draft
                .patch_against(project)
                .map(|patch| SubmitRequest::Update {
                    id: project.id.clone(),
                    patch,
                }),
        };

        match request {
            Ok(request) => {
                self.validation_error = None;
                self.pending = Some(Pending::Saving);
                Some(request)
            }
            Err(e) => {
                self.validation_error = Some(e.to_string());
                self.focused = EditorField::Title;
                None
            }
        }
    }

    pub fn begin_delete(&mut self) -> Option<ProjectId> {
        if self.is_pending() {
            return None;
        }
        let id = self.project_id()?.clone();
        self.pending = Some(Pending::Deleting);
        Some(id)
    }

    /// The request finished. On failure the contents stay so the user can retry.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }
}
