use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::repository::StoreError;
use crate::types::{
    Narrative, NarrativeField, NewProject, Project, ProjectId, ProjectPatch, Score, UserId,
};

/// A row of the `projects` table as the data API returns it.
#[derive(Debug, Deserialize)]
pub struct ProjectRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub effort: i64,
    pub benefit: i64,
    pub discovery_scope: Option<String>,
    pub complexity_factors: Option<String>,
    pub blockers: Option<String>,
    pub needs_dependencies: Option<String>,
    pub next_steps: Option<String>,
    pub research_focus: Option<String>,
    pub assigned_date: Option<NaiveDate>,
    pub color_index: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let score = |name: &str, value: i64| {
            Score::try_from(value).map_err(|e| {
                StoreError::Decode(format!("Project {} has invalid {}: {}", row.id, name, e))
            })
        };
        let effort = score("effort", row.effort)?;
        let benefit = score("benefit", row.benefit)?;

        let mut narrative = Narrative::default();
        narrative.set(NarrativeField::DiscoveryScope, row.discovery_scope);
        narrative.set(NarrativeField::ComplexityFactors, row.complexity_factors);
        narrative.set(NarrativeField::Blockers, row.blockers);
        narrative.set(NarrativeField::NeedsDependencies, row.needs_dependencies);
        narrative.set(NarrativeField::NextSteps, row.next_steps);
        narrative.set(NarrativeField::ResearchFocus, row.research_focus);

        Ok(Project {
            id: ProjectId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            effort,
            benefit,
            narrative,
            assigned_date: row.assigned_date,
            // Negative values only come from hand-edited rows; any slot is fine for those.
            color_index: row.color_index.unwrap_or(0).unsigned_abs() as u32,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct InsertProjectRow<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub effort: u8,
    pub benefit: u8,
    pub discovery_scope: Option<&'a str>,
    pub complexity_factors: Option<&'a str>,
    pub blockers: Option<&'a str>,
    pub needs_dependencies: Option<&'a str>,
    pub next_steps: Option<&'a str>,
    pub research_focus: Option<&'a str>,
    pub assigned_date: Option<NaiveDate>,
    pub color_index: u32,
}

impl<'a> InsertProjectRow<'a> {
    pub fn new(owner: &'a UserId, project: &'a NewProject, color_index: u32) -> Self {
        let narrative = &project.narrative;
        let text = move |field| narrative.get(field);
        Self {
            user_id: owner.as_str(),
            title: &project.title,
            effort: project.effort.value(),
            benefit: project.benefit.value(),
            discovery_scope: text(NarrativeField::DiscoveryScope),
            complexity_factors: text(NarrativeField::ComplexityFactors),
            blockers: text(NarrativeField::Blockers),
            needs_dependencies: text(NarrativeField::NeedsDependencies),
            next_steps: text(NarrativeField::NextSteps),
            research_focus: text(NarrativeField::ResearchFocus),
            assigned_date: project.assigned_date,
            color_index,
        }
    }
}

/// JSON body for a PATCH: untouched fields are omitted, cleared ones are `null`.
pub fn patch_body(patch: &ProjectPatch) -> Value {
    let mut body = Map::new();

    if let Some(title) = &patch.title {
        body.insert("title".into(), Value::from(title.as_str()));
    }
    if let Some(effort) = patch.effort {
        body.insert("effort".into(), Value::from(effort.value()));
    }
    if let Some(benefit) = patch.benefit {
        body.insert("benefit".into(), Value::from(benefit.value()));
    }
    for (field, text) in &patch.narrative {
        let value = text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map_or(Value::Null, Value::from);
        body.insert(field.column().into(), value);
    }
    if let Some(date) = patch.assigned_date {
        let value = date.map_or(Value::Null, |d| Value::from(d.format("%Y-%m-%d").to_string()));
        body.insert("assigned_date".into(), value);
    }

    Value::Object(body)
}
