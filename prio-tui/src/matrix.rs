//! Screen model of the prioritization matrix: one marker per project.

use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::layout::{ball_position, ball_size, Point, GRID_SIZE};
use crate::palette::project_color;
use crate::types::{Project, ProjectId};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position in the project list, which also drives the jitter.
    pub index: usize,
    pub project_id: ProjectId,
    pub center: Point,
    pub diameter: f64,
    pub color: Color,
    /// `effort/benefit`
    pub label: String,
    pub title: String,
}

impl Marker {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

pub fn build_markers(projects: &[Project]) -> Vec<Marker> {
    projects
        .iter()
        .enumerate()
        .map(|(index, project)| Marker {
            index,
            project_id: project.id.clone(),
            center: ball_position(project.effort, project.benefit, index),
            diameter: ball_size(project.effort, project.benefit),
            color: project_color(project.color_index),
            label: format!("{}/{}", project.effort, project.benefit),
            title: project.title.clone(),
        })
        .collect()
}

/// The topmost marker under `point`. Later markers are drawn over earlier ones, so they win.
pub fn hit_test(markers: &[Marker], point: Point, tolerance: f64) -> Option<&Marker> {
    markers
        .iter()
        .rev()
        .find(|m| m.center.distance(point) <= m.radius() + tolerance)
}

/// Map a terminal cell inside the canvas `area` to the center of that cell in grid units.
pub fn cell_to_grid(area: Rect, column: u16, row: u16) -> Option<Point> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }

    let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
    let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
    Some(Point::new(fx * GRID_SIZE, fy * GRID_SIZE))
}

/// Half a terminal cell in grid units, so a click anywhere on a marker's edge cell still counts.
pub fn cell_tolerance(area: Rect) -> f64 {
    if area.width == 0 || area.height == 0 {
        return 0.0;
    }
    let cell_w = GRID_SIZE / f64::from(area.width);
    let cell_h = GRID_SIZE / f64::from(area.height);
    cell_w.max(cell_h) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PROJECT_COLORS;
    use crate::types::{Narrative, Score, UserId};
    use chrono::Utc;

    fn project(id: &str, effort: u8, benefit: u8, color_index: u32) -> Project {
        let now = Utc::now();
        Project {
            id: ProjectId::from(id),
            user_id: UserId::from("u1"),
            title: format!("Project {}", id),
            effort: Score::new(effort).unwrap(),
            benefit: Score::new(benefit).unwrap(),
            narrative: Narrative::default(),
            assigned_date: None,
            color_index,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn markers_follow_layout_and_palette() {
        let markers = build_markers(&[project("a", 3, 7, 12), project("b", 10, 10, 0)]);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].label, "3/7");
        assert_eq!(markers[0].diameter, 30.0);
        assert_eq!(markers[0].color, PROJECT_COLORS[2]);
        assert_eq!(
            markers[0].center,
            ball_position(Score::new(3).unwrap(), Score::new(7).unwrap(), 0)
        );
        assert_eq!(markers[1].index, 1);
        assert_eq!(markers[1].center, Point::new(280.0, 20.0));
        assert_eq!(markers[1].title, "Project b");
    }

    #[test]
    fn click_inside_circle_selects_marker() {
        let markers = build_markers(&[project("a", 5, 5, 0)]);
        let center = markers[0].center;

        let hit = hit_test(&markers, Point::new(center.x + 10.0, center.y), 0.0);
        assert_eq!(hit.map(|m| m.project_id.as_str()), Some("a"));

        assert!(hit_test(&markers, Point::new(10.0, 10.0), 0.0).is_none());
    }

    #[test]
    fn overlapping_markers_pick_the_topmost() {
        let markers = build_markers(&[project("first", 4, 4, 0), project("second", 4, 4, 1)]);
        let between = Point::new(
            (markers[0].center.x + markers[1].center.x) / 2.0,
            (markers[0].center.y + markers[1].center.y) / 2.0,
        );

        let hit = hit_test(&markers, between, 0.0).unwrap();
        assert_eq!(hit.project_id.as_str(), "second");
    }

    #[test]
    fn cells_map_into_grid_units() {
        let area = Rect::new(10, 5, 60, 30);

        assert_eq!(cell_to_grid(area, 9, 5), None);
        assert_eq!(cell_to_grid(area, 70, 5), None);
        assert_eq!(cell_to_grid(area, 10, 35), None);

        let top_left = cell_to_grid(area, 10, 5).unwrap();
        assert_eq!(top_left, Point::new(2.5, 5.0));

        let bottom_right = cell_to_grid(area, 69, 34).unwrap();
        assert_eq!(bottom_right, Point::new(297.5, 295.0));

        assert_eq!(cell_tolerance(area), 5.0);
        assert_eq!(cell_to_grid(Rect::new(0, 0, 0, 0), 0, 0), None);
    }

    #[test]
    fn clicking_the_cell_under_a_marker_hits_it() {
        let area = Rect::new(0, 0, 60, 30);
        let markers = build_markers(&[project("a", 0, 10, 0)]);
        // index 0 jitters by -5 on both axes: center (15, 15)
        assert_eq!(markers[0].center, Point::new(15.0, 15.0));

        let column = (markers[0].center.x / GRID_SIZE * 60.0) as u16;
        let row = (markers[0].center.y / GRID_SIZE * 30.0) as u16;
        let point = cell_to_grid(area, column, row).unwrap();

        assert!(hit_test(&markers, point, cell_tolerance(area)).is_some());
    }
}
