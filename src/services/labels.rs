use std::collections::{HashMap, HashSet};

use rand::Rng;
use tracing::{info, warn};

use crate::board::{BoardClient, Label};
use crate::error::AppError;

/// Every color the board accepts for a label, in the board's own order.
pub const LABEL_COLORS: [&str; 30] = [
    "green",
    "yellow",
    "orange",
    "red",
    "purple",
    "blue",
    "sky",
    "lime",
    "pink",
    "black",
    "green_dark",
    "yellow_dark",
    "orange_dark",
    "red_dark",
    "purple_dark",
    "blue_dark",
    "sky_dark",
    "lime_dark",
    "pink_dark",
    "black_dark",
    "green_light",
    "yellow_light",
    "orange_light",
    "red_light",
    "purple_light",
    "blue_light",
    "sky_light",
    "lime_light",
    "pink_light",
    "black_light",
];

/// Makes sure each course has a label on the board, giving new labels a
/// color no other label on the board is using.
pub struct LabelAllocator<R: Rng> {
    rng: R,
}

impl<R: Rng> LabelAllocator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns `course name -> label id` for every name in `courses`,
    /// creating the labels that do not exist yet.
    pub async fn allocate(
        &mut self,
        board: &dyn BoardClient,
        board_id: &str,
        courses: &[String],
    ) -> Result<HashMap<String, String>, AppError> {
        let existing = board.fetch_labels(board_id).await?;
        let missing = missing_courses(courses, &existing);

        let mut available = available_colors(&existing);
        if missing.len() > available.len() {
            warn!(
                "{} new labels but only {} unused colors; colors will repeat",
                missing.len(),
                available.len()
            );
            replenish(&mut available, missing.len());
        }

        for course in missing {
            let color = self.take_color(&mut available);
            info!("Creating label {} ({})", course, color);
            board.create_label(board_id, course, color).await?;
        }

        let labels = board.fetch_labels(board_id).await?;
        let wanted: HashSet<&str> = courses.iter().map(String::as_str).collect();
        Ok(labels
            .into_iter()
            .filter(|label| wanted.contains(label.name.as_str()))
            .map(|label| (label.name, label.id))
            .collect())
    }

    fn take_color(&mut self, available: &mut Vec<&'static str>) -> &'static str {
        let idx = self.rng.random_range(0..available.len());
        available.remove(idx)
    }
}

/// Courses with no label of the same name, in input order, without repeats.
pub fn missing_courses<'a>(courses: &'a [String], existing: &[Label]) -> Vec<&'a str> {
    let names: HashSet<&str> = existing.iter().map(|l| l.name.as_str()).collect();
    let mut seen = HashSet::new();
    courses
        .iter()
        .map(String::as_str)
        .filter(|course| !names.contains(course) && seen.insert(*course))
        .collect()
}

/// Palette colors not used by any label on the board, course or not.
pub fn available_colors(existing: &[Label]) -> Vec<&'static str> {
    let used: HashSet<&str> = existing.iter().filter_map(|l| l.color.as_deref()).collect();
    LABEL_COLORS
        .iter()
        .copied()
        .filter(|color| !used.contains(color))
        .collect()
}

/// Tops the pool up with palette colors again until it holds `needed`
/// entries. Colors handed out from the top-up may already be in use.
pub fn replenish(available: &mut Vec<&'static str>, needed: usize) {
    let mut overflow = needed.saturating_sub(available.len());
    while overflow > 0 {
        let chunk = overflow.min(LABEL_COLORS.len());
        available.extend_from_slice(&LABEL_COLORS[..chunk]);
        overflow -= chunk;
    }
}
