use std::collections::HashMap;

use rand::Rng;
use tracing::info;

use crate::board::{BoardClient, BoardList};
use crate::error::AppError;
use crate::services::LabelAllocator;

/// Board-side identifiers resolved once at the start of a run.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub board_id: String,
    pub list_id: String,
    /// Every list on the board, in board order.
    pub lists: Vec<BoardList>,
    pub courses: Vec<String>,
    pub course_label_ids: HashMap<String, String>,
}

impl SyncContext {
    pub async fn establish<R: Rng>(
        board: &dyn BoardClient,
        board_name: &str,
        list_name: &str,
        courses: Vec<String>,
        labels: &mut LabelAllocator<R>,
    ) -> Result<Self, AppError> {
        let board_id = register_board_id(board, board_name).await?;
        info!("Using board {} ({})", board_name, board_id);

        let lists = board.fetch_lists(&board_id).await?;
        let list_id = register_list_id(&lists, list_name)?;
        info!("Using list {} ({})", list_name, list_id);

        let course_label_ids = labels.allocate(board, &board_id, &courses).await?;
        info!("{} course labels ready", course_label_ids.len());

        Ok(Self {
            board_id,
            list_id,
            lists,
            courses,
            course_label_ids,
        })
    }

    pub fn label_id(&self, course: &str) -> Result<&str, AppError> {
        self.course_label_ids
            .get(course)
            .map(String::as_str)
            .ok_or_else(|| AppError::not_found("label", course))
    }
}

pub async fn register_board_id(
    board: &dyn BoardClient,
    board_name: &str,
) -> Result<String, AppError> {
    let boards = board.fetch_boards().await?;
    index_by_name(&boards, |b| (&b.name, &b.id))
        .get(board_name)
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::not_found("board", board_name))
}

pub fn register_list_id(lists: &[BoardList], list_name: &str) -> Result<String, AppError> {
    index_by_name(lists, |l| (&l.name, &l.id))
        .get(list_name)
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::not_found("list", list_name))
}

/// Name-keyed view of a fetched collection; the first entry wins on duplicates.
fn index_by_name<'a, T>(
    items: &'a [T],
    key: impl Fn(&'a T) -> (&'a String, &'a String),
) -> HashMap<&'a str, &'a str> {
    let mut index = HashMap::new();
    for item in items {
        let (name, id) = key(item);
        index.entry(name.as_str()).or_insert(id.as_str());
    }
    index
}
