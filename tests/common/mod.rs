#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use duesync::board::{
    Board, BoardClient, BoardList, Card, Label, NewCardRequest, UpdateCardRequest,
};
use duesync::courses::CourseResolver;
use duesync::error::AppError;

pub const BOARD_ID: &str = "board-school";
pub const BACKLOG_ID: &str = "list-backlog";
pub const DONE_ID: &str = "list-done";

/// Every write the sync issued against the fake board, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardWrite {
    CreateLabel { name: String, color: String },
    CreateCard(NewCardRequest),
    UpdateCard { id: String, update: UpdateCardRequest },
}

#[derive(Debug, Clone)]
struct StoredCard {
    list_id: String,
    card: Card,
    pos: u32,
}

#[derive(Default)]
struct BoardState {
    boards: Vec<Board>,
    lists: Vec<BoardList>,
    labels: Vec<Label>,
    cards: Vec<StoredCard>,
    writes: Vec<BoardWrite>,
    next_id: u32,
    fail_card_creates_after: Option<usize>,
}

impl BoardState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// In-memory board with one "School" board holding "Backlog" and "Done".
pub struct FakeBoard {
    state: Mutex<BoardState>,
}

impl FakeBoard {
    pub fn new() -> Self {
        let state = BoardState {
            boards: vec![
                Board {
                    id: "board-work".to_string(),
                    name: "Work".to_string(),
                },
                Board {
                    id: BOARD_ID.to_string(),
                    name: "School".to_string(),
                },
            ],
            lists: vec![
                BoardList {
                    id: BACKLOG_ID.to_string(),
                    name: "Backlog".to_string(),
                },
                BoardList {
                    id: DONE_ID.to_string(),
                    name: "Done".to_string(),
                },
            ],
            ..BoardState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_label(self, name: &str, color: Option<&str>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("label");
            state.labels.push(Label {
                id,
                name: name.to_string(),
                color: color.map(str::to_string),
            });
        }
        self
    }

    pub fn with_card(self, list_id: &str, name: &str, due: Option<&str>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = state.next_id("card");
            let pos = state.cards.len() as u32 + 1;
            state.cards.push(StoredCard {
                list_id: list_id.to_string(),
                card: Card {
                    id,
                    name: name.to_string(),
                    due: due.map(str::to_string),
                },
                pos,
            });
        }
        self
    }

    /// Card creation starts failing once `count` cards have been created.
    pub fn failing_card_creates_after(self, count: usize) -> Self {
        self.state.lock().unwrap().fail_card_creates_after = Some(count);
        self
    }

    pub fn writes(&self) -> Vec<BoardWrite> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.lock().unwrap().writes.clear();
    }

    pub fn labels(&self) -> Vec<Label> {
        self.state.lock().unwrap().labels.clone()
    }

    pub fn label_id(&self, name: &str) -> Option<String> {
        self.labels()
            .into_iter()
            .find(|l| l.name == name)
            .map(|l| l.id)
    }

    /// `(name, due)` of the cards in a list, in position order.
    pub fn cards_in(&self, list_id: &str) -> Vec<(String, Option<String>)> {
        let state = self.state.lock().unwrap();
        let mut cards: Vec<&StoredCard> =
            state.cards.iter().filter(|c| c.list_id == list_id).collect();
        cards.sort_by_key(|c| c.pos);
        cards
            .into_iter()
            .map(|c| (c.card.name.clone(), c.card.due.clone()))
            .collect()
    }

    pub fn card_id(&self, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .cards
            .iter()
            .find(|c| c.card.name == name)
            .map(|c| c.card.id.clone())
    }
}

/// The board echoes dues back with millisecond precision.
fn stored_due(due: &str) -> String {
    DateTime::parse_from_rfc3339(due)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
        .unwrap_or_else(|_| due.to_string())
}

fn remote_error(body: &str) -> AppError {
    AppError::Remote {
        status: 400,
        body: body.to_string(),
    }
}

#[async_trait]
impl BoardClient for FakeBoard {
    async fn fetch_boards(&self) -> Result<Vec<Board>, AppError> {
        Ok(self.state.lock().unwrap().boards.clone())
    }

    async fn fetch_lists(&self, board_id: &str) -> Result<Vec<BoardList>, AppError> {
        if board_id != BOARD_ID {
            return Err(remote_error("invalid id"));
        }
        Ok(self.state.lock().unwrap().lists.clone())
    }

    async fn fetch_labels(&self, board_id: &str) -> Result<Vec<Label>, AppError> {
        if board_id != BOARD_ID {
            return Err(remote_error("invalid id"));
        }
        Ok(self.state.lock().unwrap().labels.clone())
    }

    async fn create_label(
        &self,
        _board_id: &str,
        name: &str,
        color: &str,
    ) -> Result<Label, AppError> {
        let mut state = self.state.lock().unwrap();
        let label = Label {
            id: state.next_id("label"),
            name: name.to_string(),
            color: Some(color.to_string()),
        };
        state.labels.push(label.clone());
        state.writes.push(BoardWrite::CreateLabel {
            name: name.to_string(),
            color: color.to_string(),
        });
        Ok(label)
    }

    async fn fetch_cards(&self, list_id: &str) -> Result<Vec<Card>, AppError> {
        let state = self.state.lock().unwrap();
        let mut cards: Vec<&StoredCard> =
            state.cards.iter().filter(|c| c.list_id == list_id).collect();
        cards.sort_by_key(|c| c.pos);
        Ok(cards.into_iter().map(|c| c.card.clone()).collect())
    }

    async fn create_card(&self, card: &NewCardRequest) -> Result<Card, AppError> {
        let mut state = self.state.lock().unwrap();
        let created = state
            .writes
            .iter()
            .filter(|w| matches!(w, BoardWrite::CreateCard(_)))
            .count();
        if state.fail_card_creates_after.is_some_and(|limit| created >= limit) {
            return Err(AppError::Remote {
                status: 429,
                body: "API_TOO_MANY_CARDS_REQUESTS".to_string(),
            });
        }

        state.writes.push(BoardWrite::CreateCard(card.clone()));
        let pos = state.cards.iter().map(|c| c.pos).max().unwrap_or(0) + 1;
        let stored = Card {
            id: state.next_id("card"),
            name: card.name.clone(),
            due: Some(stored_due(&card.due)),
        };
        state.cards.push(StoredCard {
            list_id: card.id_list.clone(),
            card: stored.clone(),
            pos,
        });
        Ok(stored)
    }

    async fn update_card(
        &self,
        card_id: &str,
        update: &UpdateCardRequest,
    ) -> Result<Card, AppError> {
        let mut state = self.state.lock().unwrap();
        state.writes.push(BoardWrite::UpdateCard {
            id: card_id.to_string(),
            update: update.clone(),
        });
        let stored = state
            .cards
            .iter_mut()
            .find(|c| c.card.id == card_id)
            .ok_or_else(|| AppError::Remote {
                status: 404,
                body: "The requested resource was not found.".to_string(),
            })?;
        if let Some(due) = &update.due {
            stored.card.due = Some(stored_due(due));
        }
        if let Some(pos) = update.pos {
            stored.pos = pos;
        }
        Ok(stored.card.clone())
    }
}

/// Always answers with the same course and counts how often it was asked.
pub struct FixedResolver {
    pub course: String,
    pub calls: usize,
}

impl FixedResolver {
    pub fn new(course: &str) -> Self {
        Self {
            course: course.to_string(),
            calls: 0,
        }
    }
}

impl CourseResolver for FixedResolver {
    fn resolve(&mut self, _title: &str, _courses: &[String]) -> Result<String, AppError> {
        self.calls += 1;
        Ok(self.course.clone())
    }
}
