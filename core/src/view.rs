//! List view state machine.
//!
//! # Design
//! A `ListView` starts in `Loading`, runs its fetch once when activated, and
//! settles in `Ready` or `Error`. The fetch is any future resolving to the
//! collection, so the view owns no transport and tests drive it with ready
//! futures. Activation is not tied to teardown: dropping the view while the
//! fetch is pending just drops the future.

use std::future::Future;

use tracing::{debug, error};

use crate::error::ApiError;
use crate::render::{Listable, Screen};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Ready(Vec<T>),
}

#[derive(Debug)]
pub struct ListView<T> {
    state: ViewState<T>,
    activated: bool,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            activated: false,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Await `fetch` and store its outcome. Only the first activation runs
    /// its fetch; later calls drop theirs unpolled.
    pub async fn activate<F>(&mut self, fetch: F)
    where
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        if self.activated {
            debug!("list view already activated, ignoring fetch");
            return;
        }
        self.activated = true;

        self.state = match fetch.await {
            Ok(items) => {
                debug!(count = items.len(), "list view ready");
                ViewState::Ready(items)
            }
            Err(err) => {
                error!(error = %err, "list view fetch failed");
                ViewState::Error(err.to_string())
            }
        };
    }
}

impl<T: Listable> ListView<T> {
    pub fn render(&self) -> Screen {
        match &self.state {
            ViewState::Loading => Screen::Loading {
                label: format!("Loading {}...", T::NOUN),
            },
            ViewState::Error(message) if message.is_empty() => Screen::Failed {
                message: format!("Failed to fetch {}", T::NOUN),
            },
            ViewState::Error(message) => Screen::Failed {
                message: message.clone(),
            },
            ViewState::Ready(items) if items.is_empty() => Screen::Empty {
                heading: T::HEADING,
                message: T::EMPTY,
            },
            ViewState::Ready(items) => Screen::Cards {
                heading: T::HEADING,
                cards: items
                    .iter()
                    .enumerate()
                    .map(|(position, item)| item.card(position))
                    .collect(),
            },
        }
    }
}
