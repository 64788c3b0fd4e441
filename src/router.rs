//! Client-side routes.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::catalog::GameId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the catalog listing
    Root,
    /// `/game/{id}`: the listing with one record's detail panel
    Game(GameId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Game(id) => format!("/game/{}", id),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return Some(Self::Root);
        }
        match path.strip_prefix("/game/") {
            Some(id) if !id.is_empty() && !id.contains('/') => Some(Self::Game(GameId::new(id))),
            _ => None,
        }
    }
}

/// Parent-supplied navigation request.
pub type Navigate = Arc<dyn Fn(Route) + Send + Sync>;

#[derive(Debug)]
pub struct Router {
    current: Route,
    history: VecDeque<Route>,
}

/// Oldest entries are dropped past this depth.
const MAX_HISTORY: usize = 32;

impl Default for Router {
    fn default() -> Self {
        Self {
            current: Route::Root,
            history: VecDeque::new(),
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Going to `/` starts a fresh history.
    pub fn navigate(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.current, route);
        if self.current == Route::Root {
            self.history.clear();
            return;
        }
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(previous);
    }

    /// Returns to the previous route, or `/` when there is none.
    pub fn back(&mut self) {
        self.current = self.history.pop_back().unwrap_or(Route::Root);
    }
}
