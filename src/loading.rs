//! Loading stage tracking for corpus initialization
//!
//! One `LoadingStateMachine` lives alongside the text store. It holds the
//! current `{stage, message}` pair and publishes every change through a
//! `watch` channel, so observers always see the latest state, including
//! observers that subscribe after initialization finished.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Idle,
    CheckingCache,
    Downloading,
    Initializing,
    Complete,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::CheckingCache => "checking-cache",
            Stage::Downloading => "downloading",
            Stage::Initializing => "initializing",
            Stage::Complete => "complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingState {
    pub stage: Stage,
    pub message: String,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { stage: Stage::Idle, message: String::new() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot move from {from} back to {to}")]
    Backward { from: Stage, to: Stage },

    #[error("loading already complete")]
    AlreadyComplete,
}

/// Tracks the current initialization stage; transitions only move forward.
pub struct LoadingStateMachine {
    tx: watch::Sender<LoadingState>,
    /// Lowest stage the next transition may target
    floor: Mutex<Stage>,
}

impl LoadingStateMachine {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadingState::default());
        Self { tx, floor: Mutex::new(Stage::Idle) }
    }

    pub fn current(&self) -> LoadingState {
        self.tx.borrow().clone()
    }

    pub fn stage(&self) -> Stage {
        self.tx.borrow().stage
    }

    pub fn is_complete(&self) -> bool {
        self.stage() == Stage::Complete
    }

    /// Within one initialize cycle stages only move forward. A retry after a
    /// failed cycle first republishes `idle`, then reports its own stages.
    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.tx.subscribe()
    }

    /// Publish a new state. Same-stage transitions only update the message.
    pub fn transition(&self, stage: Stage, message: impl Into<String>) -> Result<(), TransitionError> {
        let mut floor = self.floor.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.tx.borrow().stage;

        if current == Stage::Complete {
            return Err(TransitionError::AlreadyComplete);
        }
        if stage < *floor {
            return Err(TransitionError::Backward { from: current, to: stage });
        }

        *floor = stage;
        // send_replace publishes even when nobody subscribed yet
        self.tx.send_replace(LoadingState { stage, message: message.into() });
        Ok(())
    }

    /// Start a new initialize cycle.
    ///
    /// A state left behind by a failed cycle is reset to `idle` so observers
    /// see the retry begin. Has no effect after `complete`.
    pub fn begin_cycle(&self) {
        let mut floor = self.floor.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.tx.borrow().stage;
        if current == Stage::Complete {
            return;
        }

        *floor = Stage::Idle;
        if current != Stage::Idle {
            self.tx.send_replace(LoadingState { stage: Stage::Idle, message: "Retrying...".to_string() });
        }
    }
}

impl Default for LoadingStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
