use std::collections::HashSet;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::info;

/// Current poll totals, as returned by the GET endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSnapshot {
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<u64>,
    pub total_votes: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Option index out of range
    InvalidOption,
    /// This fingerprint has voted before; totals returned unchanged
    AlreadyVoted { votes: Vec<u64>, total_votes: u64 },
    Recorded {
        votes: Vec<u64>,
        total_votes: u64,
        voted_for: usize,
    },
}

struct PollState {
    question: String,
    options: Vec<String>,
    votes: Vec<u64>,
    voters: HashSet<String>,
}

/// In-memory poll owned by the server process and shared with request
/// handlers. Voters are deduplicated by fingerprint; counts reset on
/// restart.
pub struct PollStore {
    state: Mutex<PollState>,
}

impl PollStore {
    pub fn new(question: impl Into<String>, options: Vec<String>) -> Self {
        let votes = vec![0; options.len()];
        Self {
            state: Mutex::new(PollState {
                question: question.into(),
                options,
                votes,
                voters: HashSet::new(),
            }),
        }
    }

    /// The one poll this site runs.
    pub fn default_poll() -> Self {
        Self::new(
            "Do you regret voting for Trump?",
            vec![
                "Hell No - Would Do It Again Tomorrow".to_string(),
                "Yes - I Got Played".to_string(),
                "Didn't Vote - The System is Rigged Anyway".to_string(),
            ],
        )
    }

    pub async fn snapshot(&self) -> PollSnapshot {
        let state = self.state.lock().await;
        PollSnapshot {
            question: state.question.clone(),
            options: state.options.clone(),
            votes: state.votes.clone(),
            total_votes: state.votes.iter().sum(),
        }
    }

    pub async fn vote(&self, option_index: usize, voter_id: &str) -> VoteOutcome {
        let mut state = self.state.lock().await;
        if option_index >= state.options.len() {
            return VoteOutcome::InvalidOption;
        }
        if state.voters.contains(voter_id) {
            return VoteOutcome::AlreadyVoted {
                votes: state.votes.clone(),
                total_votes: state.votes.iter().sum(),
            };
        }

        state.votes[option_index] += 1;
        state.voters.insert(voter_id.to_string());
        info!(option = option_index, voters = state.voters.len(), "vote recorded");

        VoteOutcome::Recorded {
            votes: state.votes.clone(),
            total_votes: state.votes.iter().sum(),
            voted_for: option_index,
        }
    }
}

/// Stable fingerprint for vote deduplication.
pub fn voter_fingerprint(ip: &str, user_agent: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}-{}", ip, user_agent));
    format!("{:x}", hasher.finalize())
}
