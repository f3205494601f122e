//! Summaries over the feedback log and the vote ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{Rank, VoteRecord};
use crate::recipe::FeedbackEvent;

/// How many cuisines the accuracy summary lists.
pub const TOP_CUISINES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeedbackSummary {
    pub total: usize,
    pub liked: usize,
    pub disliked: usize,
}

impl FeedbackSummary {
    pub fn from_events(events: &[FeedbackEvent]) -> Self {
        let liked = events.iter().filter(|e| e.liked).count();
        Self {
            total: events.len(),
            liked,
            disliked: events.len() - liked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CuisineCount {
    pub cuisine: String,
    pub votes: usize,
}

/// How often the model's first pick was the one users voted best.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccuracySummary {
    pub total_votes: usize,
    /// Votes for rank 1, 2 and 3, in that order.
    pub rank_counts: Vec<usize>,
    /// Share of rank-1 votes, 0-100.
    pub rank1_percent: f64,
    pub top_cuisines: Vec<CuisineCount>,
}

impl AccuracySummary {
    pub fn from_votes(votes: &[VoteRecord]) -> Self {
        let mut rank_counts = [0usize; 3];
        let mut cuisines: HashMap<&str, usize> = HashMap::new();

        for vote in votes {
            rank_counts[usize::from(vote.rank.get() - 1)] += 1;
            *cuisines.entry(vote.cuisine_used.as_str()).or_default() += 1;
        }

        let mut top_cuisines: Vec<CuisineCount> = cuisines
            .into_iter()
            .map(|(cuisine, votes)| CuisineCount {
                cuisine: cuisine.to_string(),
                votes,
            })
            .collect();
        top_cuisines.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.cuisine.cmp(&b.cuisine)));
        top_cuisines.truncate(TOP_CUISINES);

        let total_votes = votes.len();
        let first = rank_counts[usize::from(Rank::FIRST.get() - 1)];
        let rank1_percent = if total_votes > 0 {
            first as f64 / total_votes as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_votes,
            rank_counts: rank_counts.to_vec(),
            rank1_percent,
            top_cuisines,
        }
    }
}
