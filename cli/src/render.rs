//! Plain-text rendering of server responses.

use std::fmt::Write;

use tastetrack_core::{AccuracySummary, FeedbackSummary, Recipe, WeatherReading};

use crate::types::LocationReport;

pub fn recipe(position: usize, recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}. {}", position, recipe.title);
    out.push_str("   Ingredients:\n");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "   - {}", ingredient);
    }
    out.push_str("   Steps:\n");
    for (i, step) in recipe.steps.iter().enumerate() {
        let _ = writeln!(out, "   Step {}: {}", i + 1, step);
    }
    out
}

pub fn weather(reading: &WeatherReading) -> String {
    format!(
        "{} ({}), {:.1} C",
        reading.condition, reading.description, reading.temperature_celsius
    )
}

pub fn report(report: &LocationReport) -> String {
    format!(
        "{}, {}, {} ({:.4}, {:.4})\n{}\nReceived {}",
        report.place.city,
        report.place.state,
        report.place.country,
        report.lat,
        report.lon,
        weather(&report.weather),
        report.received_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

pub fn feedback(summary: &FeedbackSummary) -> String {
    format!(
        "Feedback: {} total, {} liked, {} disliked",
        summary.total, summary.liked, summary.disliked
    )
}

pub fn accuracy(summary: &AccuracySummary) -> String {
    let mut out = format!("Votes: {}\n", summary.total_votes);
    for (i, count) in summary.rank_counts.iter().enumerate() {
        let _ = writeln!(out, "  Rank {}: {}", i + 1, count);
    }
    let _ = writeln!(out, "Rank 1 picked: {:.1}%", summary.rank1_percent);
    if !summary.top_cuisines.is_empty() {
        out.push_str("Top cuisines:\n");
        for entry in &summary.top_cuisines {
            let _ = writeln!(out, "  {} ({})", entry.cuisine, entry.votes);
        }
    }
    out
}
