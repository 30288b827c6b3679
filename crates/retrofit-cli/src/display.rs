//! Plain-text rendering of merge outcomes, annotations, and team reports.

use std::path::Path;

use retrofit_core::{
    Annotation, DocumentMerge, FilterOutcome, Friction, SettingsMerge, TeamReport, categorize,
};

const MAX_LIST_ITEMS: usize = 10;

// ── Annotations ──

pub fn print_annotation(a: &Annotation) {
    println!("  {:<16} {}", a.status.as_str(), a.subject_title);
    if let Some(note) = &a.note {
        println!("  {:<16} {}", "", note);
    }
}

pub fn print_annotations(annotations: &[Annotation], path: &Path) {
    println!("=== Annotations ({}) ===", path.display());
    if annotations.is_empty() {
        println!("  (none)");
        return;
    }
    for a in annotations {
        print_annotation(a);
    }
}

// ── Apply ──

pub fn print_filtered(outcome: &FilterOutcome<Friction>) {
    println!("Frictions");
    for f in &outcome.kept {
        println!("  {:<16} {}", categorize(f).as_str(), f.title);
    }
    if outcome.removed_count > 0 {
        println!(
            "  {:<16} {} false positive(s)",
            "filtered", outcome.removed_count
        );
        for title in outcome.removed_titles.iter().take(MAX_LIST_ITEMS) {
            println!("  {:<16} - {}", "", title);
        }
    }
    println!();
}

pub fn print_document_merge(path: &Path, merge: &DocumentMerge) {
    println!("Rules");
    println!("  {:<16} {}", "file", path.display());
    println!("  {:<16} {}", "status", merge.status.as_str());
    println!("  {:<16} {}", "added", merge.added);
    println!("  {:<16} {}", "skipped", merge.skipped);
    println!();
}

pub fn print_settings_merge(path: &Path, merge: &SettingsMerge) {
    println!("Settings");
    println!("  {:<16} {}", "file", path.display());
    println!("  {:<16} {}", "status", merge.status.as_str());
    println!(
        "  {:<16} {} added, {} skipped",
        "hooks", merge.hooks_added, merge.hooks_skipped
    );
    println!(
        "  {:<16} {} added, {} skipped",
        "mcp servers", merge.servers_added, merge.servers_skipped
    );
    println!();
}

// ── Team ──

pub fn print_team(team: &TeamReport) {
    println!("=== Team report ({} members) ===", team.members.len());
    println!("{}", team.members.join(", "));
    println!();

    if !team.frictions.is_empty() {
        println!("Frictions");
        for entry in &team.frictions {
            println!(
                "  [{}/{}] {:<14} {}",
                entry.member_count,
                team.members.len(),
                entry.category().as_str(),
                entry.record.title
            );
            println!("  {:<20} {}", "", entry.contributors.join(", "));
            let shown = entry.record.examples.len().min(MAX_LIST_ITEMS);
            for example in &entry.record.examples[..shown] {
                println!("  {:<20} - {}", "", example);
            }
            if entry.record.examples.len() > shown {
                println!(
                    "  {:<20} ... and {} more",
                    "",
                    entry.record.examples.len() - shown
                );
            }
        }
        println!();
    }

    if !team.rules.is_empty() {
        println!("Rules");
        for entry in &team.rules {
            println!(
                "  {:<8} [{}/{}] {}",
                entry.priority().as_str(),
                entry.member_count,
                team.members.len(),
                entry.record.code
            );
        }
        println!();
    }

    if !team.stats.is_empty() {
        println!("Stats");
        for row in &team.stats {
            let values: Vec<String> = row
                .values
                .iter()
                .map(|(member, value)| format!("{member}={value}"))
                .collect();
            println!("  {:<26} {}", row.label, values.join(", "));
        }
        println!();
    }
}
