// Colored terminal output for matrices, explanations, feeds and profiles.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::db::models::{CommentView, PostView, Profile, VisibilityCount};
use crate::explain::Explanation;
use crate::policy::{ApplicationCase, ContentType, FilteringAction, Strategy, Visibility};

/// Short colored label for a matrix cell.
fn colorize_action(action: Option<FilteringAction>) -> colored::ColoredString {
    match action {
        None => "show".green(),
        Some(FilteringAction::ReplaceWithPlaceholder) => "mask".yellow(),
        Some(FilteringAction::HideContent) => "hide".red().bold(),
    }
}

fn colorize_visibility(visibility: Visibility) -> colored::ColoredString {
    match visibility {
        Visibility::Normal => visibility.as_str().normal(),
        Visibility::Hidden => visibility.as_str().yellow(),
        Visibility::Illegal => visibility.as_str().red().bold(),
    }
}

/// Print the decision grid of one case: one block per visibility, judged
/// types as rows and displayed types as columns.
pub fn display_case_matrix(case: ApplicationCase) {
    println!("\n{}", format!("=== {case} ===").bold());

    for visibility in Visibility::ALL {
        let strategy = Strategy::select(case, visibility);
        println!(
            "\n  {} {}",
            colorize_visibility(visibility),
            format!("({})", strategy.name()).dimmed()
        );
        print!("  {:<14}", "judged/shown".dimmed());
        for displayed in ContentType::ALL {
            print!(" {:>8}", displayed.as_str().dimmed());
        }
        println!();
        for judged in ContentType::ALL {
            print!("  {:<14}", judged.as_str());
            for displayed in ContentType::ALL {
                print!(" {:>8}", colorize_action(strategy.action(judged, displayed)));
            }
            println!();
        }
    }
}

/// Print a decision explanation.
pub fn display_explanation(explanation: &Explanation) {
    let viewer = if explanation.viewer_id.is_empty() {
        "anonymous".to_string()
    } else {
        explanation.viewer_id.clone()
    };
    println!(
        "\n{}",
        format!(
            "=== {} | judged {} | displayed {} | viewer {} ===",
            explanation.case, explanation.judged, explanation.displayed, viewer
        )
        .bold()
    );

    for decision in &explanation.decisions {
        println!(
            "  {:<10} {:<24} {}",
            colorize_visibility(decision.visibility),
            decision.strategy.dimmed(),
            colorize_action(decision.action),
        );
    }

    println!("\n  Replacement order: {}", explanation.replacement_order.join(" > "));

    match &explanation.where_sql {
        Some(sql) => {
            println!("\n  SQL filter:");
            println!("    {sql}");
            for (name, value) in &explanation.sql.params {
                println!("    {} = {}", format!(":{name}").dimmed(), value);
            }
        }
        None => println!("\n  SQL filter: {}", "none".dimmed()),
    }
}

fn profile_line(profile: &Profile) -> String {
    format!(
        "@{} [{}]",
        profile.username,
        colorize_visibility(profile.visibility)
    )
}

/// Print one profile.
pub fn display_profile(profile: &Profile) {
    println!("\n{}", format!("=== {} ===", profile.uid).bold());
    println!("  Username:   {}", profile_line(profile));
    println!("  Image:      {}", profile.img.as_deref().unwrap_or("-"));
    println!(
        "  Biography:  {}",
        super::truncate_chars(profile.biography.as_deref().unwrap_or("-"), 80)
    );
    println!("  Reports:    {}", profile.reports);
}

/// Print a feed of posts with their authors.
pub fn display_feed(posts: &[PostView]) {
    if posts.is_empty() {
        println!("No posts visible.");
        return;
    }

    println!("\n{}", format!("=== Feed ({} posts) ===", posts.len()).bold());
    for (i, view) in posts.iter().enumerate() {
        println!(
            "\n  {:>3}. {} {}",
            i + 1,
            super::truncate_chars(&view.post.title, 60).bold(),
            format!("[{}]", colorize_visibility(view.post.visibility)).dimmed(),
        );
        println!("       by {}", profile_line(&view.author));
        if !view.post.description.is_empty() {
            println!(
                "       {}",
                super::truncate_chars(&view.post.description, 100).dimmed()
            );
        }
        println!("       media: {}", view.post.media.dimmed());
    }
    println!();
}

/// Print the comments under a post.
pub fn display_comments(comments: &[CommentView]) {
    for view in comments {
        println!(
            "       > {}: {}",
            profile_line(&view.author),
            super::truncate_chars(&view.comment.content, 100)
        );
    }
}

/// Print per-table visibility counts.
pub fn display_visibility_counts(counts: &[VisibilityCount]) {
    println!(
        "  {:<10} {:>8} {:>8} {:>8} {:>8}",
        "Table".dimmed(),
        "normal".dimmed(),
        "hidden".dimmed(),
        "illegal".dimmed(),
        "total".dimmed(),
    );
    for count in counts {
        println!(
            "  {:<10} {:>8} {:>8} {:>8} {:>8}",
            count.content_type.table(),
            count.normal,
            count.hidden.to_string().yellow(),
            count.illegal.to_string().red(),
            count.total(),
        );
    }
}
