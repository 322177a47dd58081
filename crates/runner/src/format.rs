//! Chat message formatting for detected entities.

use watch::{Detection, Entity, OrgName, Release, Repository, Tag};

/// Release notes longer than this many characters are cut and suffixed with
/// `...`.
pub const NOTES_LIMIT: usize = 500;

const NOT_AVAILABLE: &str = "N/A";

/// Builds the message announcing `detection`.
pub fn format_detection(org: &OrgName, detection: &Detection) -> watch::Message {
    match &detection.entity {
        Entity::Repository(repo) => format_repository(repo),
        Entity::Release(release) => format_release(org, release, detection.highlighted),
        Entity::Tag(tag) => format_tag(org, tag, detection.highlighted),
    }
}

fn format_repository(repo: &Repository) -> watch::Message {
    let title = format!("🆕 New Repository: {}", repo.name);
    let body = [
        format!("Repository: {}", repo.full_name),
        format!("Description: {}", or_na(repo.description.as_deref())),
        format!("URL: {}", repo.html_url),
        format!("Created: {}", repo.created_at),
        format!("Language: {}", or_na(repo.language.as_deref())),
    ]
    .join("\n");
    watch::Message::new(title, body)
}

fn format_release(org: &OrgName, release: &Release, highlighted: bool) -> watch::Message {
    let tag = &release.tag;
    let title = if highlighted {
        format!("🚀 Special Release Alert - {tag} 🚀")
    } else {
        format!("📦 New Release: {} {tag}", release.repo)
    };

    let release_name = release
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(tag.as_str());
    let published = release
        .published_at
        .map(|t| t.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut body = [
        format!("Repository: {org}/{}", release.repo),
        format!("Release: {release_name}"),
        format!("Tag: {tag}"),
        format!("URL: {}", release.html_url),
        format!("Published: {published}"),
    ]
    .join("\n");

    if let Some(notes) = release.notes.as_deref().filter(|n| !n.is_empty()) {
        body.push_str("\n\nRelease Notes:\n");
        body.push_str(&truncate_notes(notes));
    }

    watch::Message::new(title, body)
}

fn format_tag(org: &OrgName, tag: &Tag, highlighted: bool) -> watch::Message {
    let title = if highlighted {
        format!("🏷️ Special Tag: {}", tag.name)
    } else {
        format!("🏷️ New Tag: {} {}", tag.repo, tag.name)
    };
    let body = [
        format!("Repository: {org}/{}", tag.repo),
        format!("Tag: {}", tag.name),
        format!("Commit: {}", short_sha(&tag.commit_sha)),
        format!("URL: {}", tag.commit_url),
    ]
    .join("\n");
    watch::Message::new(title, body)
}

/// Cuts `notes` to [`NOTES_LIMIT`] characters, appending `...` if anything was
/// removed.
pub fn truncate_notes(notes: &str) -> String {
    match notes.char_indices().nth(NOTES_LIMIT) {
        Some((cut, _)) => format!("{}...", &notes[..cut]),
        None => notes.to_string(),
    }
}

fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(7) {
        Some((cut, _)) => &sha[..cut],
        None => sha,
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}
