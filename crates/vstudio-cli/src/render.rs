//! Plain-text views printed by the commands.

use std::fmt::Write;

use vstudio_core::listing::EMPTY_LISTING_MESSAGE;
use vstudio_core::shell::{
    NavItem, APP_NAME, NAV_ITEMS, NEW_PROJECT_LINK, PRO_PLAN, SETTINGS_SECTIONS,
    SETTINGS_SUBTITLE,
};
use vstudio_core::{connection::channel_summary, Availability, EditorHeader, ProjectCard, TabPreview};
use vstudio_models::format::{format_date, format_date_time};
use vstudio_models::{ChannelInfo, UploadInfo};

pub fn cards(cards: &[ProjectCard]) -> String {
    if cards.is_empty() {
        return format!("{}\n", EMPTY_LISTING_MESSAGE);
    }
    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "{}  [{}]  {}", card.id, card.status_label, card.title);
        if let Some(description) = &card.description {
            let _ = writeln!(out, "    {}", description);
        }
        let mut meta = vec![card.updated.clone()];
        if let Some(duration) = &card.duration {
            meta.push(duration.clone());
        }
        if card.can_preview {
            meta.push("preview available".to_string());
        }
        let _ = writeln!(out, "    {}", meta.join(" • "));
        for line in &card.publication {
            let _ = writeln!(out, "    {}", line);
        }
    }
    out
}

pub fn editor(
    header: &EditorHeader,
    controls: &[(&'static str, Availability)],
    errors: &[(String, String)],
    preview: &TabPreview,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", header.title, header.status_label);
    if let Some(last_saved) = &header.last_saved {
        let _ = writeln!(out, "{}", last_saved);
    }
    out.push('\n');

    for (name, availability) in controls {
        let state = match availability {
            Availability::Enabled => "ready".to_string(),
            Availability::Busy => "running".to_string(),
            Availability::Blocked(reason) => format!("blocked: {}", reason),
        };
        let _ = writeln!(out, "  {:<22} {}", name, state);
    }
    for (op, message) in errors {
        let _ = writeln!(out, "  ! {}: {}", op, message);
    }
    out.push('\n');

    if let Some(heading) = preview.heading {
        let _ = writeln!(out, "{}", heading);
    }
    for url in &preview.media {
        let _ = writeln!(out, "  {}", url);
    }
    for line in &preview.lines {
        let _ = writeln!(out, "{}", line);
    }
    out
}

pub fn channel(channel: &ChannelInfo) -> String {
    channel_summary(channel).join("\n") + "\n"
}

pub fn upload(info: &UploadInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "YouTube video: {}", info.youtube_video_id);
    if let Some(url) = &info.youtube_url {
        let _ = writeln!(out, "URL: {}", url);
    }
    if info.uploaded_at.is_some() {
        let _ = writeln!(out, "Uploaded: {}", format_date(info.uploaded_at.as_deref()));
    }
    if info.is_scheduled() {
        let _ = writeln!(
            out,
            "Publication: {}{}",
            format_date_time(info.scheduled_publish_at.as_deref()),
            if info.is_premiere { " (premiere)" } else { "" }
        );
    }
    out
}

fn nav_line(item: &NavItem, current_path: &str) -> String {
    let marker = if item.is_active(current_path) { ">" } else { " " };
    format!("{} {:<10} {}", marker, item.label, item.path)
}

pub fn sidebar(current_path: &str) -> String {
    let mut out = format!("{}\n", APP_NAME);
    for item in &NAV_ITEMS {
        let _ = writeln!(out, "{}", nav_line(item, current_path));
    }
    let _ = writeln!(out, "  + {} ({})", NEW_PROJECT_LINK.label, NEW_PROJECT_LINK.path);
    out
}

pub fn settings() -> String {
    let mut out = format!("Settings\n{}\n\n", SETTINGS_SUBTITLE);
    for section in &SETTINGS_SECTIONS {
        let _ = writeln!(out, "{}\n  {}", section.title, section.description);
    }
    out
}

pub fn pro_plan() -> String {
    let mut out = format!(
        "{}\n{}\n\n{}\n{}\n\n",
        PRO_PLAN.name, PRO_PLAN.tagline, PRO_PLAN.monthly_price, PRO_PLAN.yearly_offer
    );
    for feature in PRO_PLAN.features {
        let _ = writeln!(out, "  ✓ {}", feature);
    }
    out
}
