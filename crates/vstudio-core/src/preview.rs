//! Preview panel content next to the editor tabs.

use vstudio_client::ProjectsApi;
use vstudio_models::format::{format_duration, script_read_seconds};
use vstudio_models::Project;

use crate::editor::{EditorSession, Tab};

const DEFAULT_VOICE: &str = "Alloy";
const DEFAULT_IMAGE_STYLE: &str = "Realistic";
const DEFAULT_RESOLUTION: &str = "1080p";
const DEFAULT_FPS: u32 = 30;

/// What the preview panel shows for the active tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabPreview {
    /// `None` when there is nothing generated yet
    pub heading: Option<&'static str>,
    /// Media URLs to play or display
    pub media: Vec<String>,
    pub lines: Vec<String>,
}

impl TabPreview {
    fn empty(lines: Vec<String>) -> Self {
        Self {
            heading: None,
            media: Vec::new(),
            lines,
        }
    }

    pub fn has_content(&self) -> bool {
        self.heading.is_some()
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

fn rate(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

fn render_hint(project: &Project) -> Vec<String> {
    let fps = if project.fps == 0 { DEFAULT_FPS } else { project.fps };
    vec![
        "Ready to Render".to_string(),
        "Configure your settings and click 'Generate Video' to create your masterpiece."
            .to_string(),
        format!(
            "{}s • {} • {} FPS",
            project.duration,
            or_default(&project.resolution, DEFAULT_RESOLUTION),
            fps
        ),
    ]
}

pub fn preview_for(project: &Project, tab: Tab) -> TabPreview {
    match tab {
        Tab::Script => {
            if !project.has_script() {
                return TabPreview::empty(vec!["Generate a script to see preview...".to_string()]);
            }
            let chars = project.script_text.chars().count();
            TabPreview {
                heading: Some("Script Preview"),
                media: Vec::new(),
                lines: vec![
                    project.script_text.clone(),
                    format!(
                        "{} characters • ~{}",
                        chars,
                        format_duration(script_read_seconds(&project.script_text))
                    ),
                ],
            }
        }
        Tab::Audio => {
            let voice = or_default(&project.voice_id, DEFAULT_VOICE);
            let Some(url) = project.audio_url.clone().filter(|u| !u.is_empty()) else {
                return TabPreview::empty(vec![
                    "No audio generated yet".to_string(),
                    format!("Voice Preview - {}", voice),
                ]);
            };
            TabPreview {
                heading: Some("Audio Preview"),
                media: vec![url],
                lines: vec![
                    format!("Voice: {}", voice),
                    format!(
                        "Speed: {}x • Pitch: {}",
                        rate(project.audio_speed),
                        rate(project.audio_pitch)
                    ),
                ],
            }
        }
        Tab::Images => {
            let urls: Vec<String> = project
                .images
                .iter()
                .filter_map(|scene| scene.url.clone())
                .filter(|url| !url.is_empty())
                .collect();
            if urls.is_empty() {
                return TabPreview::empty(vec!["No images generated".to_string()]);
            }
            TabPreview {
                heading: Some("Images Preview"),
                media: urls,
                lines: vec![format!(
                    "Style: {}",
                    or_default(&project.image_style, DEFAULT_IMAGE_STYLE)
                )],
            }
        }
        Tab::Video => match project.video_url.clone().filter(|u| !u.is_empty()) {
            Some(url) => TabPreview {
                heading: Some("Video Preview"),
                media: vec![url],
                lines: Vec::new(),
            },
            None => TabPreview::empty(render_hint(project)),
        },
    }
}

impl<A: ProjectsApi> EditorSession<A> {
    /// Preview of the current draft for the active tab.
    pub fn preview(&self) -> TabPreview {
        preview_for(&self.snapshot(), self.active_tab())
    }
}
