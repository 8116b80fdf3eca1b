//! Option tables offered by the editor forms.

use crate::status::ProjectStatus;

/// A selectable option: wire value plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub id: &'static str,
    pub label: &'static str,
}

const fn choice(id: &'static str, label: &'static str) -> Choice {
    Choice { id, label }
}

/// A text-to-speech voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const VOICES: &[Voice] = &[
    Voice { id: "alloy", label: "Alloy", description: "Neutral" },
    Voice { id: "echo", label: "Echo", description: "Male, clear" },
    Voice { id: "fable", label: "Fable", description: "British, warm" },
    Voice { id: "onyx", label: "Onyx", description: "Deep, authoritative" },
    Voice { id: "nova", label: "Nova", description: "Female, friendly" },
    Voice { id: "shimmer", label: "Shimmer", description: "Soft, gentle" },
];

pub const LANGUAGES: &[Choice] = &[
    choice("en", "English"),
    choice("fr", "French"),
    choice("es", "Spanish"),
    choice("de", "German"),
    choice("it", "Italian"),
    choice("pt", "Portuguese"),
];

pub const USE_CASES: &[Choice] = &[
    choice("storytelling", "Storytelling"),
    choice("youtube_short", "YouTube Short"),
    choice("explanation", "Explanation"),
    choice("commercial", "Commercial"),
    choice("inspirational", "Inspirational"),
    choice("educational", "Educational"),
    choice("tutorial", "Tutorial"),
];

pub const SCRIPT_STYLES: &[Choice] = &[
    choice("educational", "Educational"),
    choice("inspirational", "Inspirational"),
    choice("comedic", "Comedic"),
    choice("dramatic", "Dramatic"),
    choice("casual", "Casual"),
    choice("professional", "Professional"),
];

pub const IMAGE_STYLES: &[Choice] = &[
    choice("realistic", "Realistic"),
    choice("pixar", "Pixar / 3D"),
    choice("anime", "Anime"),
    choice("flat_design", "Flat Design"),
    choice("watercolor", "Watercolor"),
    choice("oil_painting", "Oil Painting"),
    choice("sketch", "Sketch"),
];

pub const RESOLUTIONS: &[Choice] = &[
    choice("720p", "720p (HD)"),
    choice("1080p", "1080p (Full HD)"),
    choice("1440p", "1440p (2K)"),
    choice("2160p", "2160p (4K)"),
];

pub const FPS_OPTIONS: &[u32] = &[24, 30, 60];

pub const MOTION_TEMPLATES: &[Choice] = &[
    choice("basic_fade", "Basic Fade"),
    choice("slide_left", "Slide Left"),
    choice("slide_right", "Slide Right"),
    choice("zoom_in", "Zoom In"),
    choice("zoom_out", "Zoom Out"),
    choice("ken_burns", "Ken Burns Effect"),
];

pub const BACKGROUND_MUSIC: &[Choice] = &[
    choice("none", "None"),
    choice("soft", "Soft"),
    choice("upbeat", "Upbeat"),
    choice("cinematic", "Cinematic"),
    choice("corporate", "Corporate"),
    choice("ambient", "Ambient"),
];

pub const PRIVACY_OPTIONS: &[Choice] = &[
    choice("public", "Public - Anyone can find and watch"),
    choice("unlisted", "Unlisted - Only people with the link can watch"),
    choice("private", "Private - Only you can watch"),
];

/// Audio speed and pitch slider bounds.
pub const AUDIO_RATE_RANGE: (f64, f64) = (0.7, 1.3);

/// Statuses offered by the listing filter, after "All Status".
pub const LISTING_STATUS_FILTERS: [ProjectStatus; 5] = [
    ProjectStatus::Draft,
    ProjectStatus::ScriptGenerated,
    ProjectStatus::AudioReady,
    ProjectStatus::ImagesReady,
    ProjectStatus::VideoReady,
];

/// Label for a choice id, falling back to the id itself.
pub fn label_for(choices: &[Choice], id: &str) -> String {
    choices
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.label.to_string())
        .unwrap_or_else(|| id.to_string())
}

pub fn voice(id: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.id == id)
}
