use alfred_core::{Feedback, Item};
use code_quarkus_core::{EncodeOptions, ExtensionEntry, ProjectDescriptor, Stream, encode_project};

const NO_RESULTS_TITLE: &str = "No extensions found";
const NO_RESULTS_SUBTITLE: &str = "Try a different search query";
const ERROR_TITLE: &str = "Extension search failed";
const NO_STREAMS_TITLE: &str = "No platform streams available";
const NO_STREAMS_SUBTITLE: &str = "The backend returned an empty stream list";
const SELECTED_MARK: &str = "✓ ";
const SUBTITLE_MAX_CHARS: usize = 120;

pub const EXTENSION_ID_VARIABLE: &str = "extension_id";
pub const STREAM_VARIABLE: &str = "stream";

/// One item per ranked entry. Each `arg` is the project query with that
/// entry toggled, so feeding it back as `--selection` applies the click.
pub fn extensions_to_feedback(
    entries: &[&ExtensionEntry],
    project: &ProjectDescriptor,
) -> Feedback {
    if entries.is_empty() {
        return no_results_feedback();
    }

    let defaults = ProjectDescriptor::default();
    let items = entries
        .iter()
        .map(|entry| extension_to_item(entry, project, &defaults))
        .collect();
    Feedback::new(items)
}

/// One item per stream; `arg` is the key to put in `CODE_QUARKUS_STREAM`.
/// `current` is the key already configured, if any.
pub fn streams_to_feedback(streams: &[Stream], current: Option<&str>) -> Feedback {
    if streams.is_empty() {
        return Feedback::new(vec![
            Item::new(NO_STREAMS_TITLE)
                .with_subtitle(NO_STREAMS_SUBTITLE)
                .with_valid(false),
        ]);
    }

    let items = streams
        .iter()
        .map(|stream| {
            let mut title = String::new();
            if current == Some(stream.key.as_str()) {
                title.push_str(SELECTED_MARK);
            }
            title.push_str(&stream.key);
            if stream.recommended {
                title.push_str(" (recommended)");
            }

            let subtitle = if stream.quarkus_core_version.is_empty() {
                "Quarkus core version unknown".to_string()
            } else {
                format!("Quarkus core {}", stream.quarkus_core_version)
            };

            Item::new(title)
                .with_subtitle(subtitle)
                .with_arg(stream.key.as_str())
                .with_variable(STREAM_VARIABLE, stream.key.as_str())
        })
        .collect();
    Feedback::new(items)
}

pub fn error_feedback(message: &str) -> Feedback {
    Feedback::new(vec![
        Item::new(ERROR_TITLE)
            .with_subtitle(single_line_subtitle(message, SUBTITLE_MAX_CHARS))
            .with_valid(false),
    ])
}

fn extension_to_item(
    entry: &ExtensionEntry,
    project: &ProjectDescriptor,
    defaults: &ProjectDescriptor,
) -> Item {
    let mut title = String::new();
    if project.is_selected(&entry.id) {
        title.push_str(SELECTED_MARK);
    }
    title.push_str(entry.name.trim());
    for tag in &entry.tags {
        title.push_str(&format!(" [{tag}]"));
    }
    if entry.default {
        title.push_str(" (default)");
    }

    let subtitle = if entry.description.trim().is_empty() {
        entry.id.clone()
    } else {
        single_line_subtitle(&entry.description, SUBTITLE_MAX_CHARS)
    };

    let mut toggled = project.clone();
    toggled.github = None;
    toggled.toggle_extension(entry);
    let arg = encode_project(
        &toggled,
        defaults,
        EncodeOptions::default().with_show_defaults(false),
    );

    let autocomplete = entry.short_name.as_deref().unwrap_or(&entry.name);

    Item::new(title)
        .with_subtitle(subtitle)
        .with_arg(arg)
        .with_autocomplete(autocomplete)
        .with_variable(EXTENSION_ID_VARIABLE, entry.id.as_str())
}

fn no_results_feedback() -> Feedback {
    Feedback::new(vec![
        Item::new(NO_RESULTS_TITLE)
            .with_subtitle(NO_RESULTS_SUBTITLE)
            .with_valid(false),
    ])
}

fn single_line_subtitle(input: &str, max_chars: usize) -> String {
    let compact = input.split_whitespace().collect::<Vec<_>>().join(" ");

    if compact.chars().count() <= max_chars {
        return compact;
    }

    let truncated: String = compact.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{truncated}...")
}
