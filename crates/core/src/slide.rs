//! Slides: one full-screen section of a page, owning a forest of elements.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::element::Element;

/// Background used when a slide does not set one.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Animation duration used when a slide does not set one.
pub const DEFAULT_TRANSITION_DURATION: &str = "0.8s";

/// Name given to stored slides that lost theirs.
pub const UNTITLED_SLIDE: &str = "Untitled Slide";

/// Entrance animation applied to a slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    #[default]
    None,
    Fade,
    SlideLeft,
    SlideRight,
    Zoom,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::None => "none",
            Transition::Fade => "fade",
            Transition::SlideLeft => "slide-left",
            Transition::SlideRight => "slide-right",
            Transition::Zoom => "zoom",
        }
    }

    /// Parse a stored transition name; anything unrecognised is `None`.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "fade" => Transition::Fade,
            "slide-left" => Transition::SlideLeft,
            "slide-right" => Transition::SlideRight,
            "zoom" => Transition::Zoom,
            _ => Transition::None,
        }
    }
}

fn lenient_transition<'de, D>(deserializer: D) -> Result<Transition, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .map(Transition::parse_lenient)
        .unwrap_or_default())
}

fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn untitled() -> String {
    UNTITLED_SLIDE.to_string()
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn default_duration() -> String {
    DEFAULT_TRANSITION_DURATION.to_string()
}

/// One slide of a page.
///
/// Stored slides written by older editors may lack `id`, `name`,
/// `background` or `elements`; those are filled in on read. A missing id
/// reads as empty and is replaced by [`assign_missing_ids`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    #[serde(default)]
    pub id: String,
    #[serde(default = "untitled")]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default, deserialize_with = "lenient_transition")]
    pub transition: Transition,
    #[serde(default = "default_duration")]
    pub transition_duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl Slide {
    /// A new empty slide with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            name: name.into(),
            elements: Vec::new(),
            background: default_background(),
            transition: Transition::None,
            transition_duration: default_duration(),
            script: None,
        }
    }
}

/// A single slide-level property edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SlideField {
    Name(String),
    Background(String),
    Transition(Transition),
    TransitionDuration(String),
    Script(Option<String>),
}

impl SlideField {
    /// Replace the corresponding field on `slide`.
    pub fn apply_to(self, slide: &mut Slide) {
        match self {
            SlideField::Name(name) => slide.name = name,
            SlideField::Background(background) => slide.background = background,
            SlideField::Transition(transition) => slide.transition = transition,
            SlideField::TransitionDuration(duration) => slide.transition_duration = duration,
            SlideField::Script(script) => {
                slide.script = script.filter(|s| !s.trim().is_empty());
            }
        }
    }
}

/// Parse a stored content blob into slides.
///
/// Content that does not have the expected shape yields an error; callers
/// serving pages degrade that to an empty slide list.
pub fn parse_slides(content: &serde_json::Value) -> Result<Vec<Slide>, serde_json::Error> {
    let mut slides = match content {
        serde_json::Value::Null => Vec::new(),
        other => Vec::<Slide>::deserialize(other)?,
    };
    assign_missing_ids(&mut slides);
    Ok(slides)
}

/// Give every slide without an id one derived from its position,
/// `slide-<n>` (1-based), skipping ids already in use.
///
/// The same content always gets the same ids, so clients can keep
/// addressing slides of content saved before ids existed.
pub fn assign_missing_ids(slides: &mut [Slide]) {
    if slides.iter().all(|s| !s.id.is_empty()) {
        return;
    }
    let mut taken: HashSet<String> = slides
        .iter()
        .filter(|s| !s.id.is_empty())
        .map(|s| s.id.clone())
        .collect();

    for (i, slide) in slides.iter_mut().enumerate() {
        if !slide.id.is_empty() {
            continue;
        }
        let base = format!("slide-{}", i + 1);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while taken.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        slide.id = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_are_filled_in() {
        let slide = parse_slides(&json!([{}])).unwrap().remove(0);
        assert_eq!(slide.id, "slide-1");
        assert_eq!(slide.name, UNTITLED_SLIDE);
        assert_eq!(slide.background, DEFAULT_BACKGROUND);
        assert_eq!(slide.transition, Transition::None);
        assert_eq!(slide.transition_duration, DEFAULT_TRANSITION_DURATION);
        assert!(slide.elements.is_empty());
        assert!(slide.script.is_none());
    }

    #[test]
    fn unknown_transition_reads_as_none() {
        let slide: Slide =
            serde_json::from_value(json!({ "id": "s", "transition": "spin" })).unwrap();
        assert_eq!(slide.transition, Transition::None);

        let slide: Slide =
            serde_json::from_value(json!({ "id": "s", "transition": null })).unwrap();
        assert_eq!(slide.transition, Transition::None);
    }

    #[test]
    fn transition_names_are_kebab_case() {
        let slide: Slide =
            serde_json::from_value(json!({ "id": "s", "transition": "slide-left" })).unwrap();
        assert_eq!(slide.transition, Transition::SlideLeft);
        let written = serde_json::to_value(&slide).unwrap();
        assert_eq!(written["transition"], "slide-left");
        assert_eq!(written["transitionDuration"], "0.8s");
    }

    #[test]
    fn slide_round_trips_with_nested_children() {
        let raw = json!({
            "id": "s1",
            "name": "Cover",
            "background": "#fafafa",
            "transition": "zoom",
            "transitionDuration": "1.2s",
            "script": "console.log(1)",
            "elements": [{
                "id": "box", "type": "container", "props": { "layout": "grid" },
                "children": [{ "id": "t", "type": "text", "props": { "content": "Hi" } }]
            }]
        });
        let slide: Slide = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&slide).unwrap(), raw);
    }

    #[test]
    fn missing_slide_ids_are_stable_across_reads() {
        let stored = json!([{ "name": "A" }, { "id": "slide-2", "name": "B" }, { "name": "C" }]);
        let first = parse_slides(&stored).unwrap();
        let second = parse_slides(&stored).unwrap();

        let ids: Vec<_> = first.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["slide-1", "slide-2", "slide-3"]);
        assert_eq!(first, second);
    }

    #[test]
    fn derived_id_skips_one_already_taken() {
        let stored = json!([{ "id": "slide-2" }, { "name": "no id" }]);
        let slides = parse_slides(&stored).unwrap();
        assert_eq!(slides[0].id, "slide-2");
        assert_eq!(slides[1].id, "slide-2-2");
    }

    #[test]
    fn parse_slides_accepts_null_as_empty() {
        assert!(parse_slides(&serde_json::Value::Null).unwrap().is_empty());
    }

    #[test]
    fn parse_slides_rejects_wrong_shape() {
        assert!(parse_slides(&json!({ "not": "an array" })).is_err());
        assert!(parse_slides(&json!([{ "elements": "nope" }])).is_err());
    }

    #[test]
    fn slide_field_replaces_one_field() {
        let mut slide = Slide::new("One");
        SlideField::Background("#000".into()).apply_to(&mut slide);
        SlideField::Transition(Transition::Fade).apply_to(&mut slide);
        assert_eq!(slide.background, "#000");
        assert_eq!(slide.transition, Transition::Fade);
        assert_eq!(slide.name, "One");
    }

    #[test]
    fn blank_script_clears_the_field() {
        let mut slide = Slide::new("One");
        SlideField::Script(Some("alert(1)".into())).apply_to(&mut slide);
        assert!(slide.script.is_some());
        SlideField::Script(Some("   ".into())).apply_to(&mut slide);
        assert!(slide.script.is_none());
    }

    #[test]
    fn slide_field_wire_format() {
        let field: SlideField =
            serde_json::from_value(json!({ "field": "transitionDuration", "value": "2s" }))
                .unwrap();
        assert_eq!(field, SlideField::TransitionDuration("2s".into()));
    }
}
