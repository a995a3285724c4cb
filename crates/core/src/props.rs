//! Typed views over element property bags.
//!
//! Property bags are free-form JSON maps written by the editor. Before
//! rendering, each bag is decoded once into a [`BoxStyle`] (the wrapper
//! styling every element shares) and an [`ElementView`] (the fields its
//! type actually uses). Decoding never fails: wrong-typed or missing values
//! fall back to the type's defaults.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::element::{Element, ElementType, Props};

// ---------------------------------------------------------------------------
// Lenient readers
// ---------------------------------------------------------------------------

/// Read a prop as display text. Empty strings, `null`, booleans and
/// containers read as absent; numbers read as their decimal form.
pub fn prop_text(props: &Props, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a prop with a fallback.
pub fn prop_text_or(props: &Props, key: &str, default: &str) -> String {
    prop_text(props, key).unwrap_or_else(|| default.to_string())
}

/// JavaScript-style truthiness of a prop.
pub fn prop_truthy(props: &Props, key: &str) -> bool {
    match props.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Shared wrapper style
// ---------------------------------------------------------------------------

/// Wrapper styling shared by every element type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxStyle {
    pub align: Option<String>,
    pub padding_x: Option<String>,
    pub padding_y: Option<String>,
    pub margin_top: Option<String>,
    pub margin_bottom: Option<String>,
    pub background_color: Option<String>,
    pub border_radius: Option<String>,
    pub font_family: Option<String>,
    pub width: String,
    pub height: String,
    pub background_image: Option<String>,
    pub background_size: Option<String>,
    pub background_position: Option<String>,
    pub background_repeat: Option<String>,
    pub overlay_color: Option<String>,
}

impl BoxStyle {
    pub fn from_props(props: &Props) -> Self {
        Self {
            align: prop_text(props, "align"),
            padding_x: prop_text(props, "paddingX"),
            padding_y: prop_text(props, "paddingY"),
            margin_top: prop_text(props, "marginTop"),
            margin_bottom: prop_text(props, "marginBottom"),
            background_color: prop_text(props, "backgroundColor"),
            border_radius: prop_text(props, "borderRadius"),
            font_family: prop_text(props, "fontFamily"),
            width: prop_text_or(props, "width", "100%"),
            height: prop_text_or(props, "height", "auto"),
            background_image: prop_text(props, "backgroundImage"),
            background_size: prop_text(props, "backgroundSize"),
            background_position: prop_text(props, "backgroundPosition"),
            background_repeat: prop_text(props, "backgroundRepeat"),
            overlay_color: prop_text(props, "overlayColor"),
        }
    }

    /// CSS declarations for the wrapper, in a stable order.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut push = |name: &'static str, value: &Option<String>| {
            if let Some(v) = value {
                out.push((name, v.clone()));
            }
        };
        push("text-align", &self.align);
        push("padding-top", &self.padding_y);
        push("padding-bottom", &self.padding_y);
        push("padding-left", &self.padding_x);
        push("padding-right", &self.padding_x);
        push("margin-top", &self.margin_top);
        push("margin-bottom", &self.margin_bottom);
        push("background-color", &self.background_color);
        push("border-radius", &self.border_radius);
        push("font-family", &self.font_family);
        push("width", &Some(self.width.clone()));
        push("height", &Some(self.height.clone()));
        push(
            "background-image",
            &self.background_image.as_ref().map(|url| format!("url({url})")),
        );
        push("background-size", &self.background_size);
        push("background-position", &self.background_position);
        push("background-repeat", &self.background_repeat);
        out
    }
}

// ---------------------------------------------------------------------------
// Per-type views
// ---------------------------------------------------------------------------

/// Horizontal placement for images and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

impl Align {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("center") => Align::Center,
            Some("right") => Align::End,
            _ => Align::Start,
        }
    }

    pub fn justify_content(self) -> &'static str {
        match self {
            Align::Start => "flex-start",
            Align::Center => "center",
            Align::End => "flex-end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pub content: String,
    pub font_size: Option<String>,
    pub color: Option<String>,
    pub font_weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub width: Option<String>,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub text: String,
    pub link: String,
    pub variant: String,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DividerView {
    pub color: Option<String>,
    pub width: Option<String>,
    pub style: Option<String>,
    pub thickness: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountdownView {
    pub target_date: String,
    pub color: Option<String>,
    pub bg_color: Option<String>,
}

impl CountdownView {
    /// The target as a naive date-time. A bare date means midnight.
    pub fn target(&self) -> Option<NaiveDateTime> {
        let raw = self.target_date.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| chrono::DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc()))
            .or_else(|_| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
            })
            .ok()
    }

    /// The target date as `dd/mm/yyyy`, or the raw value if it does not
    /// parse as a date.
    pub fn formatted_date(&self) -> String {
        match self.target() {
            Some(target) => target.format("%d/%m/%Y").to_string(),
            None => self.target_date.trim().to_string(),
        }
    }

    /// Time left until the target as seen at `now`. Zero once it has
    /// passed; `None` if the target does not parse.
    pub fn remaining(&self, now: NaiveDateTime) -> Option<Remaining> {
        let left = (self.target()? - now).num_seconds().max(0);
        Some(Remaining {
            days: left / 86_400,
            hours: left % 86_400 / 3_600,
            minutes: left % 3_600 / 60,
            seconds: left % 60,
        })
    }
}

/// A countdown split into display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Title and description shared by the RSVP and guestbook blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct FormBlockView {
    pub title: String,
    pub description: String,
}

/// Layout of a container's children.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerLayout {
    Grid {
        columns: u32,
        gap: String,
    },
    Flex {
        direction: &'static str,
        gap: String,
        justify_content: String,
        align_items: String,
        flex_wrap: String,
    },
}

impl ContainerLayout {
    pub fn from_props(props: &Props) -> Self {
        let gap = prop_text_or(props, "gap", "16px");
        if prop_text(props, "layout").as_deref() == Some("grid") {
            let columns = prop_text(props, "columns")
                .and_then(|c| c.parse::<u32>().ok())
                .filter(|&c| c > 0)
                .unwrap_or(2);
            return ContainerLayout::Grid { columns, gap };
        }

        let direction = match prop_text(props, "layout").as_deref() {
            Some("vertical") => "column",
            _ => "row",
        };
        let justify_content = prop_text(props, "justifyContent")
            .or_else(|| prop_text(props, "justify"))
            .unwrap_or_else(|| "flex-start".into());
        let align_items = prop_text(props, "alignItems")
            .or_else(|| prop_text(props, "align"))
            .unwrap_or_else(|| "flex-start".into());
        let flex_wrap = prop_text(props, "flexWrap").unwrap_or_else(|| {
            if prop_truthy(props, "wrap") {
                "wrap".into()
            } else {
                "nowrap".into()
            }
        });
        ContainerLayout::Flex {
            direction,
            gap,
            justify_content,
            align_items,
            flex_wrap,
        }
    }

    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        match self {
            ContainerLayout::Grid { columns, gap } => vec![
                ("display", "grid".into()),
                ("grid-template-columns", format!("repeat({columns}, 1fr)")),
                ("gap", gap.clone()),
            ],
            ContainerLayout::Flex {
                direction,
                gap,
                justify_content,
                align_items,
                flex_wrap,
            } => vec![
                ("display", "flex".into()),
                ("flex-direction", (*direction).into()),
                ("gap", gap.clone()),
                ("justify-content", justify_content.clone()),
                ("align-items", align_items.clone()),
                ("flex-wrap", flex_wrap.clone()),
            ],
        }
    }
}

/// The decoded, typed form of one element's props.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementView {
    Text(TextView),
    Image(ImageView),
    Button(ButtonView),
    Video { url: String, height: Option<String> },
    Map { keyword: String, height: Option<String> },
    Divider(DividerView),
    Spacer { height: Option<String> },
    Countdown(CountdownView),
    Rsvp(FormBlockView),
    Guestbook(FormBlockView),
    Gallery { images: Vec<String> },
    Container(ContainerLayout),
    Unknown,
}

impl ElementView {
    pub fn decode(element: &Element) -> Self {
        let p = &element.props;
        match &element.kind {
            ElementType::Text => ElementView::Text(TextView {
                content: prop_text_or(p, "content", ""),
                font_size: prop_text(p, "fontSize"),
                color: prop_text(p, "color"),
                font_weight: prop_text(p, "fontWeight"),
            }),
            ElementType::Image => ElementView::Image(ImageView {
                src: prop_text_or(p, "src", ""),
                alt: prop_text_or(p, "alt", "Element"),
                width: prop_text(p, "width"),
                align: Align::parse(prop_text(p, "align").as_deref()),
            }),
            ElementType::Button => ElementView::Button(ButtonView {
                text: prop_text_or(p, "text", ""),
                link: prop_text_or(p, "link", "#"),
                variant: prop_text_or(p, "variant", "default"),
                align: Align::parse(prop_text(p, "align").as_deref()),
            }),
            ElementType::Video => ElementView::Video {
                url: prop_text_or(p, "url", ""),
                height: prop_text(p, "height"),
            },
            ElementType::Map => ElementView::Map {
                keyword: prop_text_or(p, "keyword", ""),
                height: prop_text(p, "height"),
            },
            ElementType::Divider => ElementView::Divider(DividerView {
                color: prop_text(p, "color"),
                width: prop_text(p, "width"),
                style: prop_text(p, "style"),
                thickness: prop_text(p, "thickness"),
            }),
            ElementType::Spacer => ElementView::Spacer {
                height: prop_text(p, "height"),
            },
            ElementType::Countdown => ElementView::Countdown(CountdownView {
                target_date: prop_text_or(p, "targetDate", ""),
                color: prop_text(p, "color"),
                bg_color: prop_text(p, "bgColor"),
            }),
            ElementType::Rsvp => ElementView::Rsvp(FormBlockView {
                title: prop_text_or(p, "title", "RSVP"),
                description: prop_text_or(p, "description", ""),
            }),
            ElementType::Guestbook => ElementView::Guestbook(FormBlockView {
                title: prop_text_or(p, "title", "Guestbook"),
                description: prop_text_or(p, "description", ""),
            }),
            ElementType::Gallery => ElementView::Gallery {
                images: gallery_urls(&prop_text_or(p, "images", "")),
            },
            ElementType::Container => ElementView::Container(ContainerLayout::from_props(p)),
            ElementType::Unknown(_) => ElementView::Unknown,
        }
    }
}

/// Split a newline-separated URL list, dropping blank lines.
pub fn gallery_urls(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("props must be an object"),
        }
    }

    #[test]
    fn prop_text_is_lenient() {
        let p = props(json!({ "a": "x", "b": "", "c": 12, "d": true, "e": null }));
        assert_eq!(prop_text(&p, "a").as_deref(), Some("x"));
        assert_eq!(prop_text(&p, "b"), None);
        assert_eq!(prop_text(&p, "c").as_deref(), Some("12"));
        assert_eq!(prop_text(&p, "d"), None);
        assert_eq!(prop_text(&p, "e"), None);
        assert_eq!(prop_text(&p, "missing"), None);
    }

    #[test]
    fn box_style_defaults_width_and_height() {
        let style = BoxStyle::from_props(&Props::new());
        assert_eq!(style.width, "100%");
        assert_eq!(style.height, "auto");
        let decls = style.declarations();
        assert_eq!(
            decls,
            vec![("width", "100%".to_string()), ("height", "auto".to_string())]
        );
    }

    #[test]
    fn box_style_padding_expands_to_sides() {
        let style = BoxStyle::from_props(&props(json!({
            "paddingX": "8px",
            "paddingY": "4px",
            "backgroundImage": "/uploads/bg.png"
        })));
        let decls = style.declarations();
        assert!(decls.contains(&("padding-left", "8px".into())));
        assert!(decls.contains(&("padding-bottom", "4px".into())));
        assert!(decls.contains(&("background-image", "url(/uploads/bg.png)".into())));
    }

    #[test]
    fn grid_layout_defaults() {
        let layout = ContainerLayout::from_props(&props(json!({ "layout": "grid" })));
        assert_eq!(
            layout,
            ContainerLayout::Grid {
                columns: 2,
                gap: "16px".into()
            }
        );
        let layout = ContainerLayout::from_props(&props(json!({ "layout": "grid", "columns": "3" })));
        assert!(matches!(layout, ContainerLayout::Grid { columns: 3, .. }));
    }

    #[test]
    fn flex_layout_fallback_chain() {
        let layout = ContainerLayout::from_props(&props(json!({
            "layout": "vertical",
            "justify": "center",
            "align": "flex-end",
            "wrap": true
        })));
        assert_eq!(
            layout,
            ContainerLayout::Flex {
                direction: "column",
                gap: "16px".into(),
                justify_content: "center".into(),
                align_items: "flex-end".into(),
                flex_wrap: "wrap".into(),
            }
        );

        let layout = ContainerLayout::from_props(&Props::new());
        assert!(matches!(
            layout,
            ContainerLayout::Flex { direction: "row", ref flex_wrap, .. } if flex_wrap == "nowrap"
        ));
    }

    #[test]
    fn gallery_drops_blank_lines() {
        assert_eq!(gallery_urls("a\n\n  \nb\n"), vec!["a", "b"]);
        assert!(gallery_urls("").is_empty());
    }

    #[test]
    fn countdown_date_formats() {
        let view = |d: &str| CountdownView {
            target_date: d.into(),
            color: None,
            bg_color: None,
        };
        assert_eq!(view("2025-12-31T23:59").formatted_date(), "31/12/2025");
        assert_eq!(view("2026-03-01").formatted_date(), "01/03/2026");
        assert_eq!(view("soon").formatted_date(), "soon");
    }

    #[test]
    fn countdown_remaining_is_split_into_units() {
        let view = |d: &str| CountdownView {
            target_date: d.into(),
            color: None,
            bg_color: None,
        };
        let now =
            NaiveDateTime::parse_from_str("2026-06-01T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();

        assert_eq!(
            view("2026-06-03T12:30").remaining(now),
            Some(Remaining {
                days: 2,
                hours: 2,
                minutes: 30,
                seconds: 0,
            })
        );
        assert_eq!(view("2026-01-01").remaining(now), Some(Remaining::default()));
        assert_eq!(view("soon").remaining(now), None);
    }

    #[test]
    fn unknown_type_decodes_to_unknown() {
        let element = Element::leaf("x", ElementType::Unknown("hero".into()), Props::new());
        assert_eq!(ElementView::decode(&element), ElementView::Unknown);
    }

    #[test]
    fn image_align_maps_to_justify() {
        let element = Element::leaf(
            "i",
            ElementType::Image,
            props(json!({ "src": "/a.png", "align": "right" })),
        );
        match ElementView::decode(&element) {
            ElementView::Image(view) => {
                assert_eq!(view.align.justify_content(), "flex-end");
                assert_eq!(view.src, "/a.png");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
