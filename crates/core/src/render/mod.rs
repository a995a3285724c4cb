//! Page renderer.
//!
//! Rendering is two steps. [`page_document`] walks the slides and their
//! element trees and builds a [`VNode`] tree; [`html::to_html`] then writes
//! it out, escaping all text and attribute values. [`render_page`] runs
//! both.

pub mod html;
pub mod vdom;

use chrono::{NaiveDateTime, Utc};

use crate::element::{Element, ElementType};
use crate::page::Font;
use crate::props::{BoxStyle, ElementView, FormBlockView};
use crate::slide::{Slide, Transition};
use crate::types::DbId;

pub use vdom::{VElement, VNode};

/// Google Fonts families available to every page without uploading.
pub const BUILTIN_FONTS_URL: &str = "https://fonts.googleapis.com/css2?family=Caveat:wght@400..700&family=Dancing+Script:wght@400..700&family=Great+Vibes&family=Inter:wght@100..900&family=Lato:wght@100..900&family=Merriweather:wght@300;400;700&family=Montserrat:wght@100..900&family=Open+Sans:wght@300..800&family=Playfair+Display:wght@400..900&family=Roboto:wght@100..900&display=swap";

/// Client code for the countdown and guestbook widgets. It finds them by
/// class and reads everything it needs from their `data-*` attributes.
const WIDGET_SCRIPT: &str = include_str!("widgets.js");

const KEYFRAMES: &str = "\
@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
@keyframes slideInLeft { from { transform: translateX(-100%); opacity: 0; } to { transform: translateX(0); opacity: 1; } }
@keyframes slideInRight { from { transform: translateX(100%); opacity: 0; } to { transform: translateX(0); opacity: 1; } }
@keyframes zoomIn { from { transform: scale(0.8); opacity: 0; } to { transform: scale(1); opacity: 1; } }
.transition-fade { animation-name: fadeIn; animation-timing-function: ease-out; }
.transition-slide-left { animation-name: slideInLeft; animation-timing-function: ease-out; }
.transition-slide-right { animation-name: slideInRight; animation-timing-function: ease-out; }
.transition-zoom { animation-name: zoomIn; animation-timing-function: ease-out; }
";

const BASE_CSS: &str = "\
body { margin: 0; font-family: Inter, sans-serif; background: #ffffff; }
.slide { position: relative; width: 100%; overflow: hidden; }
.slide-inner { position: relative; max-width: 80rem; margin: 0 auto; padding: 2rem 1rem; }
.element { position: relative; overflow: hidden; box-sizing: border-box; }
.element-overlay { position: absolute; inset: 0; pointer-events: none; }
.element-content { position: relative; z-index: 1; }
";

/// What the renderer needs to know about a page.
#[derive(Debug, Clone, Copy)]
pub struct RenderPage<'a> {
    pub page_id: DbId,
    pub title: &'a str,
    pub slides: &'a [Slide],
    pub fonts: &'a [Font],
}

/// Renderer switches.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit slide scripts. Only enable for trusted authors.
    pub allow_scripts: bool,
    /// Prefix of the JSON API the RSVP form and guestbook widget talk to.
    pub api_base: String,
    /// Clock the countdown's initial values are computed against, in UTC.
    pub now: NaiveDateTime,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            allow_scripts: false,
            api_base: "/api/v1".to_string(),
            now: Utc::now().naive_utc(),
        }
    }
}

/// Render a page to a complete HTML document.
pub fn render_page(page: &RenderPage<'_>, options: &RenderOptions) -> String {
    format!("<!DOCTYPE html>{}", html::to_html(&page_document(page, options)))
}

/// Minimal HTML document for missing pages.
pub fn not_found_document(message: &str) -> String {
    let doc = VElement::new("html")
        .attr("lang", "en")
        .child(
            VElement::new("head")
                .child(VElement::new("meta").attr("charset", "utf-8"))
                .child(VElement::new("title").child(VNode::text("Page not found"))),
        )
        .child(
            VElement::new("body")
                .child(VElement::new("h1").child(VNode::text("404")))
                .child(VElement::new("p").child(VNode::text(message))),
        );
    format!("<!DOCTYPE html>{}", html::to_html(&doc.into()))
}

/// Build the virtual document for a page.
pub fn page_document(page: &RenderPage<'_>, options: &RenderOptions) -> VNode {
    let head = VElement::new("head")
        .child(VElement::new("meta").attr("charset", "utf-8"))
        .child(
            VElement::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(VElement::new("title").child(VNode::text(page.title)))
        .child(VElement::new("style").child(VNode::Raw(stylesheet(page.fonts))));

    let ctx = Ctx { page, options };
    let body = VElement::new("body")
        .child(
            VElement::new("main")
                .class("page")
                .children(page.slides.iter().map(|s| render_slide(s, &ctx))),
        )
        .children(widget_script(page.slides))
        .children(scripts(page.slides, options));

    VElement::new("html")
        .attr("lang", "en")
        .child(head)
        .child(body)
        .into()
}

struct Ctx<'a> {
    page: &'a RenderPage<'a>,
    options: &'a RenderOptions,
}

fn stylesheet(fonts: &[Font]) -> String {
    let mut css = format!("@import url(\"{}\");\n", html::escape_css_string(BUILTIN_FONTS_URL));
    for font in fonts {
        css.push_str(&format!(
            "@font-face {{ font-family: \"{}\"; src: url(\"{}\"); }}\n",
            html::escape_css_string(&font.name),
            html::escape_css_string(&font.url),
        ));
    }
    css.push_str(KEYFRAMES);
    css.push_str(BASE_CSS);
    css
}

// ---------------------------------------------------------------------------
// Slides
// ---------------------------------------------------------------------------

fn is_image_background(background: &str) -> bool {
    let b = background.trim_start();
    b.starts_with("http://")
        || b.starts_with("https://")
        || b.starts_with('/')
        || b.starts_with("data:image/")
}

fn render_slide(slide: &Slide, ctx: &Ctx<'_>) -> VNode {
    let mut section = VElement::new("section")
        .class("slide")
        .attr("id", format!("slide-{}", slide.id))
        .attr("data-slide-name", slide.name.as_str());

    if slide.transition != Transition::None {
        section = section
            .class(format!("transition-{}", slide.transition.as_str()))
            .style("animation-duration", slide.transition_duration.as_str());
    }

    section = if is_image_background(&slide.background) {
        section
            .style("background-image", format!("url({})", slide.background.trim()))
            .style("background-size", "cover")
            .style("background-position", "center")
    } else {
        section.style("background-color", slide.background.as_str())
    };

    section
        .child(
            VElement::new("div")
                .class("slide-inner")
                .children(slide.elements.iter().map(|e| render_element(e, ctx))),
        )
        .into()
}

/// Whether any slide has an element driven by [`WIDGET_SCRIPT`].
fn uses_widgets(slides: &[Slide]) -> bool {
    let mut stack: Vec<&Element> = slides.iter().flat_map(|s| s.elements.iter()).collect();
    while let Some(element) = stack.pop() {
        if matches!(element.kind, ElementType::Countdown | ElementType::Guestbook) {
            return true;
        }
        stack.extend(element.child_slice());
    }
    false
}

fn widget_script(slides: &[Slide]) -> Option<VNode> {
    uses_widgets(slides).then(|| {
        VElement::new("script")
            .attr("data-widgets", "")
            .child(VNode::Raw(WIDGET_SCRIPT.replace("</", "<\\/")))
            .into()
    })
}

fn scripts(slides: &[Slide], options: &RenderOptions) -> Vec<VNode> {
    if !options.allow_scripts {
        return Vec::new();
    }
    slides
        .iter()
        .filter_map(|slide| {
            let body = slide.script.as_deref()?.trim();
            if body.is_empty() {
                return None;
            }
            let name = serde_json::to_string(&slide.name).unwrap_or_else(|_| "\"\"".into());
            let wrapped = format!(
                "(function(){{try{{\n{body}\n}}catch(e){{console.error(\"Slide script failed: \" + {name}, e);}}}})();"
            );
            Some(VElement::new("script").child(VNode::Raw(wrapped.replace("</", "<\\/"))).into())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

fn render_element(element: &Element, ctx: &Ctx<'_>) -> VNode {
    let view = ElementView::decode(element);
    if view == ElementView::Unknown {
        return VNode::empty();
    }

    let style = BoxStyle::from_props(&element.props);
    let overlay = style.overlay_color.as_ref().map(|color| {
        VNode::from(
            VElement::new("div")
                .class("element-overlay")
                .style("background-color", color.as_str()),
        )
    });

    VElement::new("div")
        .class("element")
        .class(format!("element-{}", element.kind))
        .attr("data-element-id", element.id.as_str())
        .styles(style.declarations())
        .children(overlay)
        .child(
            VElement::new("div")
                .class("element-content")
                .child(render_content(element, view, ctx)),
        )
        .into()
}

fn render_content(element: &Element, view: ElementView, ctx: &Ctx<'_>) -> VNode {
    match view {
        ElementView::Text(text) => VElement::new("p")
            .style_opt("font-size", text.font_size.as_ref())
            .style_opt("color", text.color.as_ref())
            .style_opt("font-weight", text.font_weight.as_ref())
            .child(VNode::text(text.content))
            .into(),

        ElementView::Image(image) => VElement::new("div")
            .style("display", "flex")
            .style("justify-content", image.align.justify_content())
            .child(
                VElement::new("img")
                    .attr("src", image.src)
                    .attr("alt", image.alt)
                    .style_opt("width", image.width.as_ref())
                    .style("max-width", "100%")
                    .style("border-radius", "8px"),
            )
            .into(),

        ElementView::Button(button) => VElement::new("div")
            .style("display", "flex")
            .style("justify-content", button.align.justify_content())
            .child(
                VElement::new("a")
                    .class("button")
                    .class(format!("button-{}", button.variant))
                    .attr("href", button.link)
                    .child(VNode::text(button.text)),
            )
            .into(),

        ElementView::Video { url, height } => VElement::new("div")
            .style("display", "flex")
            .style("justify-content", "center")
            .child(
                VElement::new("iframe")
                    .attr("src", url)
                    .attr("allowfullscreen", "")
                    .style("width", "100%")
                    .style_opt("height", height.as_ref())
                    .style("border", "0")
                    .style("border-radius", "8px")
                    .style("background", "#000000"),
            )
            .into(),

        ElementView::Map { keyword, height } => VElement::new("div")
            .class("map-placeholder")
            .attr("data-keyword", keyword.as_str())
            .style_opt("height", height.as_ref())
            .style("display", "flex")
            .style("align-items", "center")
            .style("justify-content", "center")
            .style("background", "#f3f4f6")
            .child(VElement::new("p").child(VNode::text(keyword)))
            .into(),

        ElementView::Divider(divider) => VElement::new("div")
            .style("display", "flex")
            .style("justify-content", "center")
            .style("padding", "8px 0")
            .child(
                VElement::new("hr")
                    .style_opt("border-color", divider.color.as_ref())
                    .style_opt("width", divider.width.as_ref())
                    .style_opt("border-top-style", divider.style.as_ref())
                    .style_opt("border-top-width", divider.thickness.as_ref()),
            )
            .into(),

        ElementView::Spacer { height } => VElement::new("div")
            .class("spacer")
            .style_opt("height", height.as_ref())
            .style("width", "100%")
            .into(),

        ElementView::Countdown(countdown) => {
            let left = countdown.remaining(ctx.options.now).unwrap_or_default();
            let units = [
                ("DAYS", left.days),
                ("HRS", left.hours),
                ("MIN", left.minutes),
                ("SEC", left.seconds),
            ];
            let boxes = units.into_iter().map(|(label, value)| {
                VNode::from(
                    VElement::new("div")
                        .class("countdown-box")
                        .attr("data-unit", label.to_ascii_lowercase())
                        .child(
                            VElement::new("div")
                                .class("countdown-value")
                                .child(VNode::text(format!("{value:02}"))),
                        )
                        .child(VElement::new("div").child(VNode::text(label))),
                )
            });
            let mut root = VElement::new("div")
                .class("countdown")
                .attr("data-target-date", countdown.target_date.as_str());
            if let Some(target) = countdown.target() {
                root = root.attr("data-target", target.format("%Y-%m-%dT%H:%M:%S").to_string());
            }
            root.style_opt("background-color", countdown.bg_color.as_ref())
                .style_opt("color", countdown.color.as_ref())
                .style("text-align", "center")
                .child(VElement::new("p").child(VNode::text("Countdown to")))
                .child(
                    VElement::new("p")
                        .class("countdown-date")
                        .child(VNode::text(countdown.formatted_date())),
                )
                .child(
                    VElement::new("div")
                        .class("countdown-boxes")
                        .style("display", "grid")
                        .style("grid-template-columns", "repeat(4, 1fr)")
                        .children(boxes),
                )
                .into()
        }

        ElementView::Rsvp(block) => rsvp_form(block, ctx),

        ElementView::Guestbook(block) => guestbook(block, ctx),

        ElementView::Gallery { images } => VElement::new("div")
            .class("gallery")
            .style("display", "grid")
            .style("grid-template-columns", "repeat(auto-fill, minmax(160px, 1fr))")
            .style("gap", "8px")
            .children(images.into_iter().enumerate().map(|(i, url)| {
                VNode::from(
                    VElement::new("div")
                        .class("gallery-item")
                        .style("aspect-ratio", "1 / 1")
                        .style("overflow", "hidden")
                        .child(
                            VElement::new("img")
                                .attr("src", url)
                                .attr("alt", format!("Gallery {i}"))
                                .style("width", "100%")
                                .style("height", "100%")
                                .style("object-fit", "cover"),
                        ),
                )
            }))
            .into(),

        ElementView::Container(layout) => VElement::new("div")
            .class("container")
            .styles(layout.declarations())
            .style("width", "100%")
            .style("height", "100%")
            .children(element.child_slice().iter().map(|c| render_element(c, ctx)))
            .into(),

        ElementView::Unknown => VNode::empty(),
    }
}

fn guestbook(block: FormBlockView, ctx: &Ctx<'_>) -> VNode {
    let api_base = &ctx.options.api_base;
    let form = VElement::new("form")
        .class("guestbook-form")
        .child(
            VElement::new("input")
                .attr("name", "name")
                .attr("placeholder", "Your Name")
                .attr("required", ""),
        )
        .child(
            VElement::new("textarea")
                .attr("name", "message")
                .attr("placeholder", "Write a message")
                .attr("required", ""),
        )
        .child(
            VElement::new("button")
                .attr("type", "submit")
                .child(VNode::text("Sign Guestbook")),
        );

    VElement::new("div")
        .class("guestbook")
        .attr("data-page-id", ctx.page.page_id.to_string())
        .attr("data-endpoint", format!("{api_base}/guestbook/{}", ctx.page.page_id))
        .attr("data-like-endpoint", format!("{api_base}/guestbook-like"))
        .child(VElement::new("h3").child(VNode::text(block.title)))
        .child(VElement::new("p").child(VNode::text(block.description)))
        .child(form)
        .child(VElement::new("ul").class("guestbook-entries"))
        .into()
}

fn rsvp_form(block: FormBlockView, ctx: &Ctx<'_>) -> VNode {
    let options = [
        ("attending", "Will Attend"),
        ("not_attending", "Cannot Attend"),
        ("maybe", "Maybe"),
    ]
    .into_iter()
    .map(|(value, label)| {
        VNode::from(
            VElement::new("option")
                .attr("value", value)
                .child(VNode::text(label)),
        )
    });

    VElement::new("form")
        .class("rsvp-form")
        .attr("method", "post")
        .attr(
            "action",
            format!("{}/pages/{}/rsvps", ctx.options.api_base, ctx.page.page_id),
        )
        .child(VElement::new("h3").child(VNode::text(block.title)))
        .child(VElement::new("p").child(VNode::text(block.description)))
        .child(
            VElement::new("input")
                .attr("name", "name")
                .attr("placeholder", "Your Name")
                .attr("required", ""),
        )
        .child(VElement::new("select").attr("name", "status").children(options))
        .child(
            VElement::new("textarea")
                .attr("name", "message")
                .attr("placeholder", "Message (optional)"),
        )
        .child(
            VElement::new("button")
                .attr("type", "submit")
                .child(VNode::text("Send RSVP")),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementType, Props};
    use serde_json::{json, Value};

    fn props(value: Value) -> Props {
        match value {
            Value::Object(map) => map,
            _ => panic!("props must be an object"),
        }
    }

    fn page_with(slides: &[Slide]) -> String {
        render_page(
            &RenderPage {
                page_id: 7,
                title: "Our Day",
                slides,
                fonts: &[],
            },
            &RenderOptions::default(),
        )
    }

    fn slide_with(elements: Vec<Element>) -> Slide {
        let mut slide = Slide::new("Cover");
        slide.id = "s1".into();
        slide.elements = elements;
        slide
    }

    #[test]
    fn text_is_escaped() {
        let html = page_with(&[slide_with(vec![Element::leaf(
            "t",
            ElementType::Text,
            props(json!({ "content": "<script>alert(1)</script>" })),
        )])]);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn slide_section_carries_transition_and_background() {
        let mut slide = slide_with(vec![]);
        slide.transition = Transition::SlideLeft;
        slide.background = "#fafafa".into();
        let html = page_with(&[slide]);
        assert!(html.contains("class=\"slide transition-slide-left\""));
        assert!(html.contains("animation-duration: 0.8s"));
        assert!(html.contains("background-color: #fafafa"));
    }

    #[test]
    fn url_background_becomes_image() {
        let mut slide = slide_with(vec![]);
        slide.background = "/uploads/bg.jpg".into();
        let html = page_with(&[slide]);
        assert!(html.contains("background-image: url(/uploads/bg.jpg)"));
    }

    #[test]
    fn unknown_elements_render_nothing() {
        let html = page_with(&[slide_with(vec![Element::leaf(
            "h",
            ElementType::Unknown("hero".into()),
            Props::new(),
        )])]);
        assert!(!html.contains("data-element-id=\"h\""));
    }

    #[test]
    fn nested_containers_render_recursively() {
        let inner = Element::container(
            "inner",
            props(json!({ "layout": "grid", "columns": 3 })),
            vec![Element::leaf(
                "deep",
                ElementType::Text,
                props(json!({ "content": "Deep" })),
            )],
        );
        let outer = Element::container("outer", props(json!({ "layout": "vertical" })), vec![inner]);
        let html = page_with(&[slide_with(vec![outer])]);

        assert!(html.contains("flex-direction: column"));
        assert!(html.contains("grid-template-columns: repeat(3, 1fr)"));
        let outer_at = html.find("data-element-id=\"outer\"").unwrap();
        let inner_at = html.find("data-element-id=\"inner\"").unwrap();
        let deep_at = html.find(">Deep<").unwrap();
        assert!(outer_at < inner_at && inner_at < deep_at);
    }

    #[test]
    fn overlay_sits_before_content() {
        let html = page_with(&[slide_with(vec![Element::leaf(
            "t",
            ElementType::Text,
            props(json!({ "content": "Hi", "overlayColor": "rgba(0,0,0,0.5)" })),
        )])]);
        let overlay_at = html.find("class=\"element-overlay\"").unwrap();
        let content_at = html.find("class=\"element-content\"").unwrap();
        assert!(overlay_at < content_at);
    }

    #[test]
    fn gallery_skips_blank_urls() {
        let html = page_with(&[slide_with(vec![Element::leaf(
            "g",
            ElementType::Gallery,
            props(json!({ "images": "/a.png\n\n/b.png" })),
        )])]);
        assert_eq!(html.matches("class=\"gallery-item\"").count(), 2);
    }

    #[test]
    fn rsvp_and_guestbook_point_at_the_page() {
        let html = page_with(&[slide_with(vec![
            Element::new(ElementType::Rsvp),
            Element::new(ElementType::Guestbook),
        ])]);
        assert!(html.contains("action=\"/api/v1/pages/7/rsvps\""));
        assert!(html.contains("data-endpoint=\"/api/v1/guestbook/7\""));
    }

    #[test]
    fn countdown_shows_formatted_date() {
        let html = page_with(&[slide_with(vec![Element::new(ElementType::Countdown)])]);
        assert!(html.contains("31/12/2025"));
        assert!(html.contains(">DAYS<"));
    }

    #[test]
    fn countdown_starts_from_the_render_clock() {
        let countdown = Element::leaf(
            "c",
            ElementType::Countdown,
            props(json!({ "targetDate": "2026-06-03T12:30" })),
        );
        let options = RenderOptions {
            now: NaiveDateTime::parse_from_str("2026-06-01T10:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
            ..Default::default()
        };
        let html = render_page(
            &RenderPage {
                page_id: 7,
                title: "t",
                slides: &[slide_with(vec![countdown])],
                fonts: &[],
            },
            &options,
        );

        assert!(html.contains("data-target=\"2026-06-03T12:30:00\""));
        assert!(html.contains(
            "data-unit=\"days\"><div class=\"countdown-value\">02</div>"
        ));
        assert!(html.contains(
            "data-unit=\"min\"><div class=\"countdown-value\">30</div>"
        ));
    }

    #[test]
    fn widgets_get_the_client_script_once() {
        let html = page_with(&[slide_with(vec![
            Element::new(ElementType::Countdown),
            Element::container("box", Props::new(), vec![Element::new(ElementType::Guestbook)]),
        ])]);
        assert_eq!(html.matches("<script data-widgets").count(), 1);
        assert!(html.contains("querySelectorAll(\".guestbook[data-endpoint]\")"));
        assert!(html.contains("data-like-endpoint=\"/api/v1/guestbook-like\""));
        assert!(html.contains("class=\"guestbook-form\""));

        let html = page_with(&[slide_with(vec![Element::new(ElementType::Text)])]);
        assert!(!html.contains("data-widgets"));
    }

    #[test]
    fn custom_fonts_get_font_faces() {
        let fonts = vec![Font {
            name: "Brush".into(),
            url: "/uploads/brush.woff2".into(),
        }];
        let html = render_page(
            &RenderPage {
                page_id: 1,
                title: "t",
                slides: &[],
                fonts: &fonts,
            },
            &RenderOptions::default(),
        );
        assert!(html.contains("@font-face { font-family: \"Brush\"; src: url(\"/uploads/brush.woff2\"); }"));
        assert!(html.contains("@keyframes zoomIn"));
    }

    #[test]
    fn scripts_are_off_by_default() {
        let mut slide = slide_with(vec![]);
        slide.script = Some("document.title = 'x'".into());
        let html = page_with(&[slide.clone()]);
        assert!(!html.contains("document.title"));

        let html = render_page(
            &RenderPage {
                page_id: 1,
                title: "t",
                slides: &[slide],
                fonts: &[],
            },
            &RenderOptions {
                allow_scripts: true,
                ..Default::default()
            },
        );
        assert!(html.contains("try{\ndocument.title = 'x'\n}catch(e)"));
    }

    #[test]
    fn script_cannot_close_its_tag() {
        let mut slide = slide_with(vec![]);
        slide.script = Some("var s = '</script><b>';".into());
        let html = render_page(
            &RenderPage {
                page_id: 1,
                title: "t",
                slides: &[slide],
                fonts: &[],
            },
            &RenderOptions {
                allow_scripts: true,
                ..Default::default()
            },
        );
        assert!(html.contains("<\\/script><b>"));
    }

    #[test]
    fn not_found_page_is_html() {
        let html = not_found_document("No page here");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("No page here"));
    }
}
