//! The page editor aggregate.
//!
//! [`PageEditor`] owns a page's slide sequence together with the current
//! slide and element selection. Element edits are routed to the selected
//! slide's forest through [`crate::tree`]; only that slide's `elements`
//! are replaced, every other slide is left as it was.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementType, Props};
use crate::slide::{Slide, SlideField};
use crate::tree::{self, Direction};

/// One editor operation, as sent by a client in an edit batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddSlide,
    DeleteSlide {
        slide_id: String,
    },
    SelectSlide {
        slide_id: String,
    },
    UpdateSlide {
        slide_id: String,
        #[serde(flatten)]
        field: SlideField,
    },
    AddElement {
        element_type: ElementType,
    },
    AddChild {
        container_id: String,
        element_type: ElementType,
    },
    UpdateElementProps {
        element_id: String,
        props: Props,
    },
    DeleteElement {
        element_id: String,
    },
    MoveElement {
        element_id: String,
        direction: Direction,
    },
}

/// Editing state for one page.
#[derive(Debug, Clone, Default)]
pub struct PageEditor {
    slides: Vec<Slide>,
    current_slide_id: Option<String>,
    selected_element_id: Option<String>,
}

impl PageEditor {
    /// Start editing `slides`, with the first slide selected.
    pub fn new(slides: Vec<Slide>) -> Self {
        let current_slide_id = slides.first().map(|s| s.id.clone());
        Self {
            slides,
            current_slide_id,
            selected_element_id: None,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn into_slides(self) -> Vec<Slide> {
        self.slides
    }

    pub fn current_slide_id(&self) -> Option<&str> {
        self.current_slide_id.as_deref()
    }

    pub fn selected_element_id(&self) -> Option<&str> {
        self.selected_element_id.as_deref()
    }

    /// The currently selected slide, if any.
    pub fn current_slide(&self) -> Option<&Slide> {
        let id = self.current_slide_id.as_deref()?;
        self.slides.iter().find(|s| s.id == id)
    }

    /// The selected element, looked up anywhere in the current slide.
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected_element_id.as_deref()?;
        tree::find(&self.current_slide()?.elements, id)
    }

    // -----------------------------------------------------------------------
    // Slides
    // -----------------------------------------------------------------------

    /// Append a new empty slide and select it. Returns its id.
    pub fn add_slide(&mut self) -> String {
        let slide = Slide::new(format!("Slide {}", self.slides.len() + 1));
        let id = slide.id.clone();
        self.slides.push(slide);
        self.current_slide_id = Some(id.clone());
        self.selected_element_id = None;
        id
    }

    /// Remove a slide. If it was selected, the first remaining slide (or
    /// none) becomes current.
    pub fn delete_slide(&mut self, slide_id: &str) {
        self.slides.retain(|s| s.id != slide_id);
        if self.current_slide_id.as_deref() == Some(slide_id) {
            self.current_slide_id = self.slides.first().map(|s| s.id.clone());
            self.selected_element_id = None;
        }
    }

    /// Select a slide by id. Unknown ids leave the selection unchanged.
    pub fn select_slide(&mut self, slide_id: &str) {
        if self.slides.iter().any(|s| s.id == slide_id) {
            self.current_slide_id = Some(slide_id.to_string());
            self.selected_element_id = None;
        }
    }

    /// Replace one property of a slide.
    pub fn update_slide(&mut self, slide_id: &str, field: SlideField) {
        if let Some(slide) = self.slides.iter_mut().find(|s| s.id == slide_id) {
            field.apply_to(slide);
        }
    }

    // -----------------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------------

    /// Select an element of the current slide (or clear with `None`).
    pub fn select_element(&mut self, element_id: Option<&str>) {
        self.selected_element_id = element_id.map(str::to_string);
    }

    /// Replace the current slide's forest with `edit(forest)`.
    ///
    /// Returns `false` when no slide is selected.
    fn edit_current<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&[Element]) -> Vec<Element>,
    {
        let Some(current) = self.current_slide_id.as_deref() else {
            return false;
        };
        match self.slides.iter_mut().find(|s| s.id == current) {
            Some(slide) => {
                slide.elements = edit(&slide.elements);
                true
            }
            None => false,
        }
    }

    /// Append a new top-level element to the current slide and select it.
    pub fn add_element(&mut self, kind: ElementType) -> Option<String> {
        let element = Element::new(kind);
        let id = element.id.clone();
        let added = self.edit_current(|forest| {
            let mut out = forest.to_vec();
            out.push(element);
            out
        });
        added.then(|| {
            self.selected_element_id = Some(id.clone());
            id
        })
    }

    /// Add a new element inside the container `container_id` and select it.
    ///
    /// Returns `None` when there is no current slide or the container does
    /// not exist on it.
    pub fn add_child(&mut self, container_id: &str, kind: ElementType) -> Option<String> {
        let slide = self.current_slide()?;
        tree::find(&slide.elements, container_id)?;

        let element = Element::new(kind);
        let id = element.id.clone();
        self.edit_current(|forest| tree::insert_child(forest, container_id, &element));
        self.selected_element_id = Some(id.clone());
        Some(id)
    }

    pub fn update_element_props(&mut self, element_id: &str, patch: &Props) {
        self.edit_current(|forest| tree::update_props(forest, element_id, patch));
    }

    /// Delete an element (and its subtree) from the current slide.
    pub fn delete_element(&mut self, element_id: &str) {
        self.edit_current(|forest| tree::remove(forest, element_id));
        let selection_gone = self
            .current_slide()
            .zip(self.selected_element_id.as_deref())
            .is_some_and(|(slide, selected)| tree::find(&slide.elements, selected).is_none());
        if selection_gone {
            self.selected_element_id = None;
        }
    }

    pub fn move_element(&mut self, element_id: &str, direction: Direction) {
        self.edit_current(|forest| tree::reorder_sibling(forest, element_id, direction));
    }

    /// Apply one [`EditCommand`].
    pub fn apply(&mut self, command: EditCommand) {
        match command {
            EditCommand::AddSlide => {
                self.add_slide();
            }
            EditCommand::DeleteSlide { slide_id } => self.delete_slide(&slide_id),
            EditCommand::SelectSlide { slide_id } => self.select_slide(&slide_id),
            EditCommand::UpdateSlide { slide_id, field } => self.update_slide(&slide_id, field),
            EditCommand::AddElement { element_type } => {
                self.add_element(element_type);
            }
            EditCommand::AddChild {
                container_id,
                element_type,
            } => {
                self.add_child(&container_id, element_type);
            }
            EditCommand::UpdateElementProps { element_id, props } => {
                self.update_element_props(&element_id, &props)
            }
            EditCommand::DeleteElement { element_id } => self.delete_element(&element_id),
            EditCommand::MoveElement {
                element_id,
                direction,
            } => self.move_element(&element_id, direction),
        }
    }
}
