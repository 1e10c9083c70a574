use std::collections::{BTreeMap, BTreeSet};

pub mod ids {
    pub const SCENE1: &str = "scene1";
    pub const SCENE2: &str = "scene2";
    pub const SCENE3: &str = "scene3";

    pub const LOCK_CONTAINER: &str = "lock-container";
    pub const LOCK_CARD: &str = "lock-card";
    pub const LOCK_PROMPT: &str = "lock-prompt";
    pub const BTN_LOCK: &str = "btn-lock";
    pub const BTN_IGNORE: &str = "btn-ignore";
    pub const LOCKED_OVERLAY: &str = "locked-overlay";
    pub const LOCK_ICON: &str = "lock-icon";
    pub const LOCKED_MESSAGE: &str = "locked-message";
    pub const SUCCESS_CHECK: &str = "success-check";
    pub const SUCCESS_SUBTEXT: &str = "success-subtext";
    pub const ERROR_OVERLAY: &str = "error-overlay";
    pub const BTN_RETRY: &str = "btn-retry";

    pub const QUIZ_CONTAINER: &str = "quiz-container";
    pub const QUIZ_PROGRESS: &str = "quiz-progress";
    pub const QUIZ_CARD: &str = "quiz-card";
    pub const QUIZ_FRONT: &str = "quiz-front";
    pub const QUIZ_SCENARIO: &str = "quiz-scenario";
    pub const QUIZ_BACK: &str = "quiz-back";
    pub const QUIZ_CHOICES: &str = "quiz-choices";
    pub const QUIZ_EXPLANATION: &str = "quiz-explanation";
    pub const QUIZ_NEXT: &str = "quiz-next";
    pub const ONBOARDING_TIP: &str = "onboarding-tip";
    pub const SCOREBOARD: &str = "scoreboard";
    pub const SCORE_TEXT: &str = "score-text";
    pub const QUIZ_RESTART: &str = "quiz-restart";
    pub const CONFETTI: &str = "confetti";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    Opacity,
    Scale,
    TranslateY,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn relative_to(&self, container: &Rect) -> Rect {
        Rect {
            x: self.x - container.x,
            y: self.y - container.y,
            ..*self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    text: String,
    classes: BTreeSet<String>,
    style: BTreeMap<String, String>,
    data: BTreeMap<String, String>,
    hidden: bool,
    disabled: bool,
    opacity: f64,
    scale: f64,
    translate_y: f64,
    rect: Rect,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            text: String::new(),
            classes: BTreeSet::new(),
            style: BTreeMap::new(),
            data: BTreeMap::new(),
            hidden: false,
            disabled: false,
            opacity: 1.0,
            scale: 1.0,
            translate_y: 0.0,
            rect: Rect::default(),
            children: vec![],
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        self.classes.insert(class.into());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        self.style.get(key).map(String::as_str)
    }

    pub fn set_style(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.style.insert(key.into(), value.into());
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::Opacity => self.opacity,
            Property::Scale => self.scale,
            Property::TranslateY => self.translate_y,
        }
    }

    pub fn set(&mut self, property: Property, value: f64) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::Scale => self.scale = value,
            Property::TranslateY => self.translate_y = value,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

fn find_in<'a>(element: &'a Element, id: &str) -> Option<&'a Element> {
    if element.id() == Some(id) {
        return Some(element);
    }
    element.children.iter().find_map(|child| find_in(child, id))
}

fn find_in_mut<'a>(element: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if element.id() == Some(id) {
        return Some(element);
    }
    element
        .children
        .iter_mut()
        .find_map(|child| find_in_mut(child, id))
}

fn interactive_in(element: &Element, id: &str) -> Option<bool> {
    if element.id() == Some(id) {
        return Some(!element.hidden && !element.disabled);
    }
    element
        .children
        .iter()
        .find_map(|child| interactive_in(child, id))
        .map(|interactive| interactive && !element.hidden)
}

fn remove_in(element: &mut Element, id: &str) -> Option<Element> {
    if let Some(pos) = element.children.iter().position(|c| c.id() == Some(id)) {
        return Some(element.children.remove(pos));
    }
    element
        .children
        .iter_mut()
        .find_map(|child| remove_in(child, id))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    root: Element,
}

impl Page {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        find_in(&self.root, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        find_in_mut(&mut self.root, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Whether a click on `id` would reach a handler: the element exists, is
    /// enabled, and neither it nor any ancestor is hidden.
    pub fn is_interactive(&self, id: &str) -> bool {
        interactive_in(&self.root, id).unwrap_or(false)
    }

    pub fn append_child(&mut self, parent: &str, child: Element) -> bool {
        match self.find_mut(parent) {
            Some(parent) => {
                parent.children.push(child);
                true
            }
            None => false,
        }
    }

    pub fn clear_children(&mut self, parent: &str) -> usize {
        self.find_mut(parent)
            .map(|parent| std::mem::take(&mut parent.children).len())
            .unwrap_or(0)
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        remove_in(&mut self.root, id)
    }

    pub fn standard() -> Self {
        use ids::*;

        let scene1 = Element::new("section")
            .with_id(SCENE1)
            .with_class("slide")
            .with_child(
                Element::new("div")
                    .with_id(LOCK_CONTAINER)
                    .with_child(
                        Element::new("div")
                            .with_id(LOCK_CARD)
                            .with_opacity(0.0)
                            .with_child(Element::new("p").with_id(LOCK_PROMPT))
                            .with_child(
                                Element::new("button")
                                    .with_id(BTN_LOCK)
                                    .with_text("Lock")
                                    .with_opacity(0.0)
                                    .disabled(),
                            )
                            .with_child(
                                Element::new("button")
                                    .with_id(BTN_IGNORE)
                                    .with_text("Ignore")
                                    .with_opacity(0.0)
                                    .disabled(),
                            ),
                    )
                    .with_child(
                        Element::new("div")
                            .with_id(LOCKED_OVERLAY)
                            .with_opacity(0.0)
                            .hidden()
                            .with_child(Element::new("div").with_id(LOCK_ICON))
                            .with_child(
                                Element::new("p")
                                    .with_id(LOCKED_MESSAGE)
                                    .with_text("Screen locked. Nobody gets in while you're away.")
                                    .with_opacity(0.0),
                            )
                            .with_child(
                                Element::new("div")
                                    .with_id(SUCCESS_CHECK)
                                    .with_text("✔")
                                    .with_opacity(0.0),
                            )
                            .with_child(
                                Element::new("p")
                                    .with_id(SUCCESS_SUBTEXT)
                                    .with_text("Win + L (or Ctrl + Cmd + Q) every time you step away.")
                                    .with_opacity(0.0),
                            ),
                    )
                    .with_child(
                        Element::new("div")
                            .with_id(ERROR_OVERLAY)
                            .with_opacity(0.0)
                            .hidden()
                            .with_child(
                                Element::new("p")
                                    .with_text("Anyone walking by can now read your email and use your accounts."),
                            )
                            .with_child(
                                Element::new("button")
                                    .with_id(BTN_RETRY)
                                    .with_text("Try again"),
                            ),
                    ),
            );

        let scene2 = Element::new("section")
            .with_id(SCENE2)
            .with_class("slide")
            .with_child(
                Element::new("div")
                    .with_id(QUIZ_CONTAINER)
                    .with_rect(Rect::new(0.0, 0.0, 800.0, 600.0))
                    .with_child(Element::new("p").with_id(QUIZ_PROGRESS))
                    .with_child(
                        Element::new("div")
                            .with_id(ONBOARDING_TIP)
                            .with_text("Tap the card to see your options")
                            .with_rect(Rect::new(0.0, 0.0, 220.0, 48.0))
                            .with_opacity(0.0)
                            .hidden(),
                    )
                    .with_child(
                        Element::new("div")
                            .with_id(QUIZ_CARD)
                            .with_rect(Rect::new(200.0, 120.0, 400.0, 260.0))
                            .with_child(
                                Element::new("div")
                                    .with_id(QUIZ_FRONT)
                                    .with_child(Element::new("p").with_id(QUIZ_SCENARIO)),
                            )
                            .with_child(
                                Element::new("div")
                                    .with_id(QUIZ_BACK)
                                    .hidden()
                                    .with_child(Element::new("div").with_id(QUIZ_CHOICES)),
                            ),
                    )
                    .with_child(
                        Element::new("button")
                            .with_id(QUIZ_NEXT)
                            .with_text("Next")
                            .hidden(),
                    )
                    .with_child(
                        Element::new("div")
                            .with_id(SCOREBOARD)
                            .hidden()
                            .with_child(Element::new("p").with_id(SCORE_TEXT))
                            .with_child(
                                Element::new("button")
                                    .with_id(QUIZ_RESTART)
                                    .with_text("Restart"),
                            ),
                    )
                    .with_child(Element::new("div").with_id(CONFETTI)),
            );

        let scene3 = Element::new("section")
            .with_id(SCENE3)
            .with_class("slide")
            .with_child(Element::new("h1").with_text("Thanks for keeping your workspace secure."))
            .with_child(
                Element::new("p").with_text("Lock your screen, question odd requests, report what looks wrong."),
            );

        Page::new(
            Element::new("body")
                .with_child(scene1)
                .with_child(scene2)
                .with_child(scene3),
        )
    }
}
