use std::fmt::Write;

use crate::{
    celebration,
    dom::{ids, Element, Page, Property},
    scene::SceneId,
};

fn write_element(out: &mut String, element: &Element) {
    if element.is_hidden() {
        return;
    }

    if element.tag() == "button" {
        let mut label = format!("[{}]", element.text());
        if element.has_class("correct") {
            label.push_str(" ✔");
        } else if element.has_class("wrong") {
            label.push_str(" ✘");
        }
        if element.is_disabled() {
            label.push_str(" (disabled)");
        }
        let _ = writeln!(out, "  {label}");
        return;
    }

    if element.id() == Some(ids::CONFETTI) {
        let count = element.children().len();
        if count > 0 {
            let _ = writeln!(out, "  * {count} confetti particles *");
        }
        return;
    }

    if !element.text().is_empty() && element.get(Property::Opacity) > 0.0 {
        let _ = writeln!(out, "{}", element.text());
    }
    for child in element.children() {
        write_element(out, child);
    }
}

pub fn render(page: &Page, scene: SceneId) -> String {
    let mut out = format!("--- {scene} ---\n");
    if let Some(slide) = page.find(scene.element_id()) {
        write_element(&mut out, slide);
    }
    out
}

pub fn quiz_status(page: &Page) -> Option<String> {
    let board = page.find(ids::SCOREBOARD)?;
    if board.is_hidden() {
        return None;
    }
    let score = page.find(ids::SCORE_TEXT)?.text();
    Some(match celebration::particle_count(page) {
        0 => score.to_owned(),
        _ => format!("{score} Perfect!"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_parts_are_left_out() {
        let page = Page::standard();
        let text = render(&page, SceneId::Scene1);
        assert!(text.starts_with("--- scene1 ---"));
        assert!(text.contains("[Lock] (disabled)"));
        assert!(!text.contains("Try again"));
        assert!(quiz_status(&page).is_none());
    }

    #[test]
    fn answered_controls_show_verdict() {
        let mut page = Page::standard();
        page.append_child(
            ids::QUIZ_CHOICES,
            Element::new("button").with_id("c").with_text("Report it").with_class("correct"),
        );
        page.find_mut(ids::QUIZ_BACK).unwrap().set_hidden(false);
        assert!(render(&page, SceneId::Scene2).contains("[Report it] ✔"));
    }
}
