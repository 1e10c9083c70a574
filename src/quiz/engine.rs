use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    celebration,
    dom::{ids, Element, Page, Property},
    timeline::{Action, Millis, Scheduler, Signal, TimerId, Timeline, Tween},
};

use super::questions::{Choice, QuizQuestion};

pub const ONBOARDING_DELAY: Millis = 1000;
pub const ONBOARDING_EXIT: Millis = 800;
const ONBOARDING_FADE_IN: Millis = 300;
const ONBOARDING_GAP: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    id: Uuid,
    current_index: usize,
    score: usize,
    answered: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            current_index: 0,
            score: 0,
            answered: false,
        }
    }

    fn reset(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.answered = false;
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered(&self) -> bool {
        self.answered
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Front,
    Flipped,
    Answered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChoice {
    control_id: String,
    choice: Choice,
}

impl RenderedChoice {
    pub fn control_id(&self) -> &str {
        &self.control_id
    }

    pub fn choice(&self) -> &Choice {
        &self.choice
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCard {
    index: usize,
    face: CardFace,
    choices: Vec<RenderedChoice>,
}

impl RenderedCard {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn choices(&self) -> &[RenderedChoice] {
        &self.choices
    }
}

#[derive(Debug)]
pub struct QuizEngine {
    questions: &'static [QuizQuestion],
    session: QuizSession,
    card: Option<RenderedCard>,
    onboarding_timer: Option<TimerId>,
}

impl QuizEngine {
    pub fn new(questions: &'static [QuizQuestion]) -> Self {
        Self {
            questions,
            session: QuizSession::new(),
            card: None,
            onboarding_timer: None,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn card(&self) -> Option<&RenderedCard> {
        self.card.as_ref()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.session.current_index >= self.total()
    }

    pub fn owns_control(&self, id: &str) -> bool {
        self.card
            .as_ref()
            .is_some_and(|card| card.choices.iter().any(|c| c.control_id == id))
    }

    #[instrument(level = "info", skip_all, fields(session = %self.session.id))]
    pub fn start<R: Rng + ?Sized>(&mut self, page: &mut Page, scheduler: &mut Scheduler, rng: &mut R) {
        self.session.reset();
        self.render_card(0, page, scheduler, rng);
    }

    #[instrument(level = "debug", skip(self, page, scheduler, rng), fields(session = %self.session.id))]
    pub fn render_card<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        page: &mut Page,
        scheduler: &mut Scheduler,
        rng: &mut R,
    ) {
        let Some(question) = self.questions.get(index) else {
            return;
        };

        if let Some(scenario) = page.find_mut(ids::QUIZ_SCENARIO) {
            scenario.set_text(question.scenario());
        }
        if let Some(progress) = page.find_mut(ids::QUIZ_PROGRESS) {
            progress.set_text(format!("Question {} of {}", index + 1, self.total()));
        }

        page.clear_children(ids::QUIZ_CHOICES);
        page.remove(ids::QUIZ_EXPLANATION);

        let mut choices = question.choices().to_vec();
        choices.shuffle(rng);
        let choices = choices
            .into_iter()
            .map(|choice| {
                let control_id = format!("choice-{}", Uuid::new_v4().simple());
                page.append_child(
                    ids::QUIZ_CHOICES,
                    Element::new("button")
                        .with_id(control_id.clone())
                        .with_class("choice")
                        .with_text(choice.text())
                        .with_data("correct", choice.is_correct().to_string())
                        .with_data("message", choice.message()),
                );
                RenderedChoice { control_id, choice }
            })
            .collect();

        self.session.current_index = index;
        self.session.answered = false;
        self.card = Some(RenderedCard {
            index,
            face: CardFace::Front,
            choices,
        });

        if let Some(card) = page.find_mut(ids::QUIZ_CARD) {
            card.remove_class("correct");
            card.remove_class("wrong");
            card.remove_class("flipped");
            card.set_hidden(false);
        }
        if let Some(front) = page.find_mut(ids::QUIZ_FRONT) {
            front.set_hidden(false);
        }
        if let Some(back) = page.find_mut(ids::QUIZ_BACK) {
            back.set_hidden(true);
        }
        if let Some(next) = page.find_mut(ids::QUIZ_NEXT) {
            next.set_hidden(true);
            next.set_text(if index + 1 == self.total() { "Finish" } else { "Next" });
        }

        if let Some(timer) = self.onboarding_timer.take() {
            scheduler.cancel(timer);
        }
        hide_onboarding_now(page);
        if index == 0 {
            self.onboarding_timer = Some(scheduler.schedule(ONBOARDING_DELAY, Signal::OnboardingDue));
        }

        info!(index, "card rendered");
    }

    pub fn show_onboarding(&mut self, page: &mut Page, scheduler: &mut Scheduler) {
        self.onboarding_timer = None;
        let on_first_front = self
            .card
            .as_ref()
            .is_some_and(|card| card.index == 0 && card.face == CardFace::Front);
        if !on_first_front {
            return;
        }

        let rects = (
            page.find(ids::QUIZ_CARD).map(Element::rect),
            page.find(ids::QUIZ_CONTAINER).map(Element::rect),
            page.find(ids::ONBOARDING_TIP).map(Element::rect),
        );
        let (Some(card), Some(container), Some(tip)) = rects else {
            return;
        };
        let card = card.relative_to(&container);
        let left = card.x + card.width / 2.0 - tip.width / 2.0;
        let top = card.y - tip.height - ONBOARDING_GAP;

        if let Some(element) = page.find_mut(ids::ONBOARDING_TIP) {
            element.set_style("left", format!("{left:.0}px"));
            element.set_style("top", format!("{top:.0}px"));
            element.set(Property::Opacity, 0.0);
            element.set_hidden(false);
        }
        scheduler.play(Timeline::new().tween(Tween::opacity(
            ids::ONBOARDING_TIP,
            1.0,
            ONBOARDING_FADE_IN,
        )));
        debug!(left, top, "onboarding tip shown");
    }

    #[instrument(level = "info", skip_all, fields(session = %self.session.id))]
    pub fn flip(&mut self, page: &mut Page, scheduler: &mut Scheduler) -> bool {
        if self.session.answered {
            return false;
        }
        let Some(card) = self.card.as_mut().filter(|card| card.face == CardFace::Front) else {
            return false;
        };
        card.face = CardFace::Flipped;

        if let Some(element) = page.find_mut(ids::QUIZ_CARD) {
            element.add_class("flipped");
        }
        if let Some(front) = page.find_mut(ids::QUIZ_FRONT) {
            front.set_hidden(true);
        }
        if let Some(back) = page.find_mut(ids::QUIZ_BACK) {
            back.set_hidden(false);
        }

        if let Some(timer) = self.onboarding_timer.take() {
            scheduler.cancel(timer);
        }
        let tip_visible = page
            .find(ids::ONBOARDING_TIP)
            .is_some_and(|tip| !tip.is_hidden());
        if tip_visible {
            scheduler.play(
                Timeline::new()
                    .tween(Tween::opacity(ids::ONBOARDING_TIP, 0.0, ONBOARDING_EXIT))
                    .action(Action::Hide(ids::ONBOARDING_TIP.into())),
            );
        }
        true
    }

    /// Locks in the choice behind `control_id`. Only the first selection on a
    /// card counts.
    #[instrument(level = "info", skip(self, page), fields(session = %self.session.id))]
    pub fn select_choice(&mut self, control_id: &str, page: &mut Page) -> bool {
        if self.session.answered {
            return false;
        }
        let Some(card) = self.card.as_mut() else {
            return false;
        };
        let Some(selected) = card.choices.iter().find(|c| c.control_id == control_id).cloned() else {
            return false;
        };

        self.session.answered = true;
        card.face = CardFace::Answered;

        let verdict = if selected.choice.is_correct() {
            self.session.score += 1;
            "correct"
        } else {
            "wrong"
        };
        if let Some(control) = page.find_mut(&selected.control_id) {
            control.add_class(verdict);
        }
        if let Some(element) = page.find_mut(ids::QUIZ_CARD) {
            element.add_class(verdict);
        }
        for rendered in &card.choices {
            if let Some(control) = page.find_mut(&rendered.control_id) {
                if !selected.choice.is_correct() && rendered.choice.is_correct() {
                    control.add_class("correct");
                }
                control.set_disabled(true);
            }
        }

        page.append_child(
            ids::QUIZ_BACK,
            Element::new("p")
                .with_id(ids::QUIZ_EXPLANATION)
                .with_text(selected.choice.message()),
        );
        if let Some(next) = page.find_mut(ids::QUIZ_NEXT) {
            next.set_hidden(false);
        }

        info!(
            index = card.index,
            correct = selected.choice.is_correct(),
            score = self.session.score,
            "choice selected"
        );
        true
    }

    #[instrument(level = "info", skip_all, fields(session = %self.session.id))]
    pub fn go_to_next<R: Rng + ?Sized>(
        &mut self,
        page: &mut Page,
        scheduler: &mut Scheduler,
        rng: &mut R,
    ) -> bool {
        if self.is_finished() {
            return false;
        }
        let next = self.session.current_index + 1;
        if next < self.total() {
            self.render_card(next, page, scheduler, rng);
            return true;
        }

        self.session.current_index = next;
        self.card = None;
        if let Some(timer) = self.onboarding_timer.take() {
            scheduler.cancel(timer);
        }
        for id in [ids::QUIZ_CARD, ids::QUIZ_NEXT] {
            if let Some(element) = page.find_mut(id) {
                element.set_hidden(true);
            }
        }
        if let Some(text) = page.find_mut(ids::SCORE_TEXT) {
            text.set_text(format!("Score: {}/{}", self.session.score, self.total()));
        }
        if let Some(board) = page.find_mut(ids::SCOREBOARD) {
            board.set_hidden(false);
        }
        info!(score = self.session.score, total = self.total(), "quiz finished");

        if self.session.score == self.total() {
            celebration::celebrate(page, rng);
        }
        true
    }

    #[instrument(level = "info", skip_all, fields(session = %self.session.id))]
    pub fn restart<R: Rng + ?Sized>(&mut self, page: &mut Page, scheduler: &mut Scheduler, rng: &mut R) {
        self.session.reset();
        if let Some(board) = page.find_mut(ids::SCOREBOARD) {
            board.set_hidden(true);
        }
        celebration::clear(page);
        self.render_card(0, page, scheduler, rng);
    }
}

fn hide_onboarding_now(page: &mut Page) {
    if let Some(tip) = page.find_mut(ids::ONBOARDING_TIP) {
        tip.set_hidden(true);
        tip.set(Property::Opacity, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::quiz::questions::QUESTIONS;

    struct Harness {
        quiz: QuizEngine,
        page: Page,
        scheduler: Scheduler,
        rng: StdRng,
    }

    impl Harness {
        fn new() -> Self {
            let mut h = Self {
                quiz: QuizEngine::new(&QUESTIONS),
                page: Page::standard(),
                scheduler: Scheduler::new(),
                rng: StdRng::seed_from_u64(42),
            };
            h.quiz.start(&mut h.page, &mut h.scheduler, &mut h.rng);
            h
        }

        fn advance(&mut self, ms: Millis) {
            let until = self.scheduler.now() + ms;
            while let Some(signal) = self.scheduler.poll(&mut self.page, until) {
                if signal == Signal::OnboardingDue {
                    self.quiz.show_onboarding(&mut self.page, &mut self.scheduler);
                }
            }
        }

        fn control(&self, correct: bool) -> String {
            self.quiz
                .card()
                .unwrap()
                .choices()
                .iter()
                .find(|c| c.choice().is_correct() == correct)
                .unwrap()
                .control_id()
                .to_owned()
        }

        fn answer(&mut self, correct: bool) {
            self.quiz.flip(&mut self.page, &mut self.scheduler);
            let id = self.control(correct);
            assert!(self.quiz.select_choice(&id, &mut self.page));
        }

        fn next(&mut self) -> bool {
            self.quiz.go_to_next(&mut self.page, &mut self.scheduler, &mut self.rng)
        }

        fn element(&self, id: &str) -> &Element {
            self.page.find(id).unwrap()
        }
    }

    #[test]
    fn every_card_renders_three_controls_with_one_correct() {
        let mut h = Harness::new();
        for index in 0..QUESTIONS.len() {
            let choices = h.element(ids::QUIZ_CHOICES).children();
            assert_eq!(choices.len(), 3);
            assert_eq!(choices.iter().filter(|c| c.data("correct") == Some("true")).count(), 1);
            assert_eq!(h.element(ids::QUIZ_SCENARIO).text(), QUESTIONS[index].scenario());
            assert_eq!(
                h.element(ids::QUIZ_PROGRESS).text(),
                format!("Question {} of 5", index + 1)
            );
            h.answer(true);
            h.next();
        }
    }

    #[test]
    fn shuffle_is_not_order_preserving() {
        let mut h = Harness::new();
        let original: Vec<_> = QUESTIONS[0].choices().iter().map(|c| c.text()).collect();
        let reordered = (0..50).any(|_| {
            h.quiz.render_card(0, &mut h.page, &mut h.scheduler, &mut h.rng);
            let order: Vec<_> = h
                .quiz
                .card()
                .unwrap()
                .choices()
                .iter()
                .map(|c| c.choice().text())
                .collect();
            order != original
        });
        assert!(reordered);
    }

    #[test]
    fn advance_label_switches_on_last_card() {
        let mut h = Harness::new();
        for _ in 0..4 {
            assert_eq!(h.element(ids::QUIZ_NEXT).text(), "Next");
            h.answer(false);
            h.next();
        }
        assert_eq!(h.element(ids::QUIZ_NEXT).text(), "Finish");
    }

    #[test]
    fn flip_only_from_front() {
        let mut h = Harness::new();
        assert!(h.page.find(ids::QUIZ_BACK).unwrap().is_hidden());
        assert!(h.quiz.flip(&mut h.page, &mut h.scheduler));
        assert_eq!(h.quiz.card().unwrap().face(), CardFace::Flipped);
        assert!(h.element(ids::QUIZ_CARD).has_class("flipped"));
        assert!(!h.element(ids::QUIZ_BACK).is_hidden());
        assert!(!h.quiz.flip(&mut h.page, &mut h.scheduler));
    }

    #[test]
    fn correct_selection_scores_once() {
        let mut h = Harness::new();
        h.answer(true);
        assert_eq!(h.quiz.session().score(), 1);
        assert!(h.quiz.session().answered());
        assert!(h.element(ids::QUIZ_CARD).has_class("correct"));
        assert!(!h.element(ids::QUIZ_NEXT).is_hidden());
        assert_eq!(h.element(ids::QUIZ_NEXT).text(), "Next");

        let id = h.control(true);
        assert!(!h.quiz.select_choice(&id, &mut h.page));
        assert_eq!(h.quiz.session().score(), 1);
        let explanations = h
            .element(ids::QUIZ_BACK)
            .children()
            .iter()
            .filter(|c| c.id() == Some(ids::QUIZ_EXPLANATION))
            .count();
        assert_eq!(explanations, 1);
    }

    #[test]
    fn wrong_selection_reveals_correct_answer() {
        let mut h = Harness::new();
        let wrong = h.control(false);
        let right = h.control(true);
        h.quiz.flip(&mut h.page, &mut h.scheduler);
        assert!(h.quiz.select_choice(&wrong, &mut h.page));

        assert_eq!(h.quiz.session().score(), 0);
        assert!(h.element(&wrong).has_class("wrong"));
        assert!(h.element(&right).has_class("correct"));
        assert!(h.element(ids::QUIZ_CARD).has_class("wrong"));
        let marked = h
            .element(ids::QUIZ_CHOICES)
            .children()
            .iter()
            .filter(|c| c.has_class("wrong") || c.has_class("correct"))
            .count();
        assert_eq!(marked, 2);
        assert!(h.element(ids::QUIZ_CHOICES).children().iter().all(Element::is_disabled));

        let message = QUESTIONS[0]
            .choices()
            .iter()
            .find(|c| c.text() == h.element(&wrong).text())
            .unwrap()
            .message();
        assert_eq!(h.element(ids::QUIZ_EXPLANATION).text(), message);
    }

    #[test]
    fn controls_from_previous_card_are_rejected() {
        let mut h = Harness::new();
        let stale = h.control(true);
        h.answer(true);
        h.next();
        assert!(!h.quiz.owns_control(&stale));
        assert!(!h.quiz.select_choice(&stale, &mut h.page));
        assert!(!h.quiz.session().answered());
    }

    #[test]
    fn onboarding_tip_appears_above_first_card() {
        let mut h = Harness::new();
        h.advance(ONBOARDING_DELAY - 1);
        assert!(h.element(ids::ONBOARDING_TIP).is_hidden());

        h.advance(500);
        let tip = h.element(ids::ONBOARDING_TIP);
        assert!(!tip.is_hidden());
        assert_eq!(tip.style("left"), Some("290px"));
        assert_eq!(tip.style("top"), Some("60px"));
        assert_eq!(tip.get(Property::Opacity), 1.0);
    }

    #[test]
    fn flipping_dismisses_visible_tip_after_exit_animation() {
        let mut h = Harness::new();
        h.advance(2_000);
        h.quiz.flip(&mut h.page, &mut h.scheduler);

        h.advance(ONBOARDING_EXIT - 100);
        assert!(!h.element(ids::ONBOARDING_TIP).is_hidden());
        h.advance(100);
        assert!(h.element(ids::ONBOARDING_TIP).is_hidden());
        assert_eq!(h.element(ids::ONBOARDING_TIP).get(Property::Opacity), 0.0);
    }

    #[test]
    fn flipping_early_cancels_pending_tip() {
        let mut h = Harness::new();
        h.advance(200);
        h.quiz.flip(&mut h.page, &mut h.scheduler);
        h.advance(5_000);
        assert!(h.element(ids::ONBOARDING_TIP).is_hidden());
    }

    #[test]
    fn rerendering_first_card_does_not_duplicate_timer() {
        let mut h = Harness::new();
        h.quiz.render_card(0, &mut h.page, &mut h.scheduler, &mut h.rng);
        h.quiz.render_card(0, &mut h.page, &mut h.scheduler, &mut h.rng);
        assert_eq!(h.scheduler.pending(), 1);
    }

    #[test]
    fn later_cards_hide_the_tip() {
        let mut h = Harness::new();
        h.advance(2_000);
        h.answer(true);
        h.next();
        assert!(h.element(ids::ONBOARDING_TIP).is_hidden());
        h.advance(2_000);
        assert!(h.element(ids::ONBOARDING_TIP).is_hidden());
    }

    #[test]
    fn perfect_run_celebrates() {
        let mut h = Harness::new();
        for _ in 0..5 {
            h.answer(true);
            assert!(h.next());
        }
        assert!(!h.element(ids::SCOREBOARD).is_hidden());
        assert_eq!(h.element(ids::SCORE_TEXT).text(), "Score: 5/5");
        assert_eq!(celebration::particle_count(&h.page), 40);
        assert!(!h.next());
    }

    #[test]
    fn imperfect_run_has_no_confetti() {
        let mut h = Harness::new();
        for round in 0..5 {
            h.answer(round != 2);
            h.next();
        }
        assert_eq!(h.element(ids::SCORE_TEXT).text(), "Score: 4/5");
        assert_eq!(celebration::particle_count(&h.page), 0);
    }

    #[test]
    fn restart_resets_everything() {
        let mut h = Harness::new();
        for _ in 0..5 {
            h.answer(true);
            h.next();
        }
        h.quiz.restart(&mut h.page, &mut h.scheduler, &mut h.rng);

        assert_eq!(h.quiz.session().score(), 0);
        assert_eq!(h.quiz.session().current_index(), 0);
        assert!(!h.quiz.session().answered());
        assert!(h.element(ids::SCOREBOARD).is_hidden());
        assert!(!h.element(ids::QUIZ_CARD).is_hidden());
        assert_eq!(celebration::particle_count(&h.page), 0);
        assert_eq!(h.quiz.card().unwrap().face(), CardFace::Front);

        h.advance(ONBOARDING_DELAY);
        assert!(!h.element(ids::ONBOARDING_TIP).is_hidden());
    }
}
