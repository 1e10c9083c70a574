use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::dom::{Page, Property};

pub type Millis = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    PromptTyped,
    RetryRestored,
    OnboardingDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    OutQuad,
    InOutQuad,
    OutCubic,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::OutQuad => 1.0 - (1.0 - t).powi(2),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Interpolates one property of one element towards `to`. The start value is
/// read from the page when the tween begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    target: String,
    property: Property,
    to: f64,
    duration: Millis,
    easing: Easing,
}

impl Tween {
    pub fn new(target: impl Into<String>, property: Property, to: f64, duration: Millis) -> Self {
        Self {
            target: target.into(),
            property,
            to,
            duration,
            easing: Easing::default(),
        }
    }

    pub fn opacity(target: impl Into<String>, to: f64, duration: Millis) -> Self {
        Self::new(target, Property::Opacity, to, duration)
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddClass { target: String, class: String },
    RemoveClass { target: String, class: String },
    SetText { target: String, text: String },
    Show(String),
    Hide(String),
}

impl Action {
    pub fn add_class(target: impl Into<String>, class: impl Into<String>) -> Self {
        Action::AddClass {
            target: target.into(),
            class: class.into(),
        }
    }

    pub fn remove_class(target: impl Into<String>, class: impl Into<String>) -> Self {
        Action::RemoveClass {
            target: target.into(),
            class: class.into(),
        }
    }

    pub fn set_text(target: impl Into<String>, text: impl Into<String>) -> Self {
        Action::SetText {
            target: target.into(),
            text: text.into(),
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Action::AddClass { target, .. }
            | Action::RemoveClass { target, .. }
            | Action::SetText { target, .. } => target,
            Action::Show(target) | Action::Hide(target) => target,
        }
    }

    /// Applies the mutation. Returns `false` when the target is absent, in
    /// which case the page is untouched.
    pub fn apply(&self, page: &mut Page) -> bool {
        let Some(element) = page.find_mut(self.target()) else {
            trace!(element = self.target(), "skipping action on missing element");
            return false;
        };
        match self {
            Action::AddClass { class, .. } => element.add_class(class.clone()),
            Action::RemoveClass { class, .. } => element.remove_class(class),
            Action::SetText { text, .. } => element.set_text(text.clone()),
            Action::Show(_) => element.set_hidden(false),
            Action::Hide(_) => element.set_hidden(true),
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Offset {
    #[default]
    AfterPrevious,
    Delay(Millis),
    Overlap(Millis),
    WithPrevious,
    At(Millis),
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Tween(Tween),
    Action(Action),
}

impl Step {
    fn duration(&self) -> Millis {
        match self {
            Step::Tween(tween) => tween.duration,
            Step::Action(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    steps: Vec<(Offset, Step)>,
    on_complete: Option<Signal>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tween(self, tween: Tween) -> Self {
        self.tween_at(Offset::AfterPrevious, tween)
    }

    pub fn tween_at(mut self, offset: Offset, tween: Tween) -> Self {
        self.steps.push((offset, Step::Tween(tween)));
        self
    }

    pub fn action(self, action: Action) -> Self {
        self.action_at(Offset::AfterPrevious, action)
    }

    pub fn action_at(mut self, offset: Offset, action: Action) -> Self {
        self.steps.push((offset, Step::Action(action)));
        self
    }

    pub fn typed(mut self, target: &str, text: &str, per_char: Millis) -> Self {
        let mut shown = String::with_capacity(text.len());
        for ch in text.chars() {
            shown.push(ch);
            self.steps.push((
                Offset::Delay(per_char),
                Step::Action(Action::set_text(target, shown.clone())),
            ));
        }
        self
    }

    pub fn on_complete(mut self, signal: Signal) -> Self {
        self.on_complete = Some(signal);
        self
    }

    pub fn plan(&self) -> (Vec<Millis>, Millis) {
        let mut starts = Vec::with_capacity(self.steps.len());
        let (mut prev_start, mut prev_end, mut total) = (0 as Millis, 0 as Millis, 0 as Millis);
        for (offset, step) in &self.steps {
            let start = match *offset {
                Offset::AfterPrevious => prev_end,
                Offset::Delay(ms) => prev_end.saturating_add(ms),
                Offset::Overlap(ms) => prev_end.saturating_sub(ms),
                Offset::WithPrevious => prev_start,
                Offset::At(ms) => ms,
            };
            let end = start.saturating_add(step.duration());
            starts.push(start);
            prev_start = start;
            prev_end = end;
            total = total.max(end);
        }
        (starts, total)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Task {
    Start(Tween),
    Apply(Action),
    Finish(u64),
    Emit(Signal),
}

#[derive(Debug, Clone)]
struct Running {
    id: u64,
    tween: Tween,
    from: f64,
    start: Millis,
}

impl Running {
    fn value_at(&self, now: Millis) -> f64 {
        let elapsed = now.saturating_sub(self.start) as f64;
        let t = elapsed / self.tween.duration.max(1) as f64;
        self.from + (self.tween.to - self.from) * self.tween.easing.apply(t)
    }
}

/// Virtual clock plus an ordered task queue. Tasks due at the same instant
/// run in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Millis,
    next_seq: u64,
    queue: BTreeMap<(Millis, u64), Task>,
    running: Vec<Running>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.running.is_empty()
    }

    fn push(&mut self, at: Millis, task: Task) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((at, seq), task);
        TimerId(seq)
    }

    pub fn schedule(&mut self, delay: Millis, signal: Signal) -> TimerId {
        debug!(?signal, delay, "scheduling timer");
        self.push(self.now.saturating_add(delay), Task::Emit(signal))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|(_, seq), _| *seq != id.0);
        before != self.queue.len()
    }

    pub fn play(&mut self, timeline: Timeline) -> Millis {
        let (starts, total) = timeline.plan();
        let base = self.now;
        for (start, (_, step)) in starts.into_iter().zip(timeline.steps) {
            let task = match step {
                Step::Tween(tween) => Task::Start(tween),
                Step::Action(action) => Task::Apply(action),
            };
            self.push(base.saturating_add(start), task);
        }
        if let Some(signal) = timeline.on_complete {
            self.push(base.saturating_add(total), Task::Emit(signal));
        }
        debug!(total, "timeline queued");
        total
    }

    /// Runs every task due up to `until`, stopping early at the first emitted
    /// signal so the caller can react at that exact instant. Call again to
    /// continue; returns `None` once the clock has reached `until`.
    pub fn poll(&mut self, page: &mut Page, until: Millis) -> Option<Signal> {
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > until {
                break;
            }
            let ((at, _), task) = entry.remove_entry();
            self.now = self.now.max(at);
            self.sample(page);
            if let Some(signal) = self.run(page, task) {
                return Some(signal);
            }
        }
        self.now = self.now.max(until);
        self.sample(page);
        None
    }

    pub fn advance(&mut self, page: &mut Page, ms: Millis) -> Vec<Signal> {
        let until = self.now.saturating_add(ms);
        std::iter::from_fn(|| self.poll(page, until)).collect()
    }

    fn run(&mut self, page: &mut Page, task: Task) -> Option<Signal> {
        match task {
            Task::Start(tween) => self.start(page, tween),
            Task::Apply(action) => {
                action.apply(page);
            }
            Task::Finish(id) => {
                if let Some(pos) = self.running.iter().position(|r| r.id == id) {
                    let done = self.running.remove(pos);
                    if let Some(element) = page.find_mut(&done.tween.target) {
                        element.set(done.tween.property, done.tween.to);
                    }
                }
            }
            Task::Emit(signal) => return Some(signal),
        }
        None
    }

    fn start(&mut self, page: &mut Page, tween: Tween) {
        let Some(element) = page.find_mut(&tween.target) else {
            trace!(element = %tween.target, "skipping tween on missing element");
            return;
        };
        self.running
            .retain(|r| !(r.tween.target == tween.target && r.tween.property == tween.property));

        if tween.duration == 0 {
            element.set(tween.property, tween.to);
            return;
        }

        let from = element.get(tween.property);
        let id = self.next_seq;
        let finish_at = self.now.saturating_add(tween.duration);
        self.running.push(Running {
            id,
            tween,
            from,
            start: self.now,
        });
        self.push(finish_at, Task::Finish(id));
    }

    fn sample(&self, page: &mut Page) {
        for running in &self.running {
            if let Some(element) = page.find_mut(&running.tween.target) {
                element.set(running.tween.property, running.value_at(self.now));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{ids, Element};

    fn page() -> Page {
        Page::new(
            Element::new("body")
                .with_child(Element::new("div").with_id("box").with_opacity(0.0))
                .with_child(Element::new("p").with_id("label")),
        )
    }

    fn opacity(page: &Page, id: &str) -> f64 {
        page.find(id).unwrap().get(Property::Opacity)
    }

    #[test]
    fn easing_curves_hit_endpoints() {
        for easing in [Easing::Linear, Easing::OutQuad, Easing::InOutQuad, Easing::OutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert!(Easing::OutQuad.apply(0.5) > 0.5);
    }

    #[test]
    fn offsets_place_steps() {
        let timeline = Timeline::new()
            .tween(Tween::opacity("box", 1.0, 100))
            .tween_at(Offset::WithPrevious, Tween::opacity("label", 1.0, 50))
            .tween_at(Offset::Delay(20), Tween::opacity("box", 0.0, 100))
            .tween_at(Offset::Overlap(30), Tween::opacity("label", 0.0, 10))
            .action_at(Offset::At(5), Action::Show("box".into()));

        assert_eq!(timeline.plan(), (vec![0, 0, 70, 140, 5], 170));
    }

    #[test]
    fn tween_interpolates_and_lands_on_target() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        scheduler.play(Timeline::new().tween(Tween::opacity("box", 1.0, 100).easing(Easing::Linear)));

        scheduler.advance(&mut page, 50);
        assert!((opacity(&page, "box") - 0.5).abs() < 1e-9);

        scheduler.advance(&mut page, 60);
        assert_eq!(opacity(&page, "box"), 1.0);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn completion_signal_fires_after_last_step() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        let total = scheduler.play(
            Timeline::new()
                .tween(Tween::opacity("box", 1.0, 200))
                .on_complete(Signal::RetryRestored),
        );
        assert_eq!(total, 200);

        assert!(scheduler.advance(&mut page, 199).is_empty());
        assert_eq!(scheduler.advance(&mut page, 1), vec![Signal::RetryRestored]);
        assert_eq!(opacity(&page, "box"), 1.0);
    }

    #[test]
    fn poll_stops_at_signal_time() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, Signal::OnboardingDue);

        assert_eq!(scheduler.poll(&mut page, 1000), Some(Signal::OnboardingDue));
        assert_eq!(scheduler.now(), 300);
        assert_eq!(scheduler.poll(&mut page, 1000), None);
        assert_eq!(scheduler.now(), 1000);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(1000, Signal::OnboardingDue);

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(&mut page, 2000).is_empty());
    }

    #[test]
    fn typed_text_reveals_one_character_at_a_time() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        scheduler.play(
            Timeline::new()
                .typed("label", "Hey", 10)
                .on_complete(Signal::PromptTyped),
        );

        scheduler.advance(&mut page, 20);
        assert_eq!(page.find("label").unwrap().text(), "He");
        assert_eq!(scheduler.advance(&mut page, 10), vec![Signal::PromptTyped]);
        assert_eq!(page.find("label").unwrap().text(), "Hey");
    }

    #[test]
    fn missing_targets_are_skipped() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        scheduler.play(
            Timeline::new()
                .tween(Tween::opacity(ids::SUCCESS_CHECK, 1.0, 100))
                .action(Action::add_class(ids::LOCK_ICON, "locked"))
                .tween(Tween::opacity("box", 1.0, 100))
                .on_complete(Signal::PromptTyped),
        );

        assert_eq!(scheduler.advance(&mut page, 200), vec![Signal::PromptTyped]);
        assert_eq!(opacity(&page, "box"), 1.0);
    }

    #[test]
    fn newer_tween_replaces_running_one() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        scheduler.play(Timeline::new().tween(Tween::opacity("box", 1.0, 1000).easing(Easing::Linear)));
        scheduler.advance(&mut page, 100);

        scheduler.play(Timeline::new().tween(Tween::opacity("box", 0.0, 100).easing(Easing::Linear)));
        scheduler.advance(&mut page, 2000);
        assert_eq!(opacity(&page, "box"), 0.0);
    }

    #[test]
    fn far_future_work_lands_at_end_of_clock() {
        let mut page = page();
        let mut scheduler = Scheduler::new();
        scheduler.advance(&mut page, Millis::MAX - 10);

        scheduler.schedule(100, Signal::OnboardingDue);
        scheduler.play(
            Timeline::new()
                .tween(Tween::opacity("box", 1.0, 50))
                .tween_at(Offset::Delay(Millis::MAX), Tween::opacity("label", 1.0, 50))
                .on_complete(Signal::PromptTyped),
        );
        assert_eq!(
            scheduler.advance(&mut page, Millis::MAX),
            vec![Signal::OnboardingDue, Signal::PromptTyped]
        );
        assert_eq!(scheduler.now(), Millis::MAX);
        assert_eq!(opacity(&page, "box"), 1.0);
        assert_eq!(opacity(&page, "label"), 1.0);
        assert!(scheduler.is_idle());
    }
}
