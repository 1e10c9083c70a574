use tracing::{info, instrument};

use crate::{
    dom::{ids, Page, Property},
    timeline::{Action, Easing, Millis, Offset, Scheduler, Signal, Timeline, Tween},
};

pub const PROMPT: &str =
    "You're heading out for a coffee and your laptop is unlocked. What do you do?";

const TYPE_SPEED: Millis = 35;
const SHAKE_DURATION: Millis = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Idle,
    AwaitingChoice,
    /// Terminal: the correct answer was chosen and nothing resets it.
    Locked,
    ErrorShown {
        retry_armed: bool,
    },
}

#[derive(Debug, Default)]
pub struct LockScreen {
    state: LockState,
}

fn set_choices_disabled(page: &mut Page, disabled: bool) {
    for id in [ids::BTN_LOCK, ids::BTN_IGNORE] {
        if let Some(button) = page.find_mut(id) {
            button.set_disabled(disabled);
        }
    }
}

impl LockScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    #[instrument(level = "info", skip_all)]
    pub fn activate(&mut self, page: &mut Page, scheduler: &mut Scheduler) {
        self.state = LockState::Idle;
        set_choices_disabled(page, true);

        scheduler.play(
            Timeline::new()
                .tween(Tween::new(ids::LOCK_CARD, Property::TranslateY, 40.0, 0))
                .tween(Tween::opacity(ids::LOCK_CARD, 1.0, 600))
                .tween_at(
                    Offset::WithPrevious,
                    Tween::new(ids::LOCK_CARD, Property::TranslateY, 0.0, 600)
                        .easing(Easing::OutCubic),
                ),
        );
        scheduler.play(
            Timeline::new()
                .typed(ids::LOCK_PROMPT, PROMPT, TYPE_SPEED)
                .on_complete(Signal::PromptTyped),
        );
    }

    pub fn on_prompt_typed(&mut self, page: &mut Page, scheduler: &mut Scheduler) {
        if self.state != LockState::Idle {
            return;
        }
        set_choices_disabled(page, false);
        let mut timeline = Timeline::new();
        for id in [ids::BTN_LOCK, ids::BTN_IGNORE] {
            timeline = timeline
                .tween_at(Offset::At(0), Tween::new(id, Property::TranslateY, 20.0, 0))
                .tween_at(Offset::At(0), Tween::opacity(id, 1.0, 400))
                .tween_at(Offset::At(0), Tween::new(id, Property::TranslateY, 0.0, 400));
        }
        scheduler.play(timeline);
        self.state = LockState::AwaitingChoice;
        info!("lock-screen choices enabled");
    }

    #[instrument(level = "info", skip_all)]
    pub fn choose_lock(&mut self, page: &mut Page, scheduler: &mut Scheduler) -> bool {
        if self.state != LockState::AwaitingChoice {
            return false;
        }
        set_choices_disabled(page, true);

        let mut timeline = Timeline::new()
            .tween(Tween::new(ids::LOCK_CARD, Property::Scale, 0.92, 400))
            .tween_at(Offset::WithPrevious, Tween::opacity(ids::LOCK_CARD, 0.3, 400))
            .action(Action::Show(ids::LOCKED_OVERLAY.into()))
            .tween(Tween::opacity(ids::LOCKED_OVERLAY, 1.0, 500))
            .action_at(Offset::Delay(300), Action::add_class(ids::LOCK_ICON, "locked"))
            .tween(Tween::opacity(ids::LOCKED_MESSAGE, 1.0, 400));

        if page.contains(ids::SUCCESS_CHECK) {
            timeline = timeline
                .tween(Tween::new(ids::SUCCESS_CHECK, Property::Scale, 0.5, 0))
                .tween(Tween::opacity(ids::SUCCESS_CHECK, 1.0, 400))
                .tween_at(
                    Offset::WithPrevious,
                    Tween::new(ids::SUCCESS_CHECK, Property::Scale, 1.0, 400)
                        .easing(Easing::OutCubic),
                );
        }
        if page.contains(ids::SUCCESS_SUBTEXT) {
            timeline = timeline.tween_at(
                Offset::Overlap(200),
                Tween::opacity(ids::SUCCESS_SUBTEXT, 1.0, 400),
            );
        }

        scheduler.play(timeline);
        self.state = LockState::Locked;
        info!("screen locked");
        true
    }

    #[instrument(level = "info", skip_all)]
    pub fn choose_ignore(&mut self, page: &mut Page, scheduler: &mut Scheduler) -> bool {
        if self.state != LockState::AwaitingChoice {
            return false;
        }
        set_choices_disabled(page, true);

        scheduler.play(
            Timeline::new()
                .tween(Tween::opacity(ids::LOCK_CARD, 0.4, 300))
                .action(Action::Show(ids::ERROR_OVERLAY.into()))
                .action_at(
                    Offset::WithPrevious,
                    Action::add_class(ids::LOCK_CONTAINER, "shake"),
                )
                .tween(Tween::opacity(ids::ERROR_OVERLAY, 1.0, 400))
                .action_at(
                    Offset::At(300 + SHAKE_DURATION),
                    Action::remove_class(ids::LOCK_CONTAINER, "shake"),
                ),
        );
        self.state = LockState::ErrorShown { retry_armed: true };
        info!("screen left unlocked");
        true
    }

    /// Unbinds the retry handler and plays the error path in reverse. A
    /// second click before or after restoration does nothing.
    #[instrument(level = "info", skip_all)]
    pub fn retry(&mut self, _page: &mut Page, scheduler: &mut Scheduler) -> bool {
        if self.state != (LockState::ErrorShown { retry_armed: true }) {
            return false;
        }
        self.state = LockState::ErrorShown { retry_armed: false };

        scheduler.play(
            Timeline::new()
                .tween(Tween::opacity(ids::ERROR_OVERLAY, 0.0, 300))
                .action(Action::Hide(ids::ERROR_OVERLAY.into()))
                .tween(Tween::opacity(ids::LOCK_CARD, 1.0, 300))
                .on_complete(Signal::RetryRestored),
        );
        true
    }

    pub fn on_retry_restored(&mut self, page: &mut Page, _scheduler: &mut Scheduler) {
        if !matches!(self.state, LockState::ErrorShown { .. }) {
            return;
        }
        set_choices_disabled(page, false);
        self.state = LockState::AwaitingChoice;
        info!("lock-screen choices restored");
    }
}
