use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, instrument};
use url::Url;

use crate::{
    dom::{ids, Page},
    lock_screen::{LockScreen, LockState},
    quiz::{QuizEngine, QUESTIONS},
    scene::{self, SceneId},
    timeline::{Millis, Scheduler, Signal},
};

#[derive(Debug)]
pub struct Presentation<R = StdRng> {
    page: Page,
    scheduler: Scheduler,
    rng: R,
    scene: SceneId,
    lock: Option<LockScreen>,
    quiz: Option<QuizEngine>,
}

impl Presentation<StdRng> {
    pub fn open(url: &Url) -> Self {
        Self::load(url, Page::standard(), StdRng::from_entropy())
    }
}

impl<R: Rng> Presentation<R> {
    #[instrument(level = "info", skip(url, page, rng), fields(url = %url))]
    pub fn load(url: &Url, mut page: Page, mut rng: R) -> Self {
        let scene = SceneId::from_url(url);
        scene::activate(&mut page, scene);

        let mut scheduler = Scheduler::new();
        let mut lock = None;
        let mut quiz = None;
        match scene {
            SceneId::Scene1 => {
                let mut exercise = LockScreen::new();
                exercise.activate(&mut page, &mut scheduler);
                lock = Some(exercise);
            }
            SceneId::Scene2 => {
                let mut engine = QuizEngine::new(&QUESTIONS);
                engine.start(&mut page, &mut scheduler, &mut rng);
                quiz = Some(engine);
            }
            SceneId::Scene3 => info!("closing slide has no interaction"),
        }

        Self {
            page,
            scheduler,
            rng,
            scene,
            lock,
            quiz,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn lock_state(&self) -> Option<LockState> {
        self.lock.as_ref().map(LockScreen::state)
    }

    pub fn quiz(&self) -> Option<&QuizEngine> {
        self.quiz.as_ref()
    }

    /// Delivers a click to `id`. Clicks on missing, hidden or disabled
    /// elements never reach a handler. Returns whether anything reacted.
    #[instrument(level = "debug", skip(self))]
    pub fn click(&mut self, id: &str) -> bool {
        if !self.page.is_interactive(id) {
            debug!("click ignored");
            return false;
        }

        let page = &mut self.page;
        let scheduler = &mut self.scheduler;
        let rng = &mut self.rng;
        match id {
            ids::BTN_LOCK => self
                .lock
                .as_mut()
                .is_some_and(|lock| lock.choose_lock(page, scheduler)),
            ids::BTN_IGNORE => self
                .lock
                .as_mut()
                .is_some_and(|lock| lock.choose_ignore(page, scheduler)),
            ids::BTN_RETRY => self
                .lock
                .as_mut()
                .is_some_and(|lock| lock.retry(page, scheduler)),
            ids::QUIZ_CARD => self
                .quiz
                .as_mut()
                .is_some_and(|quiz| quiz.flip(page, scheduler)),
            ids::QUIZ_NEXT => self
                .quiz
                .as_mut()
                .is_some_and(|quiz| quiz.go_to_next(page, scheduler, rng)),
            ids::QUIZ_RESTART => match self.quiz.as_mut() {
                Some(quiz) => {
                    quiz.restart(page, scheduler, rng);
                    true
                }
                None => false,
            },
            other => self
                .quiz
                .as_mut()
                .filter(|quiz| quiz.owns_control(other))
                .is_some_and(|quiz| quiz.select_choice(other, page)),
        }
    }

    pub fn advance(&mut self, ms: Millis) {
        let until = self.scheduler.now().saturating_add(ms);
        while let Some(signal) = self.scheduler.poll(&mut self.page, until) {
            self.dispatch(signal);
        }
    }

    fn dispatch(&mut self, signal: Signal) {
        debug!(?signal, at = self.scheduler.now(), "signal");
        let page = &mut self.page;
        let scheduler = &mut self.scheduler;
        match signal {
            Signal::PromptTyped => {
                if let Some(lock) = self.lock.as_mut() {
                    lock.on_prompt_typed(page, scheduler);
                }
            }
            Signal::RetryRestored => {
                if let Some(lock) = self.lock.as_mut() {
                    lock.on_retry_restored(page, scheduler);
                }
            }
            Signal::OnboardingDue => {
                if let Some(quiz) = self.quiz.as_mut() {
                    quiz.show_onboarding(page, scheduler);
                }
            }
        }
    }
}
