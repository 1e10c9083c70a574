use std::{io::Write, time::Duration};

use rand::Rng;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{info, instrument, warn};

use crate::{
    commands::Command,
    dom::ids,
    presentation::Presentation,
    timeline::Millis,
    view, AppResult,
};

fn target_for<R: Rng>(presentation: &Presentation<R>, command: &Command) -> Option<String> {
    let id = match command {
        Command::Click(id) => return Some(id.clone()),
        Command::Choose(n) => {
            return presentation
                .quiz()
                .and_then(|quiz| quiz.card())
                .and_then(|card| card.choices().get(n.checked_sub(1)?))
                .map(|choice| choice.control_id().to_owned());
        }
        Command::Lock => ids::BTN_LOCK,
        Command::Ignore => ids::BTN_IGNORE,
        Command::Retry => ids::BTN_RETRY,
        Command::Flip => ids::QUIZ_CARD,
        Command::Next => ids::QUIZ_NEXT,
        Command::Restart => ids::QUIZ_RESTART,
        Command::Help | Command::Show | Command::Wait(_) | Command::Quit => return None,
    };
    Some(id.to_owned())
}

fn screen<R: Rng>(presentation: &Presentation<R>) -> String {
    let mut text = view::render(presentation.page(), presentation.scene());
    if let Some(status) = view::quiz_status(presentation.page()) {
        text.push_str(&status);
        text.push('\n');
    }
    text
}

#[instrument(level = "info", skip(presentation))]
pub fn execute<R: Rng>(presentation: &mut Presentation<R>, command: Command) -> String {
    match command {
        Command::Help => Command::descriptions().to_owned(),
        Command::Show | Command::Quit => screen(presentation),
        Command::Wait(ms) => {
            presentation.advance(ms);
            screen(presentation)
        }
        ref other => match target_for(presentation, other) {
            Some(id) if presentation.click(&id) => screen(presentation),
            Some(id) => {
                info!(%id, "click had no effect");
                format!("Nothing happens: '{id}' can't be clicked right now.")
            }
            None => "There is no such choice on this card.".to_owned(),
        },
    }
}

struct AnimationClock {
    started: Instant,
    advanced: Millis,
}

impl AnimationClock {
    fn new(started: Instant) -> Self {
        Self {
            started,
            advanced: 0,
        }
    }

    // Measured from the session start so sub-millisecond remainders carry
    // over to the next tick.
    fn due(&mut self, now: Instant) -> Millis {
        let elapsed = now.duration_since(self.started).as_millis();
        let elapsed = Millis::try_from(elapsed).unwrap_or(Millis::MAX);
        let due = elapsed.saturating_sub(self.advanced);
        self.advanced = self.advanced.max(elapsed);
        due
    }
}

pub async fn run<R, I, W>(
    presentation: &mut Presentation<R>,
    input: I,
    output: &mut W,
    tick: Duration,
) -> AppResult<()>
where
    R: Rng,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut ticker = time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock = AnimationClock::new(Instant::now());

    writeln!(output, "{}", screen(presentation))?;
    loop {
        tokio::select! {
            biased;
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => writeln!(output, "{}", execute(presentation, command))?,
                    Err(err) => {
                        warn!(%err, line, "invalid command");
                        writeln!(output, "{err}")?;
                    }
                }
                output.flush()?;
            }
            _ = ticker.tick() => {
                presentation.advance(clock.due(Instant::now()));
            }
        }
    }
    info!("session ended");
    Ok(())
}
