use std::{error::Error, fmt, str::FromStr};

use crate::timeline::Millis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Click(String),
    Lock,
    Ignore,
    Retry,
    Flip,
    Choose(usize),
    Next,
    Restart,
    Wait(Millis),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError(String);

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Enter 'help' to see usages.", self.0)
    }
}

impl Error for CommandError {}

impl Command {
    pub fn descriptions() -> &'static str {
        "help            display this text\n\
         show            redraw the current slide\n\
         click <id>      click any element by id\n\
         lock | ignore   answer the lock-screen prompt\n\
         retry           try the lock-screen prompt again\n\
         flip            turn the quiz card over\n\
         choose <n>      pick the n-th choice on the card\n\
         next            go to the next card (or finish)\n\
         restart         start the quiz over\n\
         wait <ms>       let animations run for <ms> milliseconds\n\
         quit            leave the presentation"
    }
}

fn argument<T: FromStr>(name: &str, arg: Option<&str>) -> Result<T, CommandError> {
    let arg = arg.ok_or_else(|| CommandError(format!("'{name}' needs an argument.")))?;
    arg.parse()
        .map_err(|_| CommandError(format!("'{arg}' is not a valid argument for '{name}'.")))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError("Empty command.".into()));
        };
        let name = name.to_ascii_lowercase();
        let arg = words.next();

        let command = match name.as_str() {
            "help" | "?" => Command::Help,
            "show" => Command::Show,
            "click" => Command::Click(argument::<String>("click", arg)?),
            "lock" => Command::Lock,
            "ignore" => Command::Ignore,
            "retry" => Command::Retry,
            "flip" => Command::Flip,
            "choose" => match argument::<usize>("choose", arg)? {
                0 => return Err(CommandError("Choices are numbered from 1.".into())),
                n => Command::Choose(n),
            },
            "next" | "finish" => Command::Next,
            "restart" => Command::Restart,
            "wait" => Command::Wait(argument("wait", arg)?),
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError(format!("Unknown command '{other}'."))),
        };
        Ok(command)
    }
}
