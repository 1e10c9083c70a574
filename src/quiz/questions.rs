use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    text: &'static str,
    correct: bool,
    message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    scenario: &'static str,
    choices: [Choice; 3],
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, if self.correct { 'V' } else { 'X' })
    }
}

impl Choice {
    pub const fn new(text: &'static str, correct: bool, message: &'static str) -> Self {
        Self {
            text,
            correct,
            message,
        }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn is_correct(&self) -> bool {
        self.correct
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl QuizQuestion {
    pub const fn new(scenario: &'static str, choices: [Choice; 3]) -> Self {
        Self { scenario, choices }
    }

    pub fn scenario(&self) -> &'static str {
        self.scenario
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn correct_choice(&self) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.correct)
    }
}

pub static QUESTIONS: [QuizQuestion; 5] = [
    QuizQuestion::new(
        "An email from \"IT Support\" says your password expires today and links to a login page.",
        [
            Choice::new(
                "Click the link and update it",
                false,
                "Urgent password resets are a classic phishing hook. The login page harvests whatever you type.",
            ),
            Choice::new(
                "Report it as phishing",
                true,
                "Right. Reporting lets the security team warn everyone else who got the same message.",
            ),
            Choice::new(
                "Reply and ask if it's real",
                false,
                "Replying goes straight to the attacker, who will happily confirm it's legitimate.",
            ),
        ],
    ),
    QuizQuestion::new(
        "You find a USB stick labelled \"Salaries 2024\" in the car park.",
        [
            Choice::new(
                "Plug it in to find the owner",
                false,
                "Dropped drives are a known way to get malware past the firewall. Never plug in unknown media.",
            ),
            Choice::new(
                "Hand it to IT security",
                true,
                "Correct. Security can inspect it safely, and the label is exactly the bait an attacker would use.",
            ),
            Choice::new(
                "Throw it in the bin",
                false,
                "Better than plugging it in, but security should know someone may be targeting the office.",
            ),
        ],
    ),
    QuizQuestion::new(
        "A colleague asks to borrow your login because theirs is locked out.",
        [
            Choice::new(
                "Share it just this once",
                false,
                "Anything done with your account is recorded as you. Shared credentials also end up written down.",
            ),
            Choice::new(
                "Log in for them and step away",
                false,
                "That is sharing your account with extra steps. Your session is still in someone else's hands.",
            ),
            Choice::new(
                "Point them to the help desk",
                true,
                "Exactly. The help desk can unlock their account without anyone giving up their password.",
            ),
        ],
    ),
    QuizQuestion::new(
        "You're at a café and need to send a client contract. The open Wi-Fi is called \"Free_Cafe_WiFi\".",
        [
            Choice::new(
                "Connect through the company VPN",
                true,
                "Good call. The VPN encrypts your traffic even if the hotspot is run by someone snooping.",
            ),
            Choice::new(
                "Connect directly, it's quick",
                false,
                "Open hotspots are easy to impersonate, and everything sent in the clear can be read.",
            ),
            Choice::new(
                "Ask the barista for the password first",
                false,
                "A password doesn't stop other customers on the same network from watching your traffic.",
            ),
        ],
    ),
    QuizQuestion::new(
        "Someone carrying boxes asks you to hold the secure door open for them.",
        [
            Choice::new(
                "Hold it, they look busy",
                false,
                "Tailgating relies on politeness. Anyone can carry boxes.",
            ),
            Choice::new(
                "Ask them to badge in, offer to hold the boxes",
                true,
                "Right. You stay helpful while every person still proves they belong inside.",
            ),
            Choice::new(
                "Ignore them and walk off",
                false,
                "The door stays shut, but an unknown person at a secure entrance is worth reporting.",
            ),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_question_has_exactly_one_correct_choice() {
        for question in &QUESTIONS {
            let correct = question.choices().iter().filter(|c| c.is_correct()).count();
            assert_eq!(correct, 1, "{}", question.scenario());
            assert!(question.correct_choice().is_some());
        }
    }

    #[test]
    fn feedback_is_never_empty() {
        assert!(QUESTIONS
            .iter()
            .flat_map(|q| q.choices())
            .all(|c| !c.text().is_empty() && !c.message().is_empty()));
    }

    #[test]
    fn choice_display_marks_correctness() {
        let question = &QUESTIONS[0];
        assert_eq!(question.choices()[1].to_string(), "Report it as phishing (V)");
    }
}
