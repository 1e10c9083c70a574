pub mod engine;
pub mod questions;

pub use engine::{CardFace, QuizEngine, QuizSession, RenderedCard, RenderedChoice};
pub use questions::{Choice, QuizQuestion, QUESTIONS};
