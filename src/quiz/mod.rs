pub mod driver;
pub mod knowledge;
pub mod questions;
pub mod sampler;
pub mod session;

pub use driver::{spawn_session, SessionCommand, SessionHandle, SessionSnapshot};
pub use knowledge::{KnowledgeCategory, KnowledgeQuestion};
pub use questions::{assemble_quiz, Archetype, Question, QuestionGenerator, QuizSettings};
pub use session::{AnswerState, Phase, QuizSession, Schedule, TimerEvent, TimerKind};
