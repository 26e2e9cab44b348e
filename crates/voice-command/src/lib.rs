//! Voice control for the forecast dashboard.
//!
//! Audio goes to an external speech-to-text service, the transcript is then
//! interpreted locally into a company and a forecast horizon.

pub mod error;
pub mod parser;
pub mod speech;

pub use error::{SpeechError, SpeechResult};
pub use parser::{parse_command, ParsedCommand};
pub use speech::{recognize_and_parse, HttpSpeechRecognizer, SpeechConfig, SpeechRecognizer};
