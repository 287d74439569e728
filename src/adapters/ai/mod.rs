//! Generation adapters.

mod mock_generator;
mod openai_generator;

pub use mock_generator::{MockGenerator, MockReply};
pub use openai_generator::{OpenAiConfig, OpenAiGenerator};
