//! Summaries of saved text from a locally hosted language model server
//!
//! The server speaks the OpenAI chat completion protocol over plain HTTP.
//! Replies are checked against the expected shape and anything else fails
//! closed as an error response.

mod client;
mod error;
mod types;

pub use client::SummarizerClient;
pub use error::SummarizerError;
pub use types::{SummaryOptions, SummaryRequest, SummaryResponse, SummaryStatus};
