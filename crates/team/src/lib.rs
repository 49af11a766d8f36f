mod client;
mod error;
mod types;

pub use client::{SLACK_API_URL, SlackTeamClient};
pub use error::Error;
pub use types::*;
