pub mod client;
pub mod error;
pub mod model;

pub use client::DietTrackerApi;
pub use error::DietTrackerError;
pub use model::{DietSummary, Feed, FeedPatch, MutationOutcome, NewFeed, Registration, User};
