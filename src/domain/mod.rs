pub mod envelope;
pub mod ignore;
pub mod item;

pub use envelope::{Envelope, EnvelopeCode, FeedResult};
pub use ignore::IgnoreList;
pub use item::Item;
