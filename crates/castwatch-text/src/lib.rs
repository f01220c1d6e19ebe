pub mod error;
pub mod extract;
pub mod normalize;

pub use error::{Result, TextError};
pub use extract::extract_first_json_text;
pub use normalize::{jaccard, normalise, unique_sorted_times, unique_strings};
