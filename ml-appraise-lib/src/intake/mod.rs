//! Entry classification for raw artifact references
//!
//! This module turns free-form input (a literal URL, a text file of comma-separated URL lines,
//! or a JSON array of URLs) into an ordered sequence of [`Entry`] values.
//!
//! # Implementation Model
//!
//! Every token is classified by [`classify_url`] into a [`Category`] or dropped when it is not
//! recognized. A [`ClassificationSession`] walks the lines in input order and keeps the dataset
//! registry: every dataset URL it sees is recorded, and a model on a line without a dataset
//! inherits the most recently seen one. The session is an explicit value, so independent runs
//! never share inference state.

mod category;
mod entry;
mod input_source;
mod session;
mod url_kind;

pub use category::Category;
pub use entry::Entry;
pub use input_source::{InputSource, tokenize};
pub use session::{ClassificationSession, DatasetSighting};
pub use url_kind::{UNKNOWN_NAME, classify_url, extract_name, hub_repo_id};
