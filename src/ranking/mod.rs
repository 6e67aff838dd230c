//! Term-weighted representation of the catalog and cosine scoring against it.

mod index;
mod vectorizer;

pub use index::RankerIndex;
pub use vectorizer::{cosine_similarity, SparseVector, TfidfVectorizer};
