mod book;
mod open_library;
mod profile;
mod weights;

pub use book::Book;
pub use open_library::{OpenLibraryDoc, OpenLibrarySearchResponse};
pub use profile::{PreferenceProfile, UserAction};
pub use weights::WeightMap;
