pub mod card;
pub mod deck;
pub mod label;

pub use card::{CardFace, CardRecord, ImageUris, Legality, normalize_oracle_text};
pub use deck::{DEFAULT_DECK_NAME, Deck};
pub use label::{Label, LabelSet};
