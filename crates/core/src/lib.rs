pub mod i18n;
pub mod models;
pub mod urgency;

pub use i18n::{Catalog, Locale, Translator};
pub use models::*;
pub use urgency::classify_urgency;
