pub mod bilingual;
pub mod gc_articles;
pub mod pairing;
pub mod traits;

pub use bilingual::{fetch_bilingual, BilingualFeed};
pub use gc_articles::GcArticlesSource;
pub use pairing::{derive_translation_key, pair_translations, TranslationPair};
pub use traits::ContentSource;
