// Pipeline processing: normalization, novelty, geocoding, resolution and merge

pub mod geocode;
pub mod key;
pub mod merge;
pub mod normalize;
pub mod novelty;
pub mod resolve;

pub use geocode::ReverseGeocoder;
pub use key::DedupKey;
