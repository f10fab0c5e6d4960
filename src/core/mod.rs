pub mod language;
pub mod pattern;
pub mod sampler;
pub mod syllable;
pub mod text;
pub mod word;
