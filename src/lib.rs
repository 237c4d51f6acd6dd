pub mod configs;
pub mod generator;
pub mod overrides;
pub mod pacing;
pub mod translations;
pub mod translators;
