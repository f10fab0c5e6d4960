pub mod ruleset;
pub mod slot;
