mod spells;

pub use spells::*;
