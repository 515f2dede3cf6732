mod constants;
mod memecoin;
mod slot;

pub use constants::*;
pub use memecoin::*;
pub use slot::*;

#[cfg(test)]
mod tests;
