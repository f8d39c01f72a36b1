pub mod core;
pub mod prelude;

// Lets the crate refer to itself as `dog_gl` from inside its own modules
extern crate self as dog_gl;

#[cfg(test)]
mod tests;
