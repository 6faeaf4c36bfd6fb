//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and the pure scoring functions.
//! They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod autonomy;
