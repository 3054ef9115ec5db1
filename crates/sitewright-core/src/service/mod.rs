//! Business logic services (use cases).
//!
//! Services orchestrate the model calls, text pipeline and stores. They
//! depend on traits (ports), never on concrete infrastructure.

pub mod studio;
