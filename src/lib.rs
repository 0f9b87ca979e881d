//! clinicQ - Real-time patient queue and dispatch engine.
//!
//! Issues daily tokens to arriving patients, orders them for consultation
//! (appointments ahead of walk-ins, FIFO within a channel), and arbitrates
//! "who is seen next" between concurrent reception and doctor terminals.
//!
//! This library exposes the queue engine only; HTTP routing, authentication,
//! and the relational patient/appointment store live in the calling service.

pub mod protocol;
pub mod queue;
pub mod telemetry;
