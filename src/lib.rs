// Boostbot: relays podcasting 2.0 Lightning boosts to chat destinations.
//
// This is the library root. The pure pipeline (boost, message, route)
// never does I/O; lnd and deliver hold the network seams, and pump wires
// the two sides together.

pub mod boost;
pub mod config;
pub mod deliver;
pub mod lnd;
pub mod message;
pub mod pump;
pub mod route;
