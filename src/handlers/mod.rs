// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth). Write endpoints inside the
// protected tier additionally check the configured write roles.
pub mod public;
pub mod protected;
