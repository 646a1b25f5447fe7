//! Materials log: shop consumables ordered for a body technician.
//!
//! Validation only; persistence lives in the infra crate.

pub mod material;

pub use material::{Material, MaterialFilter, MaterialPatch, NewMaterial};
