//! Domain entities - Core objects the ward engine reasons about

mod character;
mod damage;
mod effect;
mod item;
mod ward;

pub use character::{ActorKind, Character};
pub use damage::{DamageComponent, DamageEvent, DamageType};
pub use effect::{ActiveEffect, SpecialDuration};
pub use item::{Activity, Item, ItemKind, ItemUses, SpellDetails, WardFlags};
pub use ward::{Absorption, Replenishment, WardResource};
