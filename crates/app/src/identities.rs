//! Identities owned by the external identity service.

use crate::uuids::TypedUuid;

/// A buying account.
#[derive(Debug)]
pub struct Buyer;

/// Buyer UUID
pub type BuyerUuid = TypedUuid<Buyer>;

/// Whoever caused a status change: an administrator, or a buyer acting on their own order.
#[derive(Debug)]
pub struct Actor;

/// Actor UUID
pub type ActorUuid = TypedUuid<Actor>;

/// A delivery address.
#[derive(Debug)]
pub struct Address;

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;
