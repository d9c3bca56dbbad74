//! Caller Identity
//!
//! The upstream gateway authenticates callers and forwards who they are in the `x-actor-uuid`
//! and `x-actor-role` headers.

use std::str::FromStr;

use salvo::prelude::{Depot, StatusError};
use uuid::Uuid;

use grosir_app::identities::{ActorUuid, BuyerUuid};

pub(crate) mod middleware;

pub(crate) const ACTOR_UUID_HEADER: &str = "x-actor-uuid";
pub(crate) const ACTOR_ROLE_HEADER: &str = "x-actor-role";

const IDENTITY_DEPOT_KEY: &str = "identity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Admin,
    Buyer,
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("admin") {
            Ok(Self::Admin)
        } else if s.eq_ignore_ascii_case("buyer") {
            Ok(Self::Buyer)
        } else {
            Err(())
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Identity {
    pub(crate) uuid: Uuid,
    pub(crate) role: Role,
}

impl Identity {
    pub(crate) fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub(crate) fn actor(&self) -> ActorUuid {
        ActorUuid::from_uuid(self.uuid)
    }

    pub(crate) fn buyer(&self) -> BuyerUuid {
        BuyerUuid::from_uuid(self.uuid)
    }

    /// Admins may act on anything; buyers only on what they own.
    pub(crate) fn can_access(&self, owner: BuyerUuid) -> bool {
        self.is_admin() || self.buyer() == owner
    }
}

pub(crate) trait IdentityDepotExt {
    fn insert_identity(&mut self, identity: Identity);

    fn identity_or_401(&self) -> Result<Identity, StatusError>;

    fn admin_or_403(&self) -> Result<Identity, StatusError>;
}

impl IdentityDepotExt for Depot {
    fn insert_identity(&mut self, identity: Identity) {
        self.insert(IDENTITY_DEPOT_KEY, identity);
    }

    fn identity_or_401(&self) -> Result<Identity, StatusError> {
        self.get::<Identity>(IDENTITY_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }

    fn admin_or_403(&self) -> Result<Identity, StatusError> {
        let identity = self.identity_or_401()?;

        if !identity.is_admin() {
            return Err(StatusError::forbidden().brief("Administrator role required"));
        }

        Ok(identity)
    }
}
