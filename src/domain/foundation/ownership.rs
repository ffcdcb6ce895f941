//! Single-owner aggregates.
//!
//! A club's owner bypasses most role checks, so policies ask the
//! aggregate rather than comparing ids inline.

use super::UserId;

pub trait OwnedByUser {
    fn owner_id(&self) -> &UserId;

    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }
}
