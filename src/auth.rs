// ABOUTME: Sign-in resolution against the (phone, pin) compound unique index
// ABOUTME: A wrong pair is an ordinary miss, not an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Sign-In
//!
//! Credential checking is a single point lookup on the compound
//! `by_phone_pin` unique index. There is no hashing and no session
//! state here; the frontend contract stores pins in the clear and
//! treats a failed pair as an empty result.

use tracing::debug;

use crate::errors::StoreError;
use crate::models::Account;
use crate::store::{IndexKey, MemoryStore};

/// Resolve a (phone, pin) pair to its account, if any.
pub async fn sign_in(
    store: &MemoryStore,
    phone_number: &str,
    pin: &str,
) -> Result<Option<Account>, StoreError> {
    let account = store
        .find_unique::<Account>("by_phone_pin", &IndexKey::pair(phone_number, pin))
        .await?;
    debug!(phone = %phone_number, hit = account.is_some(), "sign-in lookup");
    Ok(account)
}
