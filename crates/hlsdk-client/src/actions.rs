//! Unsigned exchange action bodies.
//!
//! Signing is out of scope: callers sign the serialized action elsewhere and
//! wrap it in a [`SignedAction`](crate::exchange::SignedAction).

use serde::{Deserialize, Serialize};

/// `spotUser` action: opt in or out of spot dust conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "spotUser", rename_all = "camelCase")]
pub struct SpotUser {
    pub toggle_spot_dusting: ToggleSpotDusting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSpotDusting {
    pub opt_out: bool,
}

pub fn spot_user(opt_out: bool) -> SpotUser {
    SpotUser {
        toggle_spot_dusting: ToggleSpotDusting { opt_out },
    }
}
