// ABOUTME: Session-scoped holder of the current user tier
// ABOUTME: Lock-free last-write-wins updates driven by authentication state changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::UserTier;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::info;

const fn encode(tier: UserTier) -> u8 {
    match tier {
        UserTier::Guest => 0,
        UserTier::Registered => 1,
        UserTier::Premium => 2,
    }
}

const fn decode(value: u8) -> UserTier {
    match value {
        1 => UserTier::Registered,
        2 => UserTier::Premium,
        _ => UserTier::Guest,
    }
}

/// Tier held for the lifetime of a session
///
/// Gate operations take the tier explicitly; hosts read it from here.
#[derive(Debug)]
pub struct TierSession {
    tier: AtomicU8,
}

impl Default for TierSession {
    fn default() -> Self {
        Self::new(UserTier::Guest)
    }
}

impl TierSession {
    /// Start a session at `tier`
    #[must_use]
    pub const fn new(tier: UserTier) -> Self {
        Self {
            tier: AtomicU8::new(encode(tier)),
        }
    }

    /// Start a session from authentication state
    #[must_use]
    pub const fn from_auth_state(authenticated: bool) -> Self {
        Self::new(UserTier::from_auth_state(authenticated))
    }

    /// Current tier
    #[must_use]
    pub fn current_tier(&self) -> UserTier {
        decode(self.tier.load(Ordering::Acquire))
    }

    /// Replace the tier; repeated calls with the same tier change nothing
    pub fn set_user_tier(&self, tier: UserTier) {
        let previous = decode(self.tier.swap(encode(tier), Ordering::AcqRel));
        if previous != tier {
            info!(from = %previous, to = %tier, "User tier changed");
        }
    }

    /// Re-evaluate the tier after sign-in or sign-out
    ///
    /// Signing out always drops to guest. Signing in grants at least registered
    /// and keeps a premium tier already assigned from subscription state.
    pub fn on_auth_state_changed(&self, authenticated: bool) -> UserTier {
        let tier = if authenticated {
            self.current_tier().max(UserTier::Registered)
        } else {
            UserTier::Guest
        };
        self.set_user_tier(tier);
        tier
    }
}
