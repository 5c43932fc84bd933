//! Subscription lifecycle status vocabulary.
//!
//! [`SubscriptionStatus`] is the fixed enumeration of states a subscription
//! moves through. The history table stores the numeric code; API responses
//! carry the Portuguese display translation. Both directions of the mapping
//! live here so the rest of the crate never hardcodes a status string.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a subscription.
///
/// Stored as a `SMALLINT` code in the `subscription_statuses` table. The
/// *current* status of a subscription is the most recently created history
/// row (ties broken by row id, last inserted wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum SubscriptionStatus {
    /// Reserved, never written by the application.
    Undefined = 0,
    /// Subscription was just created.
    Created = 1,
    /// Attendance confirmed by the subscriber.
    Confirmed = 2,
    /// Canceled by the promoter.
    Canceled = 3,
    /// Subscriber unsubscribed. Terminal for the unsubscribe flow.
    Unsigned = 4,
}

impl SubscriptionStatus {
    /// Every status a client can observe (excludes the reserved variant).
    pub const OBSERVABLE: [Self; 4] = [Self::Created, Self::Confirmed, Self::Canceled, Self::Unsigned];

    /// Returns the numeric code stored in the database.
    #[must_use]
    pub const fn code(self) -> i16 {
        self as i16
    }

    /// Resolves a database code back to a status.
    ///
    /// Returns `None` for codes outside the vocabulary; `Undefined` resolves
    /// normally since it is a valid (if unused) stored value.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Undefined),
            1 => Some(Self::Created),
            2 => Some(Self::Confirmed),
            3 => Some(Self::Canceled),
            4 => Some(Self::Unsigned),
            _ => None,
        }
    }

    /// Returns the display translation shown to clients.
    ///
    /// Total over the vocabulary: the reserved variant maps to a fallback
    /// string, mirroring the `Desconhecido` default of the dashboard query.
    #[must_use]
    pub const fn translation(self) -> &'static str {
        match self {
            Self::Undefined => "Desconhecido",
            Self::Created => "Criado",
            Self::Confirmed => "Confirmado",
            Self::Canceled => "Cancelado",
            Self::Unsigned => "Desinscrito",
        }
    }

    /// Reverse lookup from a display translation, case-insensitive.
    ///
    /// Only observable statuses resolve; the fallback string does not.
    #[must_use]
    pub fn from_translation(s: &str) -> Option<Self> {
        Self::OBSERVABLE
            .into_iter()
            .find(|status| status.translation().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.translation())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=4 {
            let Some(status) = SubscriptionStatus::from_code(code) else {
                panic!("code {code} must resolve");
            };
            assert_eq!(status.code(), code);
        }
        assert_eq!(SubscriptionStatus::from_code(5), None);
        assert_eq!(SubscriptionStatus::from_code(-1), None);
    }

    #[test]
    fn reverse_translation_is_case_insensitive() {
        for status in SubscriptionStatus::OBSERVABLE {
            let lower = status.translation().to_lowercase();
            assert_eq!(SubscriptionStatus::from_translation(&lower), Some(status));

            let upper = status.translation().to_uppercase();
            assert_eq!(SubscriptionStatus::from_translation(&upper), Some(status));
        }
    }

    #[test]
    fn translate_after_reverse_restores_display_form() {
        for status in SubscriptionStatus::OBSERVABLE {
            let s = status.translation();
            let Some(back) = SubscriptionStatus::from_translation(&s.to_lowercase()) else {
                panic!("translation {s} must reverse");
            };
            assert_eq!(back.translation(), s);
        }
    }

    #[test]
    fn unknown_translation_does_not_resolve() {
        assert_eq!(SubscriptionStatus::from_translation("pendente"), None);
        assert_eq!(SubscriptionStatus::from_translation("Desconhecido"), None);
        assert_eq!(SubscriptionStatus::from_translation(""), None);
    }

    #[test]
    fn cancelado_maps_to_code_three() {
        assert_eq!(
            SubscriptionStatus::from_translation("Cancelado").map(SubscriptionStatus::code),
            Some(3)
        );
    }
}
