//! Bitmasks reported by statsbeat.
//!
//! Each flag owns exactly one bit, so any combination built with `|` decodes
//! back into the same set of named flags. The two types are independent
//! namespaces: the same bit means different things in each.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use azmon_errors::GeneralError;

macro_rules! statsbeat_flags {
    (
        $(#[$outer:meta])*
        pub struct $name:ident {
            $(
                $(#[$inner:meta])*
                const $flag:ident = $value:expr;
            )+
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(try_from = "u32", into = "u32")]
        pub struct $name(u32);

        impl $name {
            $(
                $(#[$inner])*
                pub const $flag: Self = Self($value);
            )+

            /// Every named flag with its name, in ascending bit order.
            pub const FLAGS: &'static [(&'static str, Self)] = &[$((stringify!($flag), Self::$flag)),+];

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn all() -> Self {
                Self(0 $(| $value)+)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Returns `None` if `bits` has any bit that is not a named flag.
            pub const fn from_bits(bits: u32) -> Option<Self> {
                if bits & !Self::all().0 == 0 { Some(Self(bits)) } else { None }
            }

            /// Drops every bit that is not a named flag.
            pub const fn from_bits_truncate(bits: u32) -> Self {
                Self(bits & Self::all().0)
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Sets `other` when `value` is true, clears it otherwise.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }

            /// Decodes the mask into the named flags it contains.
            pub fn iter_names(self) -> impl Iterator<Item = (&'static str, Self)> {
                Self::FLAGS
                    .iter()
                    .copied()
                    .filter(move |(_, flag)| self.contains(*flag))
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl FromIterator<$name> for $name {
            fn from_iter<I: IntoIterator<Item = $name>>(iter: I) -> Self {
                iter.into_iter().fold(Self::empty(), |acc, flag| acc | flag)
            }
        }

        impl From<$name> for u32 {
            fn from(flags: $name) -> u32 {
                flags.0
            }
        }

        impl TryFrom<u32> for $name {
            type Error = GeneralError;

            fn try_from(bits: u32) -> Result<Self, Self::Error> {
                Self::from_bits(bits).ok_or_else(|| {
                    GeneralError::DecodingError(format!(
                        "{} has unknown bits set: {:#x}",
                        stringify!($name),
                        bits & !Self::all().0
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_empty() {
                    return f.write_str("NONE");
                }
                let mut first = true;
                for (name, _) in self.iter_names() {
                    if !first {
                        f.write_str(" | ")?;
                    }
                    f.write_str(name)?;
                    first = false;
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }
    };
}

statsbeat_flags! {
    /// Optional runtime behaviors active in this process.
    pub struct StatsbeatFeatures {
        /// Failed exports are persisted to disk and retried.
        const DISK_RETRY = 1 << 0;
        /// Requests are authenticated with Azure Active Directory.
        const AAD_HANDLING = 1 << 1;
        /// The browser SDK loader snippet is injected into web responses.
        const WEB_SNIPPET = 1 << 2;
        /// Telemetry is produced through the distro rather than a bare exporter.
        const DISTRO = 1 << 3;
    }
}

statsbeat_flags! {
    /// Optional library integrations active in this process.
    pub struct StatsbeatInstrumentations {
        const AZURE_CORE_TRACING = 1 << 0;
        const MONGODB = 1 << 1;
        const MYSQL = 1 << 2;
        const REDIS = 1 << 3;
        const POSTGRES = 1 << 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subsets<T: Copy>(flags: &[T]) -> Vec<Vec<T>> {
        (0..1u32 << flags.len())
            .map(|mask| {
                flags
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, flag)| *flag)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_feature_flags_are_distinct_powers_of_two() {
        let mut seen = 0u32;
        for (name, flag) in StatsbeatFeatures::FLAGS {
            assert!(flag.bits().is_power_of_two(), "{} is not a power of two", name);
            assert_eq!(seen & flag.bits(), 0, "{} overlaps another flag", name);
            seen |= flag.bits();
        }
        assert_eq!(seen, StatsbeatFeatures::all().bits());
    }

    #[test]
    fn test_instrumentation_flags_are_distinct_powers_of_two() {
        let mut seen = 0u32;
        for (name, flag) in StatsbeatInstrumentations::FLAGS {
            assert!(flag.bits().is_power_of_two(), "{} is not a power of two", name);
            assert_eq!(seen & flag.bits(), 0, "{} overlaps another flag", name);
            seen |= flag.bits();
        }
        assert_eq!(seen, StatsbeatInstrumentations::all().bits());
    }

    #[test]
    fn test_feature_subsets_decode_to_the_same_subset() {
        let flags: Vec<_> = StatsbeatFeatures::FLAGS.iter().map(|(_, f)| *f).collect();
        for subset in subsets(&flags) {
            let combined: StatsbeatFeatures = subset.iter().copied().collect();
            let decoded: Vec<_> = combined.iter_names().map(|(_, f)| f).collect();
            assert_eq!(decoded, subset);

            let reparsed = StatsbeatFeatures::from_bits(combined.bits()).unwrap();
            assert_eq!(reparsed, combined);
        }
    }

    #[test]
    fn test_instrumentation_subsets_decode_to_the_same_subset() {
        let flags: Vec<_> = StatsbeatInstrumentations::FLAGS
            .iter()
            .map(|(_, f)| *f)
            .collect();
        for subset in subsets(&flags) {
            let combined: StatsbeatInstrumentations = subset.iter().copied().collect();
            let decoded: Vec<_> = combined.iter_names().map(|(_, f)| f).collect();
            assert_eq!(decoded, subset);
        }
    }

    #[test]
    fn test_named_flags_match_expected_set() {
        let features: Vec<_> = StatsbeatFeatures::FLAGS.iter().map(|(n, _)| *n).collect();
        assert_eq!(features, ["DISK_RETRY", "AAD_HANDLING", "WEB_SNIPPET", "DISTRO"]);

        let instrumentations: Vec<_> =
            StatsbeatInstrumentations::FLAGS.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            instrumentations,
            ["AZURE_CORE_TRACING", "MONGODB", "MYSQL", "REDIS", "POSTGRES"]
        );
    }

    #[test]
    fn test_unknown_bits_are_rejected_or_truncated() {
        assert!(StatsbeatFeatures::from_bits(1 << 10).is_none());
        assert_eq!(
            StatsbeatFeatures::from_bits_truncate((1 << 10) | StatsbeatFeatures::DISTRO.bits()),
            StatsbeatFeatures::DISTRO
        );
        assert!(StatsbeatInstrumentations::try_from(1u32 << 5).is_err());
    }

    #[test]
    fn test_insert_remove_and_set() {
        let mut flags = StatsbeatInstrumentations::empty();
        flags.insert(StatsbeatInstrumentations::REDIS);
        flags.set(StatsbeatInstrumentations::MYSQL, true);
        assert_eq!(
            flags,
            StatsbeatInstrumentations::REDIS | StatsbeatInstrumentations::MYSQL
        );

        flags.remove(StatsbeatInstrumentations::REDIS);
        flags.set(StatsbeatInstrumentations::MYSQL, false);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_display_and_debug() {
        let flags = StatsbeatFeatures::DISK_RETRY | StatsbeatFeatures::DISTRO;
        assert_eq!(flags.to_string(), "DISK_RETRY | DISTRO");
        assert_eq!(format!("{:?}", flags), "StatsbeatFeatures(DISK_RETRY | DISTRO)");
        assert_eq!(StatsbeatFeatures::empty().to_string(), "NONE");
    }

    #[test]
    fn test_serde_uses_plain_integer() {
        let flags = StatsbeatInstrumentations::MONGODB | StatsbeatInstrumentations::POSTGRES;
        assert_eq!(serde_json::to_string(&flags).unwrap(), "18");

        let parsed: StatsbeatInstrumentations = serde_json::from_str("18").unwrap();
        assert_eq!(parsed, flags);

        assert!(serde_json::from_str::<StatsbeatInstrumentations>("64").is_err());
    }
}
