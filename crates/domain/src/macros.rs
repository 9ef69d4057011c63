//! Macro for string conversions on wire-level enums
//!
//! Backend status fields (live-class status, enrollment status, roles, ...)
//! travel as lowercase strings. The macro gives each enum a single mapping
//! that drives `as_str`, `Display` and `FromStr`.
//!
//! # Example
//!
//! ```rust
//! use mentiq_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ClassState {
//!     Scheduled,
//!     Active,
//! }
//!
//! impl_domain_status_conversions!(ClassState {
//!     Scheduled => "scheduled",
//!     Active => "active",
//! });
//!
//! assert_eq!(ClassState::Active.as_str(), "active");
//! assert_eq!(" Scheduled ".parse::<ClassState>(), Ok(ClassState::Scheduled));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum
///
/// Parsing trims surrounding whitespace and ignores ASCII case. Unknown
/// input yields `Err(String)` naming the enum.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Seat {
        Host,
        Guest,
    }

    impl_domain_status_conversions!(Seat {
        Host => "host",
        Guest => "guest",
    });

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Seat::Host.to_string(), "host");
        assert_eq!(Seat::Guest.as_str(), "guest");
    }

    #[test]
    fn parse_ignores_case_and_padding() {
        assert_eq!("HOST".parse::<Seat>(), Ok(Seat::Host));
        assert_eq!("  guest\n".parse::<Seat>(), Ok(Seat::Guest));
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = "owner".parse::<Seat>().unwrap_err();
        assert!(err.contains("Seat"));
        assert!(err.contains("owner"));
    }
}
