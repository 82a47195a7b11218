use std::{
    fmt,
    ops::{BitAnd, BitOr, BitOrAssign, Not},
    str::FromStr,
};

use crate::error::CompileError;

/// A set of compiler features.
///
/// Each feature switches on a piece of grammar or semantics. Features are
/// independent bits and combine with `|`. [`Features::MEMBER`] and
/// [`Features::PATH_IDENTIFIER`] are mutually exclusive; a
/// [`Compiler`](crate::compiler::Compiler) refuses to be built with both.
///
/// # Example
/// ```
/// use formulary::compiler::features::Features;
///
/// let features = Features::INTEGER | Features::BOOLEAN;
/// assert!(features.contains(Features::BOOLEAN));
/// assert!(!features.contains(Features::STRING));
/// assert_eq!(features.to_string(), "Integer | Boolean");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Features(u64);

/// Named single-bit features, in bit order.
const NAMED: &[(&str, Features)] = &[("Integer", Features::INTEGER),
                                     ("Decimal", Features::DECIMAL),
                                     ("Boolean", Features::BOOLEAN),
                                     ("String", Features::STRING),
                                     ("Member", Features::MEMBER),
                                     ("PathIdentifier", Features::PATH_IDENTIFIER)];

/// Named presets accepted by [`Features::from_str`].
const PRESETS: &[(&str, Features)] = &[("Minimal", Features::MINIMAL),
                                       ("All", Features::ALL),
                                       ("Common", Features::COMMON),
                                       ("CommonPathIdentifier",
                                        Features::COMMON_PATH_IDENTIFIER)];

impl Features {
    /// No features: float arithmetic over numbers, parameters and calls.
    pub const MINIMAL: Self = Self(0);
    /// Integer arithmetic when both operands are integers.
    pub const INTEGER: Self = Self(1 << 0);
    /// Fixed-point decimal arithmetic instead of floating point.
    pub const DECIMAL: Self = Self(1 << 1);
    /// `true`/`false` literals, `!`, `&&`, `||` and relational operators.
    pub const BOOLEAN: Self = Self(1 << 2);
    /// String literals and the `..` concatenation operator.
    pub const STRING: Self = Self(1 << 3);
    /// Member access through dotted paths (`a.b.c`, `a.f(x)`).
    pub const MEMBER: Self = Self(1 << 4);
    /// Dotted names looked up as one flat identifier.
    pub const PATH_IDENTIFIER: Self = Self(1 << 5);
    /// Every feature that can be used together.
    pub const ALL: Self = Self(Self::INTEGER.0
                               | Self::DECIMAL.0
                               | Self::BOOLEAN.0
                               | Self::STRING.0
                               | Self::MEMBER.0);
    /// Everything except decimal arithmetic.
    pub const COMMON: Self = Self(Self::ALL.0 & !Self::DECIMAL.0);
    /// [`Features::COMMON`] with flat path identifiers instead of members.
    pub const COMMON_PATH_IDENTIFIER: Self =
        Self((Self::COMMON.0 & !Self::MEMBER.0) | Self::PATH_IDENTIFIER.0);

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` if every feature in `other` is enabled in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if at least one feature in `other` is enabled.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no feature is enabled.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Checks that the set can configure a compiler.
    ///
    /// # Errors
    /// [`CompileError::ConflictingFeatures`] when both
    /// [`Features::MEMBER`] and [`Features::PATH_IDENTIFIER`] are set.
    pub fn validate(self) -> Result<Self, CompileError> {
        let conflict = Self(Self::MEMBER.0 | Self::PATH_IDENTIFIER.0);
        if self.contains(conflict) {
            return Err(CompileError::ConflictingFeatures { features: conflict });
        }
        Ok(self)
    }
}

impl BitOr for Features {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Features {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Features {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Features {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & (Self::ALL.0 | Self::PATH_IDENTIFIER.0))
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Minimal");
        }

        let mut first = true;
        for (name, feature) in NAMED {
            if self.contains(*feature) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl FromStr for Features {
    type Err = CompileError;

    /// Parses feature names and presets separated by `|`, `,` or `+`.
    ///
    /// Names are matched case-insensitively. The result is not validated;
    /// pass it to [`Compiler::new`](crate::compiler::Compiler::new) for that.
    ///
    /// # Example
    /// ```
    /// use formulary::compiler::features::Features;
    ///
    /// let features: Features = "common | decimal".parse().unwrap();
    /// assert_eq!(features, Features::ALL);
    /// assert!("Integer, Bogus".parse::<Features>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut features = Self::MINIMAL;
        for name in s.split(['|', ',', '+']).map(str::trim).filter(|n| !n.is_empty()) {
            let found = NAMED.iter()
                             .chain(PRESETS)
                             .find(|(known, _)| known.eq_ignore_ascii_case(name))
                             .map(|(_, feature)| *feature)
                             .ok_or_else(|| CompileError::UnknownFeature { name: name.to_string() })?;
            features |= found;
        }
        Ok(features)
    }
}
