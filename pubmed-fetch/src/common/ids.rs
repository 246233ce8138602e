//! Validated PMID and PMC ID types
//!
//! PMIDs are bare numeric identifiers from the PubMed database; PMC IDs carry
//! a `PMC` prefix and identify full-text articles in PubMed Central.
//! Conversion between the two namespaces is many-to-zero-or-one and handled
//! by [`PubMedClient::convert_pmid`](crate::client::PubMedClient::convert_pmid).

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FetchError, Result};

/// A validated PubMed ID (PMID)
///
/// # Examples
///
/// ```
/// use pubmed_fetch::Pmid;
///
/// let pmid = Pmid::parse("31978945").unwrap();
/// assert_eq!(pmid.to_string(), "31978945");
///
/// // Whitespace is trimmed
/// assert_eq!(Pmid::parse(" 31978945 ").unwrap(), pmid);
///
/// assert!(Pmid::parse("").is_err());
/// assert!(Pmid::parse("abc").is_err());
/// assert!(Pmid::parse("0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pmid(u32);

impl Pmid {
    /// Parse a PMID from its decimal string form
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidPmid`] when the trimmed input is empty,
    /// non-numeric, or zero.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let value = trimmed.parse::<u32>().map_err(|_| FetchError::InvalidPmid {
            pmid: s.to_string(),
        })?;
        if value == 0 {
            return Err(FetchError::InvalidPmid {
                pmid: s.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pmid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Pmid {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// PMIDs travel as decimal strings in every payload this crate touches
// (ESearch idlist, idconv records, the results artifact).
impl Serialize for Pmid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Pmid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pmid::parse(&s).map_err(D::Error::custom)
    }
}

/// A validated PubMed Central ID (PMC ID)
///
/// The `PMC` prefix is optional and case-insensitive on parse; the canonical
/// form always carries it.
///
/// # Examples
///
/// ```
/// use pubmed_fetch::PmcId;
///
/// let pmcid = PmcId::parse("PMC7092803").unwrap();
/// assert_eq!(pmcid.to_string(), "PMC7092803");
/// assert_eq!(pmcid.numeric_part(), "7092803");
///
/// // Prefix is optional on input
/// assert_eq!(PmcId::parse("7092803").unwrap(), pmcid);
/// assert_eq!(PmcId::parse("pmc7092803").unwrap(), pmcid);
///
/// assert!(PmcId::parse("PMC").is_err());
/// assert!(PmcId::parse("PMC0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PmcId(u32);

impl PmcId {
    /// Parse a PMC ID, with or without its `PMC` prefix
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidPmcid`] when the numeric part is empty,
    /// non-numeric, or zero.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = if trimmed.len() >= 3 && trimmed[..3].eq_ignore_ascii_case("PMC") {
            &trimmed[3..]
        } else {
            trimmed
        };
        let value = digits.parse::<u32>().map_err(|_| FetchError::InvalidPmcid {
            pmcid: s.to_string(),
        })?;
        if value == 0 {
            return Err(FetchError::InvalidPmcid {
                pmcid: s.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Digits without the `PMC` prefix, as submitted to ESummary
    pub fn numeric_part(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for PmcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PMC{}", self.0)
    }
}

impl FromStr for PmcId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PmcId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PmcId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PmcId::parse(&s).map_err(D::Error::custom)
    }
}
