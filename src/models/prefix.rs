use ipnet::IpNet;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;

/// Address family of a [`Prefix`], distinguished by the presence of `:` in the
/// canonical textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

/// A canonical CIDR prefix `address/length`.
///
/// Two prefixes are equal iff the normalised network address bytes and the
/// mask length are equal -- [`IpNet`] already normalises the address to its
/// network form on construction, so deriving equality on the wrapped value is
/// sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Prefix(pub IpNet);

impl Prefix {
    pub fn new(net: IpNet) -> Self {
        Prefix(net.trunc())
    }

    pub fn family(&self) -> Family {
        match self.0 {
            IpNet::V4(_) => Family::V4,
            IpNet::V6(_) => Family::V6,
        }
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    pub fn network(&self) -> IpAddr {
        self.0.network()
    }

    /// The bits of the network address, big-endian, truncated to `prefix_len()`
    /// bits of significance -- the representation the radix tree walks.
    pub fn bits(&self) -> Vec<u8> {
        match self.network() {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        }
    }

    /// Documented default-route rule: mask length strictly less than 8 for
    /// IPv4, or the IPv6 default route `::/0`. See [`crate::engine::DefaultRouteMode`]
    /// for the alternative (literal-only) behaviour and why both exist.
    pub fn is_default_by_mask(&self) -> bool {
        match self.family() {
            Family::V4 => self.prefix_len() < 8,
            Family::V6 => self.prefix_len() == 0,
        }
    }

    /// The stricter default-route rule used by the parallel/sharded variant:
    /// only the literal `0.0.0.0/0` or `::/0`.
    pub fn is_literal_default(&self) -> bool {
        self.prefix_len() == 0
    }

    /// True iff `self` is covered by `other`, i.e. `other` is an ancestor of
    /// `self` in the radix tree (exact match counts as covering).
    pub fn is_covered_by(&self, other: &Prefix) -> bool {
        if self.family() != other.family() {
            return false;
        }
        if other.prefix_len() > self.prefix_len() {
            return false;
        }
        let a = self.bits();
        let b = other.bits();
        bits_match(&a, &b, other.prefix_len())
    }
}

pub(crate) fn bits_match(a: &[u8], b: &[u8], len: u8) -> bool {
    let full_bytes = (len / 8) as usize;
    if a[..full_bytes] != b[..full_bytes] {
        return false;
    }
    let rem = len % 8;
    if rem == 0 {
        return true;
    }
    let mask = 0xFFu8 << (8 - rem);
    (a[full_bytes] & mask) == (b[full_bytes] & mask)
}

impl FromStr for Prefix {
    type Err = ipnet::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Prefix::new(IpNet::from_str(s)?))
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<IpNet> for Prefix {
    fn from(net: IpNet) -> Self {
        Prefix::new(net)
    }
}
