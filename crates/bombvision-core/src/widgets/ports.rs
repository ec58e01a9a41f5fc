use serde::{Deserialize, Serialize};
use std::fmt;

/// Port hardware that can be mounted on a port plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    DviD,
    Parallel,
    Ps2,
    Rj45,
    Serial,
    StereoRca,
}

impl PortType {
    pub const ALL: [PortType; 6] = [
        PortType::DviD,
        PortType::Parallel,
        PortType::Ps2,
        PortType::Rj45,
        PortType::Serial,
        PortType::StereoRca,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PortType::DviD => "DVI-D",
            PortType::Parallel => "Parallel",
            PortType::Ps2 => "PS/2",
            PortType::Rj45 => "RJ-45",
            PortType::Serial => "Serial",
            PortType::StereoRca => "Stereo RCA",
        }
    }
}

/// Bitmask of the ports found on one plate. Any subset is valid, including
/// the empty plate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<PortType>", from = "Vec<PortType>")]
pub struct PortSet {
    bits: u8,
}

impl PortSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, port: PortType) {
        self.bits |= port.bit();
    }

    pub fn with(mut self, port: PortType) -> Self {
        self.insert(port);
        self
    }

    pub fn contains(&self, port: PortType) -> bool {
        self.bits & port.bit() != 0
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = PortType> + '_ {
        PortType::ALL.into_iter().filter(|port| self.contains(*port))
    }
}

impl FromIterator<PortType> for PortSet {
    fn from_iter<T: IntoIterator<Item = PortType>>(iter: T) -> Self {
        let mut set = PortSet::empty();
        for port in iter {
            set.insert(port);
        }
        set
    }
}

impl From<Vec<PortType>> for PortSet {
    fn from(ports: Vec<PortType>) -> Self {
        ports.into_iter().collect()
    }
}

impl From<PortSet> for Vec<PortType> {
    fn from(set: PortSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        let names: Vec<&str> = self.iter().map(|port| port.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}
