//! Shared work-RAM routing selected by WRAMCNT (spec §3 "Routing state", §6).

/// Which processor is resolving an address: the main ("ARM9-analogue") or the
/// auxiliary ("ARM7-analogue") core.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Processor {
    Main,
    Aux,
}

impl Processor {
    pub fn index(self) -> usize {
        match self {
            Processor::Main => 0,
            Processor::Aux => 1,
        }
    }

    pub fn peer(self) -> Processor {
        match self {
            Processor::Main => Processor::Aux,
            Processor::Aux => Processor::Main,
        }
    }
}

/// (main_offset, main_size, aux_offset, aux_size) in bytes, indexed by the low
/// two bits of WRAMCNT.
const MODES: [(usize, usize, usize, usize); 4] = [
    (0, 32 * 1024, 0, 0),
    (16 * 1024, 16 * 1024, 0, 16 * 1024),
    (0, 16 * 1024, 16 * 1024, 16 * 1024),
    (0, 0, 0, 32 * 1024),
];

#[derive(Clone, Copy, Debug, Default)]
pub struct WramRouting {
    pub offset: [usize; 2],
    pub size: [usize; 2],
}

impl WramRouting {
    pub fn new() -> Self {
        let mut r = Self::default();
        r.apply(0);
        r
    }

    /// Recompute offset/size for both processors from WRAMCNT's low two bits.
    pub fn apply(&mut self, wramcnt: u8) {
        let (main_off, main_size, aux_off, aux_size) = MODES[(wramcnt & 0b11) as usize];
        self.offset[Processor::Main.index()] = main_off;
        self.size[Processor::Main.index()] = main_size;
        self.offset[Processor::Aux.index()] = aux_off;
        self.size[Processor::Aux.index()] = aux_size;
    }
}
