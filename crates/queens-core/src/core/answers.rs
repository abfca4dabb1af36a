/// Published solution counts indexed by board size; index 0 is unused.
pub const KNOWN_SOLUTIONS: [u64; 24] = [
    0,
    1,
    0,
    0,
    2,
    10,
    4,
    40,
    92,
    352,
    724,
    2_680,
    14_200,
    73_712,
    365_596,
    2_279_184,
    14_772_512,
    95_815_104,
    666_090_624,
    4_968_057_848,
    39_029_188_884,
    314_666_222_712,
    2_691_008_701_644,
    24_233_937_684_440,
];

/// The reference count for an `n`-queens board, if the table covers it.
pub fn known_solutions(n: usize) -> Option<u64> {
    if n == 0 {
        return None;
    }
    KNOWN_SOLUTIONS.get(n).copied()
}

/// Outcome of comparing a computed count with the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong { expected: u64 },
    Unknown,
}

impl Verdict {
    pub fn check(n: usize, solutions: u64) -> Self {
        match known_solutions(n) {
            Some(expected) if expected == solutions => Verdict::Correct,
            Some(expected) => Verdict::Wrong { expected },
            None => Verdict::Unknown,
        }
    }

    pub fn is_wrong(&self) -> bool {
        matches!(self, Verdict::Wrong { .. })
    }
}
