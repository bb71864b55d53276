use rand::{Error, RngCore, SeedableRng};

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 16_807;

/// Deterministic pseudo-random stream over a 31-bit Lehmer state.
///
/// Multiplier 16807, modulus `2^31 - 1`. The same seed always yields the same
/// infinite sequence. Each generator owns its state, so independent tracks can
/// be generated in parallel.
///
/// The primary draw is [`TrackRng::next_f64`]. The [`RngCore`] impl exposes
/// the same stream to `rand` helpers such as `gen_range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRng {
    state: u64,
}

impl TrackRng {
    /// Creates a generator from an integer seed.
    ///
    /// Seeds congruent to zero modulo `2^31 - 1` map to `2^31 - 2` so the state
    /// never becomes the absorbing zero.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut state = seed % MODULUS;
        if state == 0 {
            state = MODULUS - 1;
        }
        Self { state }
    }

    fn step(&mut self) -> u64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.state
    }

    /// Returns the next scalar in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f64(&mut self) -> f64 {
        (self.step() - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Returns `min + next_f64() * (max - min)`.
    pub fn between(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a value in `[-magnitude, magnitude)`: `(next - 0.5) * 2 * magnitude`.
    pub fn symmetric(&mut self, magnitude: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * magnitude
    }
}

impl RngCore for TrackRng {
    #[allow(clippy::cast_possible_truncation)]
    fn next_u32(&mut self) -> u32 {
        // The low 16 bits of two consecutive 31-bit states.
        let hi = self.step() & 0xFFFF;
        let lo = self.step() & 0xFFFF;
        ((hi << 16) | lo) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for TrackRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
