/// Fixed-size PCM sample ring between an APU and the audio streamer.
///
/// Samples are 8-bit unsigned (0x80 = silence). The producer never blocks:
/// when the ring is full the oldest sample is dropped. The fill level is
/// reported as a percentage of the full ring, which is the scale the
/// streamer's warmup threshold is expressed in.
pub struct AudioRing {
    buffer: Box<[u8; AudioRing::SIZE]>,
    head: usize, // next sample to read
    tail: usize, // next slot to write
}

/// Midpoint of the unsigned 8-bit sample range.
pub const SILENCE: u8 = 0x80;

impl AudioRing {
    pub const SIZE: usize = 8192;

    pub fn new() -> Self {
        Self {
            buffer: Box::new([SILENCE; Self::SIZE]),
            head: 0,
            tail: 0,
        }
    }

    /// Append one sample, overwriting the oldest if full.
    pub fn push(&mut self, sample: u8) {
        self.buffer[self.tail] = sample;
        self.tail = (self.tail + 1) % Self::SIZE;
        if self.tail == self.head {
            self.head = (self.head + 1) % Self::SIZE;
        }
    }

    /// Copy up to `out.len()` samples into `out`, returning the count.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        let mut count = 0;
        while count < out.len() && self.head != self.tail {
            out[count] = self.buffer[self.head];
            self.head = (self.head + 1) % Self::SIZE;
            count += 1;
        }
        count
    }

    /// Number of buffered samples. At most `SIZE - 1`.
    pub fn len(&self) -> usize {
        if self.tail >= self.head {
            self.tail - self.head
        } else {
            Self::SIZE - (self.head - self.tail)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Fill level in whole percent (0..=99).
    pub fn level_percent(&self) -> u32 {
        (self.len() * 100 / Self::SIZE) as u32
    }

    /// Drop all buffered samples.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}

impl Default for AudioRing {
    fn default() -> Self {
        Self::new()
    }
}
