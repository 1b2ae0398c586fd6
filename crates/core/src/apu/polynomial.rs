//! Polynomial counter for Atari 2600 TIA audio waveform generation.
//!
//! This module implements a polynomial counter used in the TIA audio chip to generate
//! various waveform types including pure tones, buzzy sounds, and noise.

/// Polynomial counter for TIA-style waveform generation.
///
/// The TIA uses a combination of division and polynomial feedback to generate
/// different waveform types. The AUDC (Audio Control) register selects which
/// waveform type to use.
#[derive(Debug, Clone)]
pub struct PolynomialCounter {
    /// 4-bit polynomial counter
    poly4: u8,
    /// 5-bit polynomial counter
    poly5: u8,
    /// Division counter (5-bit)
    div: u8,
    /// Audio control value (0-15) selects waveform type
    pub control: u8,
    /// Audio frequency value (0-31) controls base frequency
    pub frequency: u8,
    /// Audio volume (0-15)
    pub volume: u8,
}

impl PolynomialCounter {
    /// Create a new polynomial counter with default state
    pub fn new() -> Self {
        Self {
            poly4: 0x0F,
            poly5: 0x1F,
            div: 0,
            control: 0,
            frequency: 0,
            volume: 0,
        }
    }

    /// Clock the polynomial counter once (at TIA clock rate)
    /// Returns the current audio output (0-15)
    pub fn clock(&mut self) -> u8 {
        // Increment division counter
        self.div = (self.div + 1) & 0x1F;

        // Clock poly4 when div matches frequency
        if self.div == self.frequency {
            self.div = 0;
            self.clock_poly4();

            // Clock poly5 based on poly4 bit 0
            if (self.poly4 & 1) == 0 {
                self.clock_poly5();
            }
        }

        // Generate output based on control value
        self.generate_output()
    }

    /// Clock the 4-bit polynomial counter
    fn clock_poly4(&mut self) {
        // 4-bit LFSR with taps at bits 0 and 1
        let feedback = ((self.poly4 & 1) ^ ((self.poly4 >> 1) & 1)) & 1;
        self.poly4 = (self.poly4 >> 1) | (feedback << 3);
    }

    /// Clock the 5-bit polynomial counter
    fn clock_poly5(&mut self) {
        // 5-bit LFSR with taps at bits 0 and 2
        let feedback = ((self.poly5 & 1) ^ ((self.poly5 >> 2) & 1)) & 1;
        self.poly5 = (self.poly5 >> 1) | (feedback << 4);
    }

    /// Generate output based on current control value
    fn generate_output(&self) -> u8 {
        // TIA waveform types based on AUDC value
        // Simplified implementation - full TIA would have more complex mixing
        let bit = match self.control {
            0x00 | 0x0B => 0,                            // Set to 1 (pure tone - always on)
            0x01 => self.poly4 & 1,                      // 4-bit polynomial
            0x02 => (self.div & 1) ^ 1,                  // Division by 2
            0x03 => (self.poly4 & 1) & (self.poly5 & 1), // 4-bit AND 5-bit
            0x04 | 0x05 => self.div & 1,                 // Pure tone (division)
            0x06 | 0x0A => self.div & 1,                 // Division by 31
            0x07 | 0x09 => self.poly5 & 1,               // 5-bit polynomial
            0x08 => self.poly5 & 1,                      // 5-bit poly (noise)
            0x0C | 0x0D => self.poly4 & 1,               // Pure tone with 4-bit
            0x0E => self.poly4 & 1,                      // 4-bit polynomial
            0x0F => (self.poly4 & 1) ^ (self.poly5 & 1), // 4-bit XOR 5-bit
            _ => 0,
        };

        if bit != 0 {
            self.volume
        } else {
            0
        }
    }

    /// Reset the polynomial counter
    pub fn reset(&mut self) {
        self.poly4 = 0x0F;
        self.poly5 = 0x1F;
        self.div = 0;
    }

    /// Set audio control register (selects waveform type)
    pub fn set_control(&mut self, control: u8) {
        self.control = control & 0x0F;
    }

    /// Set audio frequency register
    pub fn set_frequency(&mut self, frequency: u8) {
        self.frequency = frequency & 0x1F;
    }

    /// Set audio volume register
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume & 0x0F;
    }
}

impl Default for PolynomialCounter {
    fn default() -> Self {
        Self::new()
    }
}
