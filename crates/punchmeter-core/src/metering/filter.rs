//! K-weighting pre-filter (ITU-R BS.1770).
//!
//! Stage one is a high shelf (+4 dB above ~1.5 kHz) modelling the acoustic
//! effect of the head; stage two is the RLB high-pass (~38 Hz). Both are
//! designed from analog prototypes with the bilinear transform, so the
//! coefficients are only valid for the sample rate they were built for.

use core::f64::consts::PI;

const SHELF_F0_HZ: f64 = 1681.974450955533;
const SHELF_GAIN_DB: f64 = 3.999843853973347;
const SHELF_Q: f64 = 0.7071752369554196;
/// Exponent relating the band gain to the high-frequency gain of the shelf.
const SHELF_BAND_EXPONENT: f64 = 0.4996667741545416;

const HIGHPASS_F0_HZ: f64 = 38.13547087602444;
const HIGHPASS_Q: f64 = 0.5003270373238773;

/// Second-order IIR section, transposed direct form II, `a0` normalised to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl Biquad {
    pub fn new(b: [f64; 3], a: [f64; 2]) -> Self {
        Self {
            b0: b[0],
            b1: b[1],
            b2: b[2],
            a1: a[0],
            a2: a[1],
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// BS.1770 stage one: high-frequency shelf.
    pub fn k_shelf(sample_rate: f64) -> Self {
        let k = (PI * SHELF_F0_HZ / sample_rate).tan();
        let vh = 10.0_f64.powf(SHELF_GAIN_DB / 20.0);
        let vb = vh.powf(SHELF_BAND_EXPONENT);
        let a0 = 1.0 + k / SHELF_Q + k * k;

        Self::new(
            [
                (vh + vb * k / SHELF_Q + k * k) / a0,
                2.0 * (k * k - vh) / a0,
                (vh - vb * k / SHELF_Q + k * k) / a0,
            ],
            [
                2.0 * (k * k - 1.0) / a0,
                (1.0 - k / SHELF_Q + k * k) / a0,
            ],
        )
    }

    /// BS.1770 stage two: RLB high-pass.
    ///
    /// The numerator is left at `[1, -2, 1]` as in the reference filter.
    pub fn k_highpass(sample_rate: f64) -> Self {
        let k = (PI * HIGHPASS_F0_HZ / sample_rate).tan();
        let a0 = 1.0 + k / HIGHPASS_Q + k * k;

        Self::new(
            [1.0, -2.0, 1.0],
            [
                2.0 * (k * k - 1.0) / a0,
                (1.0 - k / HIGHPASS_Q + k * k) / a0,
            ],
        )
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }

    /// Clears the filter memory, keeping the coefficients.
    pub fn clear(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    pub fn coefficients(&self) -> ([f64; 3], [f64; 2]) {
        ([self.b0, self.b1, self.b2], [self.a1, self.a2])
    }
}

/// Per-channel K-weighting cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KWeighting {
    shelf: Biquad,
    highpass: Biquad,
    sample_rate: f64,
}

impl KWeighting {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            shelf: Biquad::k_shelf(sample_rate),
            highpass: Biquad::k_highpass(sample_rate),
            sample_rate,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        self.highpass.process(self.shelf.process(x))
    }

    pub fn clear(&mut self) {
        self.shelf.clear();
        self.highpass.clear();
    }

    /// Sample rate the coefficients were designed for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn shelf(&self) -> &Biquad {
        &self.shelf
    }

    pub fn highpass(&self) -> &Biquad {
        &self.highpass
    }
}
