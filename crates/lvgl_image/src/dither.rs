//! Floyd-Steinberg error diffusion for the true-color quantization path.
//!
//! The kernel distributes the quantization error of each channel to four
//! neighbours:
//!
//! ```text
//!        X   7
//!    3   5   1
//! ```
//!
//! Each share is `weight * error >> 4`, an arithmetic shift that rounds toward
//! negative infinity, so firmware-side tooling produces identical bytes.
//!
//! The "row below" storage is a single delay line of `width + 2` cells per
//! channel. It is never cleared wholesale: cell `x + 1` is read and zeroed right
//! before the pixel in column `x` deposits its own shares, so at any time the
//! line holds the tail of the previous row and the head of the next one.

use crate::format::TrueColorDepth;
use crate::quantize::classify;

const CHANNELS: usize = 3;

/// Shares of one channel error: (carry right, below-left, below, below-right).
#[inline]
pub fn diffuse(error: i32) -> (i32, i32, i32, i32) {
    ((7 * error) >> 4, (3 * error) >> 4, (5 * error) >> 4, error >> 4)
}

/// Carried error of one converter instance.
#[derive(Debug, Clone)]
pub struct ErrorDiffusion {
    carry: [i32; CHANNELS],
    rows: [Vec<i32>; CHANNELS],
}

impl ErrorDiffusion {
    /// Allocates delay lines for images `width` pixels wide.
    pub fn new(width: usize) -> Self {
        Self {
            carry: [0; CHANNELS],
            rows: [vec![0; width + 2], vec![0; width + 2], vec![0; width + 2]],
        }
    }

    /// Resets the forward carries. The delay lines keep their contents.
    #[inline]
    pub fn start_row(&mut self) {
        self.carry = [0; CHANNELS];
    }

    /// Quantizes the pixel in column `x` and spreads the resulting error.
    pub fn next(&mut self, depth: TrueColorDepth, x: usize, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        let (rb, gb, bb) = depth.channel_bits();
        (
            self.channel(0, x, r, rb),
            self.channel(1, x, g, gb),
            self.channel(2, x, b, bb),
        )
    }

    fn channel(&mut self, channel: usize, x: usize, original: u8, bits: u8) -> u8 {
        let row = &mut self.rows[channel];
        let actual = (original as i32 + self.carry[channel] + row[x + 1]).clamp(0, 255);
        row[x + 1] = 0;

        let quantized = classify(actual as u8, bits);
        let error = actual - quantized as i32;

        let (carry, below_left, below, below_right) = diffuse(error);
        self.carry[channel] = carry;
        row[x] += below_left;
        row[x + 1] += below;
        row[x + 2] += below_right;

        quantized
    }

    #[cfg(test)]
    fn row(&self, channel: usize) -> &[i32] {
        &self.rows[channel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_conserve_error() {
        for error in -255..=255 {
            let (a, b, c, d) = diffuse(error);
            let total = a + b + c + d;
            // four floor divisions lose strictly less than one unit each
            assert!(total <= error && total > error - 4, "error={}", error);
        }
        assert_eq!(diffuse(16), (7, 3, 5, 1));
        assert_eq!(diffuse(-16), (-7, -3, -5, -1));
        // arithmetic shift floors toward negative infinity
        assert_eq!(diffuse(-1), (-1, -1, -1, -1));
    }

    #[test]
    fn test_single_injection_distribution() {
        let mut state = ErrorDiffusion::new(3);
        state.start_row();
        // 3-bit red: 16 + 16 rounds to 32, value 16 rounds to 32 => error -16
        let (r, _, _) = state.next(TrueColorDepth::Rgb332, 1, 16, 0, 0);
        assert_eq!(r, 32);
        assert_eq!(state.row(0), &[0, -3, -5, -1, 0]);
        assert_eq!(state.carry[0], -7);
    }

    #[test]
    fn test_identity_depth_has_no_error() {
        let mut state = ErrorDiffusion::new(4);
        for y in 0..3 {
            state.start_row();
            for x in 0..4 {
                let v = (x * 60 + y * 7) as u8;
                assert_eq!(state.next(TrueColorDepth::Rgb888, x, v, v, v), (v, v, v));
            }
        }
        assert!(state.row(1).iter().all(|&e| e == 0));
    }

    #[test]
    fn test_row_cell_consumed_once() {
        let mut state = ErrorDiffusion::new(1);
        state.start_row();
        state.next(TrueColorDepth::Rgb332, 0, 16, 0, 0);
        assert_eq!(state.row(0), &[-3, -5, -1]);

        // next row, same column: picks up the -5 and clears it before adding
        state.start_row();
        let (r, _, _) = state.next(TrueColorDepth::Rgb332, 0, 16, 0, 0);
        // 16 - 5 = 11 rounds to 0 => error 11
        assert_eq!(r, 0);
        let (_, left, below, right) = diffuse(11);
        assert_eq!(state.row(0), &[-3 + left, below, -1 + right]);
    }

    #[test]
    fn test_clamps_accumulated_value() {
        let mut state = ErrorDiffusion::new(2);
        state.start_row();
        state.next(TrueColorDepth::Rgb332, 0, 250, 0, 0);
        let (r, _, _) = state.next(TrueColorDepth::Rgb332, 1, 255, 0, 0);
        assert_eq!(r, 255);
    }
}
