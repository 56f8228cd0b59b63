//! Median filter over one acquisition window

/// Sort `samples` in place and return their median
///
/// An even number of samples yields the average of the two middle values,
/// truncated toward zero. Returns `None` for an empty slice.
pub fn median(samples: &mut [i16]) -> Option<i16> {
    if samples.is_empty() {
        return None;
    }

    samples.sort_unstable();

    let len = samples.len();
    if len % 2 == 1 {
        return Some(samples[len / 2]);
    }

    let low = i32::from(samples[(len - 1) / 2]);
    let high = i32::from(samples[len / 2]);
    // the mean of two i16 values always fits back into i16
    #[allow(clippy::cast_possible_truncation)]
    Some(((low + high) / 2) as i16)
}
