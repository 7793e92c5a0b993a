//! Quantities computed from raw acquisition parameters.

/// carrier position in ppm: transmitter offset (Hz) normalized by base frequency (MHz)
pub fn carrier_position(o1:f64,bf1:f64) -> f64 {
    o1 / bf1
}

/// point count of the second indirect dimension. An explicit sample count takes precedence over
/// the length of the sample list.
pub fn indirect_point_count(sample_override:Option<usize>,sample_list_len:usize) -> usize {
    sample_override.unwrap_or(sample_list_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_is_offset_over_base_frequency(){
        let cases = [(2820.96,600.13),(7296.0,60.8131),(-1250.5,150.9),(0.0,600.13)];
        for (o1,bf1) in cases {
            assert_eq!(carrier_position(o1,bf1),o1/bf1);
        }
        assert!((carrier_position(2820.96,600.13) - 4.70058).abs() < 1E-5);
    }

    #[test]
    fn override_beats_list_length(){
        assert_eq!(indirect_point_count(None,128),128);
        assert_eq!(indirect_point_count(Some(64),128),64);
    }
}
