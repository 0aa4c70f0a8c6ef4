/// Check that two floats agree to within an absolute tolerance of 1e-9 or a relative tolerance of 5e-5, whichever is
/// looser.
#[macro_export]
macro_rules! assert_floats_near_equal {
    ($val1:expr, $val2:expr, $msg:expr) => {{
        let a: f64 = $val1;
        let b: f64 = $val2;
        let diff = (a - b).abs();
        let scale = a.abs().max(b.abs());
        assert!(diff <= 1e-9 || diff <= scale * 0.00005, "{}: {} != {}", $msg, a, b);
    }};
}
