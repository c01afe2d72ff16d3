// Property tests for gradient parameters: opacity → alpha mapping and color parsing.
use gradient_paste::editor::{GradientColor, GradientOverlay, Opacity};
use proptest::prelude::*;

proptest! {
    #[test]
    fn alpha_is_rounded_percent_of_255(percent in 0u32..=100) {
        let alpha = Opacity::new(percent).expect("in range").alpha();
        let exact = f64::from(percent) * 255.0 / 100.0;
        prop_assert!((f64::from(alpha) - exact).abs() <= 0.5);
        if exact.fract() == 0.5 {
            prop_assert_eq!(f64::from(alpha), exact.ceil());
        }
    }

    #[test]
    fn alpha_is_monotonic(a in 0u32..=100, b in 0u32..=100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(Opacity::new(lo).expect("in range").alpha() <= Opacity::new(hi).expect("in range").alpha());
    }

    #[test]
    fn out_of_range_opacity_is_rejected(percent in 101u32..10_000) {
        prop_assert!(Opacity::new(percent).is_err());
    }

    #[test]
    fn color_hex_roundtrips(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = GradientColor::from_rgb(r, g, b);
        let parsed = GradientColor::parse(&color.to_hex()).expect("own output parses");
        prop_assert_eq!(parsed, color);
        prop_assert_eq!(color.to_hex().len(), 7);
    }

    #[test]
    fn stops_share_color_and_end_transparent(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), percent in 0u32..=100) {
        let overlay = GradientOverlay::new(
            GradientColor::from_rgb(r, g, b),
            Opacity::new(percent).expect("in range"),
        );
        let [bottom, top] = overlay.stops();
        prop_assert_eq!(bottom.position, 0.0);
        prop_assert_eq!(top.position, 1.0);
        prop_assert_eq!(top.alpha, 0);
        prop_assert_eq!(&bottom.to_hex()[..7], &top.to_hex()[..7]);
        prop_assert!(top.to_hex().ends_with("00"));
        prop_assert_eq!(bottom.to_hex().len(), 9);
    }
}

#[test]
fn documented_alpha_boundaries() {
    let hex = |percent| format!("{:02x}", Opacity::new(percent).expect("in range").alpha());
    assert_eq!(hex(0), "00");
    assert_eq!(hex(50), "80");
    assert_eq!(hex(100), "ff");
}
