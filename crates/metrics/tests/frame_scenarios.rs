use proptest::prelude::*;
use sensore_frames::{Frame, FrameDecoder, FRAME_CELLS, GRID_SIDE};
use sensore_metrics::{is_clustered, MetricsCalculator};

fn frame_from(value: impl Fn(usize, usize) -> i32) -> Frame {
    let cells = (0..FRAME_CELLS)
        .map(|i| value(i / GRID_SIDE, i % GRID_SIDE))
        .collect();
    Frame::new(cells).expect("1024 cells")
}

#[test]
fn centered_region_with_ring() {
    let frame = frame_from(|row, col| {
        if (12..=20).contains(&row) && (12..=20).contains(&col) {
            450
        } else if (8..=24).contains(&row) && (8..=24).contains(&col) {
            200
        } else {
            15
        }
    });
    let record = MetricsCalculator::default().compute(&frame, 1);
    assert_eq!(record.peak_pressure_index, 450.0);
    // 17x17 contact cells
    assert_eq!(record.contact_area_percent, 28.22);
    assert!(record.cov > 0.0);
}

#[test]
fn all_zero_frame() {
    let record = MetricsCalculator::default().compute(&frame_from(|_, _| 0), 2);
    assert_eq!(record.peak_pressure_index, 0.0);
    assert_eq!(record.contact_area_percent, 0.0);
    assert_eq!(record.cov, 0.0);
}

#[test]
fn half_contact_frame() {
    let frame = frame_from(|row, col| if (row * GRID_SIDE + col) < 512 { 100 } else { 20 });
    let record = MetricsCalculator::default().compute(&frame, 6);
    assert_eq!(record.contact_area_percent, 50.0);
}

#[test]
fn decoded_frame_feeds_calculator() {
    let text = (0..GRID_SIDE)
        .map(|row| {
            (0..GRID_SIDE)
                .map(|col| (row * GRID_SIDE + col).to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n");
    let parsed = FrameDecoder::new().decode_str(&text).unwrap();
    let record = MetricsCalculator::default().compute(&parsed.frames[0].frame, 1);

    // 0..=30 are not contact: 993 contact cells
    assert_eq!(record.contact_area_percent, 96.97);
    // 523 cells above 500 is a confirmed region
    assert_eq!(record.peak_pressure_index, 1023.0);
}

#[test]
fn clustering_examples() {
    assert!(is_clustered(&[330, 331, 332, 362, 363, 364]));
    assert!(!is_clustered(&[10, 200, 500, 800, 1000]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn contact_area_matches_formula(cells in prop::collection::vec(0i32..=4095, FRAME_CELLS)) {
        let contact = cells.iter().filter(|&&v| v > 30).count();
        let expected = (contact as f64 / 1024.0 * 100.0 * 100.0).round_ties_even() / 100.0;
        let frame = Frame::new(cells).unwrap();
        let record = MetricsCalculator::default().compute(&frame, 1);
        prop_assert_eq!(record.contact_area_percent, expected);
        prop_assert!((0.0..=100.0).contains(&record.contact_area_percent));
        prop_assert!(record.cov >= 0.0);
        prop_assert!(record.peak_pressure_index >= 0.0);
    }

    #[test]
    fn sub_contact_frames_are_all_zero(cells in prop::collection::vec(0i32..=30, FRAME_CELLS)) {
        let frame = Frame::new(cells).unwrap();
        let record = MetricsCalculator::default().compute(&frame, 1);
        prop_assert_eq!(record.peak_pressure_index, 0.0);
        prop_assert_eq!(record.contact_area_percent, 0.0);
        prop_assert_eq!(record.cov, 0.0);
    }

    #[test]
    fn uniform_contact_has_zero_cov(value in 31i32..=4095) {
        let frame = Frame::new(vec![value; FRAME_CELLS]).unwrap();
        prop_assert_eq!(MetricsCalculator::default().compute(&frame, 1).cov, 0.0);
    }

    #[test]
    fn metrics_are_idempotent(cells in prop::collection::vec(0i32..=4095, FRAME_CELLS), id in 1i64..10_000) {
        let frame = Frame::new(cells).unwrap();
        let calculator = MetricsCalculator::default();
        let first = calculator.compute(&frame, id);
        let second = calculator.compute(&frame, id);
        prop_assert!(first.same_metrics(&second));
        prop_assert_eq!(first.frame_id, second.frame_id);
    }
}
