use proptest::prelude::*;
use sensore_frames::{Frame, FrameDecoder, FRAME_CELLS, GRID_SIDE};

fn to_csv(frames: &[Frame]) -> String {
    frames
        .iter()
        .flat_map(Frame::to_csv_rows)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn sequential_grid_decodes_to_sequential_cells() {
    let text: String = (0..GRID_SIDE)
        .map(|row| {
            (0..GRID_SIDE)
                .map(|col| (row * GRID_SIDE + col).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let parsed = FrameDecoder::new().decode_str(&text).expect("decode");
    let expected: Vec<i32> = (0..FRAME_CELLS as i32).collect();
    assert_eq!(parsed.frames.len(), 1);
    assert_eq!(parsed.frames[0].frame.cells(), expected.as_slice());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn serialized_frames_decode_to_the_same_grids(
        grids in prop::collection::vec(
            prop::collection::vec(0i32..=4095, FRAME_CELLS),
            1..4,
        )
    ) {
        let frames: Vec<Frame> = grids
            .into_iter()
            .map(|cells| Frame::new(cells).expect("1024 cells"))
            .collect();

        let parsed = FrameDecoder::new().decode_str(&to_csv(&frames)).expect("decode");

        prop_assert_eq!(parsed.frames.len(), frames.len());
        prop_assert_eq!(parsed.total_rows, frames.len() * GRID_SIDE);
        for (decoded, original) in parsed.frames.iter().zip(&frames) {
            for row in 0..GRID_SIDE {
                for col in 0..GRID_SIDE {
                    prop_assert_eq!(decoded.frame.get(row, col), original.get(row, col));
                }
            }
        }
    }
}
