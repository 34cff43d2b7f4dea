//! Golden fixture: an opening-colored spiral drawn on a 128×128 grid.

use std::f64::consts::PI;

use ep_core::{Coord, Grid, TileCategory};
use ep_geometry::{extract_openings, find_shapes};

const SIZE: i32 = 128;

/// Points `(cos(2πi/360)·10 + i/2, sin(2πi/360)·10 + i/2)` for `i` in `0..360`, rounded.
fn spiral_points() -> Vec<Coord> {
    (0..360)
        .map(|i| {
            let t = 2.0 * PI * f64::from(i) / 360.0;
            let half = f64::from(i) / 2.0;
            Coord::new(
                (t.cos() * 10.0 + half).round() as i32,
                (t.sin() * 10.0 + half).round() as i32,
            )
        })
        .filter(|p| p.x < SIZE && p.y < SIZE)
        .collect()
}

fn spiral_grid() -> Grid {
    let mut grid = Grid::new(SIZE, SIZE).unwrap();
    let opening = grid.catalog().color_of(TileCategory::Opening);
    for p in spiral_points() {
        grid.populate(p, opening).unwrap();
    }
    grid
}

fn expected_shapes() -> Vec<Vec<Coord>> {
    let raw: &[&[(i32, i32)]] = &[
        &[(10, 0), (10, 1), (11, 1), (11, 2)],
        &[(13, 4), (13, 5), (14, 5), (14, 6)],
        &[(16, 8), (16, 9), (17, 9), (17, 10)],
        &[(19, 12), (19, 13)],
        &[(20, 14), (20, 15), (21, 15), (21, 16)],
        &[(22, 17), (22, 18)],
        &[(24, 20), (24, 21)],
        &[
            (25, 22), (25, 23), (26, 23), (26, 24), (26, 25), (27, 25),
            (27, 26), (28, 26), (28, 27), (28, 28), (29, 28), (29, 29),
        ],
        &[
            (30, 30), (30, 31), (31, 31), (31, 32), (31, 33), (32, 33),
            (32, 34), (33, 34), (33, 35), (33, 36), (34, 36), (34, 37),
        ],
        &[(35, 38), (35, 39)],
        &[(36, 40), (36, 41)],
        &[(37, 42), (37, 43), (38, 43), (38, 44)],
        &[(39, 45), (39, 46)],
        &[(40, 47), (40, 48), (41, 48), (41, 49)],
        &[(42, 50), (42, 51), (43, 51), (43, 52)],
        &[(44, 53), (44, 54), (45, 54), (45, 55)],
        &[(46, 56), (46, 57), (47, 57), (47, 58)],
        &[(48, 59), (48, 60), (49, 60), (49, 61)],
        &[(50, 62), (50, 63), (51, 63), (51, 64), (52, 64), (52, 65)],
        &[
            (53, 66), (53, 67), (54, 67), (54, 68),
            (55, 68), (55, 69), (56, 69), (56, 70),
        ],
        &[(60, 74), (60, 75), (61, 75)],
        &[
            (65, 79), (66, 79), (66, 80), (67, 80),
            (67, 81), (68, 81), (68, 82), (69, 82),
        ],
        &[(70, 83), (71, 83), (71, 84), (72, 84), (72, 85), (73, 85)],
        &[(74, 86), (75, 86), (75, 87), (76, 87)],
        &[(77, 88), (78, 88), (78, 89), (79, 89)],
        &[(80, 90), (81, 90), (81, 91), (82, 91)],
        &[(83, 92), (84, 92), (84, 93), (85, 93)],
        &[(86, 94), (87, 94), (87, 95), (88, 95)],
        &[(89, 96), (90, 96)],
        &[(91, 97), (92, 97), (92, 98), (93, 98)],
        &[(94, 99), (95, 99)],
        &[(96, 100), (97, 100)],
        &[
            (98, 101), (99, 101), (99, 102), (100, 102), (101, 102), (101, 103),
            (102, 103), (102, 104), (103, 104), (104, 104), (104, 105), (105, 105),
        ],
        &[
            (106, 106), (107, 106), (107, 107), (108, 107), (109, 107), (109, 108),
            (110, 108), (110, 109), (111, 109), (112, 109), (112, 110), (113, 110),
        ],
        &[(114, 111), (115, 111)],
        &[(117, 113), (118, 113)],
        &[(119, 114), (120, 114), (120, 115), (121, 115)],
        &[(122, 116), (123, 116)],
        &[(125, 118), (126, 118), (126, 119), (127, 119)],
    ];
    raw.iter()
        .map(|shape| shape.iter().copied().map(Coord::from).collect())
        .collect()
}

#[test]
fn spiral_shapes_match_fixture() {
    let grid = spiral_grid();
    assert_eq!(find_shapes(&grid, TileCategory::Opening), expected_shapes());
}

#[test]
fn spiral_openings_numbered_in_discovery_order() {
    let grid = spiral_grid();
    let openings = extract_openings(&grid);
    let expected = expected_shapes();
    assert_eq!(openings.len(), expected.len());
    for ((id, opening), (pixels, n)) in openings.iter().zip(expected.iter().zip(1u32..)) {
        assert_eq!(*id, n);
        assert_eq!(opening.pixels(), pixels.as_slice());
    }
}

#[test]
fn spiral_count_matches_populated_cells() {
    let grid = spiral_grid();
    let populated = grid.cells().filter(|c| c.a != 0).count();
    assert_eq!(grid.count_category(TileCategory::Opening), populated);
    assert!(populated > 0);
}
