use seat_layout::{ChgForOccupiedN, Env8Neighbors, Error, SeatMap, Sight8Neighbors, TileType};

const INITIAL_LAYOUT: &str = "L.LL.LL.LL
LLLLLLL.LL
L.L.L..L..
LLLL.LL.LL
L.LL.LL.LL
L.LLLLL.LL
..L.L.....
LLLLLLLLLL
L.LLLLLL.L
L.LLLLL.LL";

const ADJACENT_ROUNDS: [&str; 5] = [
    "#.##.##.##
#######.##
#.#.#..#..
####.##.##
#.##.##.##
#.#####.##
..#.#.....
##########
#.######.#
#.#####.##",
    "#.LL.L#.##
#LLLLLL.L#
L.L.L..L..
#LLL.LL.L#
#.LL.LL.LL
#.LLLL#.##
..L.L.....
#LLLLLLLL#
#.LLLLLL.L
#.#LLLL.##",
    "#.##.L#.##
#L###LL.L#
L.#.#..#..
#L##.##.L#
#.##.LL.LL
#.###L#.##
..#.#.....
#L######L#
#.LL###L.L
#.#L###.##",
    "#.#L.L#.##
#LLL#LL.L#
L.L.L..#..
#LLL.##.L#
#.LL.LL.LL
#.LL#L#.##
..L.L.....
#L#LLLL#L#
#.LLLLLL.L
#.#L#L#.##",
    "#.#L.L#.##
#LLL#LL.L#
L.#.L..#..
#L##.##.L#
#.#L.LL.LL
#.#L#L#.##
..L.L.....
#L#L##L#L#
#.LLLLLL.L
#.#L#L#.##",
];

const VISIBLE_ROUNDS: [&str; 6] = [
    "#.##.##.##
#######.##
#.#.#..#..
####.##.##
#.##.##.##
#.#####.##
..#.#.....
##########
#.######.#
#.#####.##",
    "#.LL.LL.L#
#LLLLLL.LL
L.L.L..L..
LLLL.LL.LL
L.LL.LL.LL
L.LLLLL.LL
..L.L.....
LLLLLLLLL#
#.LLLLLL.L
#.LLLLL.L#",
    "#.L#.##.L#
#L#####.LL
L.#.#..#..
##L#.##.##
#.##.#L.##
#.#####.#L
..#.#.....
LLL####LL#
#.L#####.L
#.L####.L#",
    "#.L#.L#.L#
#LLLLLL.LL
L.L.L..#..
##LL.LL.L#
L.LL.LL.L#
#.LLLLL.LL
..L.L.....
LLLLLLLLL#
#.LLLLL#.L
#.L#LL#.L#",
    "#.L#.L#.L#
#LLLLLL.LL
L.L.L..#..
##L#.#L.L#
L.L#.#L.L#
#.L####.LL
..#.#.....
LLL###LLL#
#.LLLLL#.L
#.L#LL#.L#",
    "#.L#.L#.L#
#LLLLLL.LL
L.L.L..#..
##L#.#L.L#
L.L#.LL.L#
#.LLLL#.LL
..#.L.....
LLL###LLL#
#.LLLLL#.L
#.L#LL#.L#",
];

fn initial_map() -> SeatMap {
    INITIAL_LAYOUT.parse().unwrap()
}

#[test]
fn layout_text_round_trips() {
    let seat_map = initial_map();
    assert_eq!(seat_map.row_n(), 10);
    assert_eq!(seat_map.col_n(), 10);
    assert_eq!(seat_map.to_string(), INITIAL_LAYOUT);

    let with_newline = SeatMap::try_from(format!("{}\n", INITIAL_LAYOUT).as_str()).unwrap();
    assert_eq!(with_newline, seat_map);
}

#[test]
fn adjacent_rule_rounds_match_fixture() {
    let mut seat_map = initial_map();
    let rule = ChgForOccupiedN::new(4);
    for expect in ADJACENT_ROUNDS {
        assert!(seat_map.step(&Env8Neighbors, &rule) > 0);
        assert_eq!(seat_map.to_string(), expect);
    }
    assert_eq!(seat_map.step(&Env8Neighbors, &rule), 0);
}

#[test]
fn visible_rule_rounds_match_fixture() {
    let mut seat_map = initial_map();
    let rule = ChgForOccupiedN::new(5);
    for expect in VISIBLE_ROUNDS {
        assert!(seat_map.step(&Sight8Neighbors, &rule) > 0);
        assert_eq!(seat_map.to_string(), expect);
    }
    assert_eq!(seat_map.step(&Sight8Neighbors, &rule), 0);
}

#[test]
fn adjacent_rule_converges() {
    let mut seat_map = initial_map();
    let round_count = seat_map
        .run_to_convergence(&Env8Neighbors, &ChgForOccupiedN::new(4), None)
        .unwrap();
    assert_eq!(round_count, 5);
    assert_eq!(seat_map.count_occupied(), 37);
    assert_eq!(seat_map.to_string(), ADJACENT_ROUNDS[4]);
}

#[test]
fn visible_rule_converges() {
    let mut seat_map = initial_map();
    let round_count = seat_map
        .run_to_convergence(&Sight8Neighbors, &ChgForOccupiedN::new(5), None)
        .unwrap();
    assert_eq!(round_count, 6);
    assert_eq!(seat_map.count(TileType::Occupied), 26);
}

#[test]
fn converged_layout_is_fixed_point() {
    let mut seat_map = initial_map();
    let rule = ChgForOccupiedN::new(4);
    seat_map
        .run_to_convergence(&Env8Neighbors, &rule, None)
        .unwrap();

    let (next, chg_count) = seat_map.evolve(&Env8Neighbors, &rule);
    assert_eq!(chg_count, 0);
    assert_eq!(next, seat_map);
}

#[test]
fn evolve_leaves_previous_layout_untouched() {
    let seat_map = initial_map();
    let (next, chg_count) = seat_map.evolve(&Env8Neighbors, &ChgForOccupiedN::new(4));
    assert_eq!(seat_map.to_string(), INITIAL_LAYOUT);
    assert_eq!(next.to_string(), ADJACENT_ROUNDS[0]);
    assert_eq!(chg_count, 71);
}

#[test]
fn repeated_runs_are_identical() {
    let run = || {
        let mut seat_map = initial_map();
        let round_count = seat_map
            .run_to_convergence(&Sight8Neighbors, &ChgForOccupiedN::new(5), None)
            .unwrap();
        (round_count, seat_map)
    };

    assert_eq!(run(), run());
}

#[test]
fn border_tiles_only_see_inside() {
    let seat_map: SeatMap = "##\n##".parse().unwrap();
    for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        assert_eq!(
            seat_map.occupied_neighbors(&Env8Neighbors, r, c, 8).unwrap(),
            3
        );
        assert_eq!(
            seat_map.occupied_neighbors(&Sight8Neighbors, r, c, 8).unwrap(),
            3
        );
    }
}

#[test]
fn sight_stops_at_first_seat() {
    let seat_map: SeatMap = ".............\n.L.L.#.#.#.#.\n.............".parse().unwrap();
    assert_eq!(
        seat_map.occupied_neighbors(&Sight8Neighbors, 1, 1, 8).unwrap(),
        0
    );
    assert_eq!(
        seat_map.occupied_neighbors(&Sight8Neighbors, 1, 3, 8).unwrap(),
        1
    );
}

#[test]
fn sight_looks_over_floor() {
    let seat_map: SeatMap = ".......#.
...#.....
.#.......
.........
..#L....#
....#....
.........
#........
...#....."
        .parse()
        .unwrap();
    assert_eq!(
        seat_map.occupied_neighbors(&Sight8Neighbors, 4, 3, 8).unwrap(),
        8
    );
    assert_eq!(
        seat_map.occupied_neighbors(&Env8Neighbors, 4, 3, 8).unwrap(),
        2
    );

    let blind: SeatMap = ".##.##.
#.#.#.#
##...##
...L...
##...##
#.#.#.#
.##.##."
        .parse()
        .unwrap();
    assert_eq!(
        blind.occupied_neighbors(&Sight8Neighbors, 3, 3, 8).unwrap(),
        0
    );
}

#[test]
fn counting_stops_at_limit() {
    let seat_map: SeatMap = "###\n###\n###".parse().unwrap();
    assert_eq!(
        seat_map.occupied_neighbors(&Env8Neighbors, 1, 1, 4).unwrap(),
        4
    );
    assert_eq!(
        seat_map.occupied_neighbors(&Sight8Neighbors, 1, 1, 5).unwrap(),
        5
    );
    assert_eq!(
        seat_map.occupied_neighbors(&Env8Neighbors, 1, 1, 8).unwrap(),
        8
    );
}

#[test]
fn out_of_range_position_is_rejected() {
    let seat_map = initial_map();
    assert!(matches!(
        seat_map.occupied_neighbors(&Env8Neighbors, 10, 0, 4),
        Err(Error::PositionOutOfRange {
            r: 10,
            c: 0,
            row_n: 10,
            col_n: 10
        })
    ));
    assert!(matches!(
        seat_map.occupied_neighbors(&Sight8Neighbors, 0, 10, 5),
        Err(Error::PositionOutOfRange { .. })
    ));
    assert_eq!(seat_map.tile(0, 10), None);
    assert_eq!(seat_map.tile(0, 1), Some(TileType::Floor));
}

#[test]
fn malformed_layout_is_rejected() {
    assert!(matches!(
        "L.L\nLL".parse::<SeatMap>(),
        Err(Error::InconsistentSeatMapRow(2, 3))
    ));
    assert!(matches!(
        "L.L\nLxL".parse::<SeatMap>(),
        Err(Error::InvalidSeatChar('x'))
    ));
    assert!(matches!("".parse::<SeatMap>(), Err(Error::EmptySeatMap)));
}

#[test]
fn round_cap_reports_non_convergence() {
    let mut seat_map = initial_map();
    let rule = ChgForOccupiedN::new(4);
    assert!(matches!(
        seat_map.run_to_convergence(&Env8Neighbors, &rule, Some(2)),
        Err(Error::NotConverged(2))
    ));

    let mut seat_map = initial_map();
    assert_eq!(
        seat_map
            .run_to_convergence(&Env8Neighbors, &rule, Some(5))
            .unwrap(),
        5
    );
}

#[test]
fn floor_never_changes() {
    let mut seat_map: SeatMap = "...\n...".parse().unwrap();
    let round_count = seat_map
        .run_to_convergence(&Env8Neighbors, &ChgForOccupiedN::new(4), None)
        .unwrap();
    assert_eq!(round_count, 0);
    assert_eq!(seat_map.to_string(), "...\n...");
}
