//! End-to-end properties of whole generation runs

use glyph_wfc::{
    build_generator,
    catalog::Pattern,
    generator::{
        propagator::PropagationBudget,
        rules::Tileset,
        socket::{can_connect, SocketLabel, Sockets},
        tile::Tile,
        Generator, RngMode,
    },
    grid::{direction::Direction, GridData, GridDefinition},
    render, GenerationError,
};

fn maze() -> Tileset {
    Tileset::new(vec![
        Sockets::Mono("wall".into()).new_tile('#').with_weight(2.0),
        Sockets::Mono("path".into()).new_tile('.').with_weight(1.0),
    ])
    .unwrap()
}

fn levels() -> Tileset {
    Tileset::new(
        ['0', '1', '2', '3']
            .into_iter()
            .zip(0..)
            .map(|(symbol, level)| Sockets::Mono(SocketLabel::Level(level)).new_tile(symbol))
            .collect(),
    )
    .unwrap()
}

fn level_of(tile: &Tile) -> i32 {
    match tile.socket(Direction::North) {
        Some(SocketLabel::Level(level)) => *level,
        other => panic!("Tile {} has no level: {:?}", tile, other),
    }
}

/// Calls `f` on every (left, right) and (top, bottom) pair of the grid
fn for_each_adjacent_pair<F>(grid_data: &GridData<Tile>, mut f: F)
where
    F: FnMut(&Tile, &Tile, Direction),
{
    let grid = *grid_data.grid();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let tile = grid_data.get_2d(x, y);
            if x + 1 < grid.width() {
                f(tile, grid_data.get_2d(x + 1, y), Direction::East);
            }
            if y + 1 < grid.height() {
                f(tile, grid_data.get_2d(x, y + 1), Direction::South);
            }
        }
    }
}

fn assert_sound(grid_data: &GridData<Tile>) {
    for_each_adjacent_pair(grid_data, |from, to, direction| {
        assert!(
            can_connect(from, to, direction),
            "{} and {} cannot be adjacent in direction {}",
            from,
            to,
            direction
        );
        assert!(can_connect(to, from, direction.opposite()));
    });
}

#[test]
fn same_seed_gives_the_same_grid() {
    for pattern in Pattern::ALL {
        let run = || {
            build_generator(12, 9, pattern.tileset(), 1234)
                .unwrap()
                .generate()
                .map(|grid_data| render::to_text(&grid_data))
        };
        assert_eq!(run(), run(), "pattern {}", pattern);
    }
}

#[test]
fn default_rng_is_reproducible() {
    let run = || {
        Generator::builder()
            .with_tileset(Pattern::Circuit.tileset())
            .with_grid(GridDefinition::new(10, 10).unwrap())
            .build()
            .generate()
            .map(|grid_data| render::to_text(&grid_data))
    };
    assert_eq!(run(), run());
}

#[test]
fn successful_grids_are_sound() {
    for pattern in Pattern::ALL {
        for seed in 0..5 {
            let mut generator = build_generator(10, 8, pattern.tileset(), seed).unwrap();
            match generator.generate() {
                Ok(grid_data) => {
                    assert_eq!(grid_data.nodes().len(), 80);
                    assert_sound(&grid_data);
                }
                Err(err) => assert!(err.is_recoverable(), "{}", err),
            }
        }
    }
}

#[test]
fn circuits_never_fail() {
    for seed in 0..10 {
        let mut generator = build_generator(16, 16, Pattern::Circuit.tileset(), seed).unwrap();
        let grid_data = generator.generate().unwrap();
        assert_sound(&grid_data);
    }
}

#[test]
fn sockets_only_connect_when_declared_compatible() {
    // Every north/south combination exists, so every run can succeed
    let tileset = Tileset::new(
        [
            ('║', "wall", "wall"),
            ('╨', "wall", "path"),
            ('╥', "path", "wall"),
            (' ', "path", "path"),
        ]
        .into_iter()
        .map(|(symbol, north, south)| {
            Sockets::Simple {
                north: Some(north.into()),
                east: Some("side".into()),
                south: Some(south.into()),
                west: Some("side".into()),
            }
            .new_tile(symbol)
        })
        .collect(),
    )
    .unwrap();
    let wall = SocketLabel::tag("wall");
    let path = SocketLabel::tag("path");
    for seed in 0..5 {
        let grid_data = build_generator(8, 8, tileset.clone(), seed)
            .unwrap()
            .generate()
            .unwrap();
        for_each_adjacent_pair(&grid_data, |upper, lower, direction| {
            if direction == Direction::South {
                let blocked = lower.socket(Direction::North) == Some(&wall)
                    && upper.socket(Direction::South) == Some(&path);
                assert!(!blocked, "{} above {}", upper, lower);
            }
        });
    }
}

#[test]
fn missing_sockets_never_connect() {
    // '-' has no north/south sockets: it can only live on a 1 row grid
    let tiles = vec![
        Tile::try_from_sockets(
            '-',
            vec![(Direction::East, "a".into()), (Direction::West, "a".into())],
        )
        .unwrap(),
        Sockets::Mono("a".into()).new_tile('+'),
    ];
    let tileset = Tileset::new(tiles).unwrap();

    let row = build_generator(6, 1, tileset.clone(), 3)
        .unwrap()
        .generate()
        .unwrap();
    assert_sound(&row);

    let square = build_generator(4, 4, tileset, 3)
        .unwrap()
        .generate()
        .unwrap();
    assert!(square.nodes().iter().all(|tile| tile.symbol() == '+'));
}

#[test]
fn levels_differ_by_at_most_one() {
    for seed in 0..10 {
        let grid_data = build_generator(9, 9, levels(), seed)
            .unwrap()
            .generate()
            .unwrap();
        for_each_adjacent_pair(&grid_data, |a, b, _| {
            assert!((level_of(a) - level_of(b)).abs() <= 1);
        });
    }
}

#[test]
fn tiny_budget_never_claims_success() {
    for seed in 0..5 {
        let mut generator = Generator::builder()
            .with_tileset(levels())
            .with_grid(GridDefinition::new(3, 2).unwrap())
            .with_propagation_budget(PropagationBudget::Fixed(1))
            .with_rng(RngMode::Seeded(seed))
            .build();
        assert!(generator.generate().is_err());
        assert!(generator.collapsed_grid().is_none());
    }
}

#[test]
fn free_tilesets_need_no_propagation_budget() {
    // Nothing is ever narrowed, so nothing is ever left queued
    let mut generator = Generator::builder()
        .with_tileset(Pattern::Mosaic.tileset())
        .with_grid(GridDefinition::new(10, 10).unwrap())
        .with_propagation_budget(PropagationBudget::Fixed(1))
        .build();
    let grid_data = generator.generate().unwrap();
    assert_eq!(grid_data.nodes().len(), 100);
}

#[test]
fn collapse_follows_the_weights() {
    let tileset = Tileset::new(vec![
        Sockets::Mono(SocketLabel::Unlabeled).new_tile('a').with_weight(3.0),
        Sockets::Mono(SocketLabel::Unlabeled).new_tile('b').with_weight(1.0),
    ])
    .unwrap();
    let samples = 2000;
    let a_count = (0..samples)
        .filter(|&seed| {
            let grid_data = build_generator(1, 1, tileset.clone(), seed)
                .unwrap()
                .generate()
                .unwrap();
            grid_data.get(0).symbol() == 'a'
        })
        .count();
    let frequency = a_count as f64 / samples as f64;
    assert!((0.70..=0.80).contains(&frequency), "frequency of 'a': {}", frequency);
}

#[test]
fn walls_and_paths_on_a_5x5_grid() {
    let run = || {
        build_generator(5, 5, maze(), 42)
            .unwrap()
            .generate()
            .unwrap()
    };
    let grid_data = run();
    for_each_adjacent_pair(&grid_data, |a, b, _| assert_eq!(a.symbol(), b.symbol()));
    assert_eq!(render::rows(&grid_data), render::rows(&run()));
}

#[test]
fn levels_on_a_4x4_grid() {
    let grid_data = build_generator(4, 4, levels(), 7)
        .unwrap()
        .generate()
        .unwrap();
    let mut max_difference = 0;
    for_each_adjacent_pair(&grid_data, |a, b, _| {
        max_difference = max_difference.max((level_of(a) - level_of(b)).abs());
    });
    assert!(max_difference <= 1);
}

#[test]
fn budget_of_one_on_a_10x10_grid_fails() {
    let mut generator = Generator::builder()
        .with_tileset(levels())
        .with_grid(GridDefinition::new(10, 10).unwrap())
        .with_propagation_budget(PropagationBudget::Fixed(1))
        .with_rng(RngMode::Seeded(42))
        .build();
    match generator.generate() {
        Err(GenerationError::PropagationBudgetExceeded { budget, .. }) => assert_eq!(budget, 1),
        Err(GenerationError::Contradiction { .. }) => (),
        other => panic!("Expected a failed generation, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn shared_tileset_gives_independent_runs() {
    let tileset = std::sync::Arc::new(Pattern::Gradient.tileset());
    let mut generators: Vec<Generator> = [1, 2, 1]
        .into_iter()
        .map(|seed| {
            Generator::builder()
                .with_shared_tileset(tileset.clone())
                .with_grid(GridDefinition::new(7, 7).unwrap())
                .with_rng(RngMode::Seeded(seed))
                .build()
        })
        .collect();
    let outputs: Vec<String> = generators
        .iter_mut()
        .map(|generator| render::to_text(&generator.generate().unwrap()))
        .collect();
    assert_eq!(outputs[0], outputs[2]);
}

#[test]
fn retries_report_the_successful_seed() {
    let mut generator = build_generator(12, 12, Pattern::Gradient.tileset(), 5).unwrap();
    let (info, grid_data) = generator.generate_with_retries(10).unwrap();
    assert_eq!(info.try_count, 1);
    assert_eq!(info.seed, 5);

    let replay = build_generator(12, 12, Pattern::Gradient.tileset(), info.seed)
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(replay, grid_data);
}
