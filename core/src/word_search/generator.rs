use core::cmp::Reverse;

use super::*;

/// Random placements tried per word.
pub const RANDOM_PLACEMENT_TRIES: usize = 100;

/// Share of words (after the first) that try to cross an already placed word.
pub const INTERSECTION_CHANCE: f64 = 0.7;

/// Added to a crossing candidate that runs perpendicular to the word it crosses.
const PERPENDICULAR_BONUS: usize = 2;

type Letters = Array2<Option<char>>;

const BOUNDS: Coord2 = (GRID_SIZE, GRID_SIZE);

/// Cells `word` would cover from `start`, and how many of them already hold the right letter.
fn fit(
    letters: &Letters,
    word: &[char],
    start: Coord2,
    direction: Direction,
) -> Option<(Vec<Coord2>, usize)> {
    let cells = direction.walk(start, word.len(), BOUNDS)?;
    let mut overlaps = 0;
    for (&cell, &letter) in cells.iter().zip(word) {
        match letters[cell.to_nd_index()] {
            None => {}
            Some(existing) if existing == letter => overlaps += 1,
            Some(_) => return None,
        }
    }
    Some((cells, overlaps))
}

fn random_placement<R: Rng + ?Sized>(
    letters: &Letters,
    word: &[char],
    rng: &mut R,
) -> Option<(Coord2, Direction)> {
    for _ in 0..RANDOM_PLACEMENT_TRIES {
        let direction = *Direction::ALL.choose(rng)?;
        let start = (rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
        if fit(letters, word, start, direction).is_some() {
            return Some((start, direction));
        }
    }
    None
}

/// Best placement of `word` through a letter it shares with an already placed word.
fn crossing_placement<R: Rng + ?Sized>(
    letters: &Letters,
    word: &[char],
    placements: &[Placement],
    rng: &mut R,
) -> Option<(Coord2, Direction)> {
    let mut best_score = 0;
    let mut best = Vec::new();

    for placed in placements {
        for (cell, letter) in placed.cells().into_iter().zip(placed.word.chars()) {
            let offsets = word
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c == letter)
                .map(|(offset, _)| offset);
            for offset in offsets {
                for direction in Direction::ALL {
                    let Some(start) = direction.opposite().offset(cell, offset, BOUNDS) else {
                        continue;
                    };
                    let Some((_, overlaps)) = fit(letters, word, start, direction) else {
                        continue;
                    };
                    let mut score = overlaps;
                    if direction.is_perpendicular_to(placed.direction) {
                        score += PERPENDICULAR_BONUS;
                    }
                    if score > best_score {
                        best_score = score;
                        best.clear();
                    }
                    if score == best_score {
                        best.push((start, direction));
                    }
                }
            }
        }
    }

    best.choose(rng).copied()
}

/// Builds a 16×16 grid hiding 8 to 12 words of `category` plus its bonus words.
///
/// Words are placed longest first. A word that finds no spot is left out of the result.
pub fn generate_grid<R: Rng + ?Sized>(category: Category, rng: &mut R) -> WordSearchGrid {
    let pool = category.words();
    let count = usize::from(rng.random_range(MIN_WORDS..=MAX_WORDS)).min(pool.len());

    let mut queue: Vec<(&str, bool)> = pool
        .choose_multiple(rng, count)
        .map(|&word| (word, false))
        .chain(category.bonus_words().into_iter().map(|word| (word, true)))
        .collect();
    queue.sort_by_key(|(word, _)| Reverse(word.len()));

    let mut letters: Letters = Array2::default(BOUNDS.to_nd_index());
    let mut placements: Vec<Placement> = Vec::with_capacity(queue.len());

    for (word, bonus) in queue {
        let chars: Vec<char> = word.chars().collect();
        let spot = if placements.is_empty() || !rng.random_bool(INTERSECTION_CHANCE) {
            random_placement(&letters, &chars, rng)
        } else {
            crossing_placement(&letters, &chars, &placements, rng)
                .or_else(|| random_placement(&letters, &chars, rng))
        };
        let Some((start, direction)) = spot else {
            log::warn!("could not place {word} in the {} grid", category.name());
            continue;
        };

        let placement = Placement {
            word: word.to_owned(),
            start,
            direction,
            bonus,
        };
        for (cell, letter) in placement.cells().into_iter().zip(chars) {
            letters[cell.to_nd_index()] = Some(letter);
        }
        placements.push(placement);
    }

    let grid = letters.mapv(|letter| {
        letter.unwrap_or_else(|| char::from(b'A' + rng.random_range(0..26u8)))
    });
    let (bonus, main): (Vec<&Placement>, Vec<&Placement>) =
        placements.iter().partition(|p| p.bonus);
    let words = main.into_iter().map(|p| p.word.clone()).collect();
    let bonus_words = bonus.into_iter().map(|p| p.word.clone()).collect();
    log::debug!(
        "generated {} grid with {} placements",
        category.name(),
        placements.len()
    );

    WordSearchGrid {
        grid,
        words,
        bonus_words,
        placements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn every_word_reads_forward_along_its_placement() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let category = Category::ALL[seed as usize % Category::ALL.len()];
            let generated = generate_grid(category, &mut rng);

            assert!(generated.words.len() <= usize::from(MAX_WORDS));
            assert!(generated.bonus_words.len() <= 3);
            assert_eq!(
                generated.placements.len(),
                generated.words.len() + generated.bonus_words.len()
            );
            for placement in &generated.placements {
                let read: String = placement
                    .cells()
                    .into_iter()
                    .map(|cell| generated.grid[cell.to_nd_index()])
                    .collect();
                assert_eq!(read, placement.word, "seed {seed}");
            }
            assert!(generated.grid.iter().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn words_come_from_the_category() {
        let mut rng = SmallRng::seed_from_u64(3);
        let generated = generate_grid(Category::Space, &mut rng);
        for word in &generated.words {
            assert!(Category::Space.words().contains(&word.as_str()));
        }
        for word in &generated.bonus_words {
            assert!(Category::Space.bonus_words().contains(&word.as_str()));
        }
        assert!(generated.words.len() >= usize::from(MIN_WORDS));
    }

    #[test]
    fn conflicting_letters_do_not_fit() {
        let mut letters: Letters = Array2::default(BOUNDS.to_nd_index());
        letters[[0, 2]] = Some('X');
        let word: Vec<char> = "CAT".chars().collect();
        assert!(fit(&letters, &word, (0, 0), Direction::Right).is_none());

        letters[[0, 2]] = Some('T');
        assert_eq!(fit(&letters, &word, (0, 0), Direction::Right).map(|(_, n)| n), Some(1));
        assert!(fit(&letters, &word, (0, 14), Direction::Right).is_none());
    }

    #[test]
    fn word_may_lie_on_matching_letters() {
        let mut letters: Letters = Array2::default(BOUNDS.to_nd_index());
        for (col, letter) in "CATS".chars().enumerate() {
            letters[[0, col]] = Some(letter);
        }
        let word: Vec<char> = "CAT".chars().collect();
        let (cells, overlaps) = fit(&letters, &word, (0, 0), Direction::Right).unwrap();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2)]);
        assert_eq!(overlaps, 3);
    }

    #[test]
    fn crossing_prefers_perpendicular_runs() {
        let mut letters: Letters = Array2::default(BOUNDS.to_nd_index());
        let placed = Placement {
            word: "CAT".to_owned(),
            start: (5, 3),
            direction: Direction::Right,
            bonus: false,
        };
        for (cell, letter) in placed.cells().into_iter().zip(placed.word.chars()) {
            letters[cell.to_nd_index()] = Some(letter);
        }
        let word: Vec<char> = "TOP".chars().collect();

        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let (start, direction) =
                crossing_placement(&letters, &word, &[placed.clone()], &mut rng).unwrap();
            let cells = direction.walk(start, word.len(), BOUNDS).unwrap();
            assert!(cells.contains(&(5, 5)), "seed {seed}");
            assert!(direction.is_perpendicular_to(Direction::Right), "seed {seed}");
        }
    }

    #[test]
    fn crossing_needs_a_shared_letter() {
        let mut letters: Letters = Array2::default(BOUNDS.to_nd_index());
        let placed = Placement {
            word: "CAT".to_owned(),
            start: (0, 0),
            direction: Direction::Right,
            bonus: false,
        };
        for (cell, letter) in placed.cells().into_iter().zip(placed.word.chars()) {
            letters[cell.to_nd_index()] = Some(letter);
        }
        let word: Vec<char> = "DOG".chars().collect();
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(crossing_placement(&letters, &word, &[placed], &mut rng), None);
    }
}
