//! Paired deck generation.

use rustc_hash::FxHashMap;

use crate::core::{validate_board, GameRng, InvalidBoardError, Symbol};

/// Deal a shuffled paired deck for a `rows` x `cols` board.
///
/// Returns `rows * cols` symbols where each of the first `rows * cols / 2`
/// alphabet symbols appears exactly twice, uniformly shuffled.
///
/// ```
/// use memory_match::core::GameRng;
/// use memory_match::deck::generate;
///
/// let mut rng = GameRng::new(7);
/// let deck = generate(4, 4, &mut rng).unwrap();
/// assert_eq!(deck.len(), 16);
///
/// assert!(generate(3, 3, &mut rng).is_err());
/// ```
pub fn generate(rows: usize, cols: usize, rng: &mut GameRng) -> Result<Vec<Symbol>, InvalidBoardError> {
    validate_board(rows, cols)?;

    let pairs = rows * cols / 2;
    let mut deck: Vec<Symbol> = (0..pairs)
        .filter_map(Symbol::from_index)
        .flat_map(|symbol| [symbol, symbol])
        .collect();

    rng.shuffle(&mut deck);
    Ok(deck)
}

/// Check that `symbols` is a proper paired deck for a `rows` x `cols` board.
///
/// Used when a session is built from an explicit deck instead of a dealt one.
pub fn validate_deck(rows: usize, cols: usize, symbols: &[Symbol]) -> Result<(), InvalidBoardError> {
    validate_board(rows, cols)?;

    let total = rows * cols;
    if symbols.len() != total {
        return Err(InvalidBoardError::MalformedDeck(format!(
            "expected {total} cards, got {}",
            symbols.len()
        )));
    }

    let mut counts: FxHashMap<Symbol, usize> = FxHashMap::default();
    for &symbol in symbols {
        *counts.entry(symbol).or_insert(0) += 1;
    }

    if let Some((symbol, count)) = counts.iter().find(|(_, &count)| count != 2) {
        return Err(InvalidBoardError::MalformedDeck(format!(
            "symbol {symbol} appears {count} times"
        )));
    }

    Ok(())
}
