use crate::error::DataError;
use crate::game_visitor::GameRecord;
use crate::sample::TrainingExample;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{Chess, EnPassantMode, Position};

/// Replays a game from the standard starting position and emits one training
/// example per move played.
///
/// Each example pairs the FEN of the position *before* the move with the SAN
/// of the move itself, rendered against that same position. The position the
/// model learns from is always the one the move was chosen in.
///
/// A move that cannot be applied fails the whole game: the error names the
/// ply and the offending SAN, and no partial output is returned.
pub fn extract_game(record: &GameRecord) -> Result<Vec<TrainingExample>, DataError> {
    let mut pos = Chess::default();
    let mut examples = Vec::with_capacity(record.moves.len());

    for (ply, san_plus) in record.moves.iter().enumerate() {
        let mov = san_plus
            .san
            .to_move(&pos)
            .map_err(|_| DataError::IllegalMove {
                san: san_plus.to_string(),
                ply,
            })?;

        let fen = Fen(pos.clone().into_setup(EnPassantMode::Always)).to_string();
        // re-render instead of echoing the input token, so disambiguation
        // and check/mate suffixes are canonical
        let san = SanPlus::from_move(pos.clone(), &mov).to_string();

        examples.push(TrainingExample::new(fen, san));

        pos = pos.play(&mov).map_err(|_| DataError::IllegalMove {
            san: san_plus.to_string(),
            ply,
        })?;
    }

    Ok(examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::CastlingMode;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn record(sans: &[&str]) -> GameRecord {
        GameRecord {
            moves: sans.iter().map(|s| s.parse::<SanPlus>().unwrap()).collect(),
            ..GameRecord::default()
        }
    }

    fn position_of(fen: &str) -> Chess {
        Fen::from_ascii(fen.as_bytes())
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    #[test]
    fn empty_game_yields_no_examples() {
        assert!(extract_game(&record(&[])).unwrap().is_empty());
    }

    #[test]
    fn one_example_per_move() {
        let examples = extract_game(&record(&["e4", "e5", "Nf3", "Nc6", "Bb5"])).unwrap();
        assert_eq!(examples.len(), 5);
    }

    #[test]
    fn examples_use_premove_positions() {
        let examples = extract_game(&record(&["e4", "e5", "Nf3"])).unwrap();

        assert_eq!(examples[0].fen, START_FEN);
        assert_eq!(examples[0].san, "e4");

        assert_eq!(
            examples[1].fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(examples[1].san, "e5");

        assert_eq!(
            examples[2].fen,
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );
        assert_eq!(examples[2].san, "Nf3");
    }

    #[test]
    fn applying_the_move_reaches_the_next_example() {
        let examples =
            extract_game(&record(&["d4", "Nf6", "c4", "g6", "Nc3", "d5", "cxd5"])).unwrap();

        for window in examples.windows(2) {
            let pos = position_of(&window[0].fen);
            let mov = window[0]
                .san
                .parse::<SanPlus>()
                .unwrap()
                .san
                .to_move(&pos)
                .unwrap();
            let next = pos.play(&mov).unwrap();

            assert_eq!(
                Fen(next.into_setup(EnPassantMode::Always)).to_string(),
                window[1].fen
            );
        }
    }

    #[test]
    fn every_emitted_pair_is_legal() {
        let examples =
            extract_game(&record(&["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6"])).unwrap();
        assert_eq!(examples.len(), 8);

        for example in &examples {
            let pos = position_of(&example.fen);
            let mov = example
                .san
                .parse::<SanPlus>()
                .unwrap()
                .san
                .to_move(&pos)
                .unwrap();
            assert!(pos.play(&mov).is_ok());
        }
    }

    #[test]
    fn illegal_move_discards_the_game() {
        // no white knight reaches f6 after 1. e4 e5
        let err = extract_game(&record(&["e4", "e5", "Nf6"])).unwrap_err();

        match err {
            DataError::IllegalMove { ply, .. } => assert_eq!(ply, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn suffixes_are_restored_canonically() {
        // fool's mate, with the mate suffix missing from the input
        let examples = extract_game(&record(&["f3", "e5", "g4", "Qh4"])).unwrap();
        assert_eq!(examples[3].san, "Qh4#");
    }
}
