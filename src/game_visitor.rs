use clap::Args;
use pgn_reader::{RawHeader, SanPlus, Skip, Visitor};

#[derive(Args)]
pub struct VisitorConfig {
    /// Only accept games where both players have at least this elo
    #[arg(long, value_name = "min-elo")]
    min_elo: Option<usize>,
}

/// A parsed game: the mainline moves in played order, plus the headers the
/// rest of the pipeline reports on. The extractor never consumes the
/// metadata.
#[derive(Debug, Default, Clone)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub result: String,
    pub moves: Vec<SanPlus>,
}

pub struct GameVisitor {
    config: VisitorConfig,

    /// Record being accumulated for the current game
    record: GameRecord,
    keep: bool,

    white_elo: usize,
    black_elo: usize,
}

impl GameVisitor {
    pub fn new(config: VisitorConfig) -> Self {
        GameVisitor {
            config,

            record: GameRecord::default(),
            keep: true,

            white_elo: 0,
            black_elo: 0,
        }
    }
}

impl Visitor for GameVisitor {
    type Result = Option<GameRecord>;

    fn begin_game(&mut self) {
        self.record = GameRecord::default();
        self.keep = true;
        self.white_elo = 0;
        self.black_elo = 0;
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let value = String::from_utf8_lossy(value.as_bytes());

        match key {
            b"White" => self.record.white = value.to_string(),
            b"Black" => self.record.black = value.to_string(),
            b"Result" => self.record.result = value.to_string(),
            b"WhiteElo" => self.white_elo = value.parse().unwrap_or(0),
            b"BlackElo" => self.black_elo = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    fn end_headers(&mut self) -> Skip {
        let min_elo = self.config.min_elo.unwrap_or(0);

        self.keep = self.white_elo >= min_elo && self.black_elo >= min_elo;
        Skip(!self.keep)
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn san(&mut self, san_plus: SanPlus) {
        self.record.moves.push(san_plus);
    }

    fn end_game(&mut self) -> Self::Result {
        if !self.keep {
            // rejected games go through here too
            return None;
        }

        Some(std::mem::take(&mut self.record))
    }
}
