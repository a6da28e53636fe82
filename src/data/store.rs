//! CSV-backed bet table
//!
//! The table is always read and written whole. Mutations are
//! read-modify-write: load every row, change one, overwrite the file.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::legs::{parse_legs, serialize_legs};
use crate::error::{LedgerError, Result};
use crate::models::{parse_bet_date, Bet, BetResult, NewBet};

/// Column order of the stored table
pub const COLUMNS: [&str; 9] = [
    "date",
    "game",
    "legs",
    "odds",
    "initial_odds",
    "boost",
    "amount",
    "result",
    "profit",
];

/// One stored row
#[derive(Debug, Clone)]
enum Row {
    Bet(Bet),
    /// Cells of a row that could not be read as a bet, kept verbatim
    Unreadable(Vec<Option<String>>),
}

/// Whole-table bet storage in a CSV file
///
/// Bets are addressed by their position among the readable rows, which is
/// the order `load` returns them in. Unreadable rows are never shown but
/// survive every write.
#[derive(Debug, Clone)]
pub struct BetStore {
    path: PathBuf,
}

impl BetStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every bet, recomputing profit from the raw fields
    ///
    /// A missing file is an empty ledger. Rows with unusable odds, stake or
    /// date are left out with a warning.
    pub fn load(&self) -> Result<Vec<Bet>> {
        let bets: Vec<Bet> = self
            .load_rows()?
            .into_iter()
            .filter_map(|row| match row {
                Row::Bet(bet) => Some(bet),
                Row::Unreadable(_) => None,
            })
            .collect();

        debug!("Loaded {} bets from {:?}", bets.len(), self.path);
        Ok(bets)
    }

    /// Load, treating any read failure as an empty ledger
    pub fn load_or_empty(&self) -> Vec<Bet> {
        match self.load() {
            Ok(bets) => bets,
            Err(e) => {
                warn!("Failed to read ledger {:?}: {}. Using empty ledger.", self.path, e);
                Vec::new()
            }
        }
    }

    /// Overwrite the whole table with exactly these bets
    pub fn save(&self, bets: &[Bet]) -> Result<()> {
        let rows: Vec<Row> = bets.iter().cloned().map(Row::Bet).collect();
        self.save_rows(&rows)
    }

    /// Validate and append a new bet; nothing is written on rejection
    pub fn append(&self, new_bet: NewBet) -> Result<Bet> {
        let bet = Bet::from_new(new_bet)?;

        let mut rows = self.load_rows()?;
        rows.push(Row::Bet(bet.clone()));
        self.save_rows(&rows)?;

        Ok(bet)
    }

    /// Re-settle the bet at `index` (position among the loaded bets)
    pub fn update_result(&self, index: usize, result: BetResult) -> Result<Bet> {
        let mut rows = self.load_rows()?;
        let len = rows.iter().filter(|row| matches!(row, Row::Bet(_))).count();
        let bet = rows
            .iter_mut()
            .filter_map(|row| match row {
                Row::Bet(bet) => Some(bet),
                Row::Unreadable(_) => None,
            })
            .nth(index)
            .ok_or(LedgerError::BetNotFound { index, len })?;

        let previous = bet.result;
        bet.resettle(result)?;
        let updated = bet.clone();
        info!(
            "Bet {} ({}) re-settled {} -> {}, profit {:.2}",
            index, updated.game, previous, result, updated.profit
        );

        self.save_rows(&rows)?;
        Ok(updated)
    }

    fn load_rows(&self) -> Result<Vec<Row>> {
        if !self.path.exists() {
            info!("No ledger at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(self.path.clone()))?
            .finish()?;

        Ok(Self::dataframe_to_rows(&df)?)
    }

    fn save_rows(&self, rows: &[Row]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut df = Self::rows_to_dataframe(rows)?;

        // Write a private file beside the target, then swap it in
        let mut tmp = NamedTempFile::new_in(dir)?;
        CsvWriter::new(tmp.as_file_mut())
            .include_header(true)
            .finish(&mut df)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        let kept = rows.iter().filter(|row| matches!(row, Row::Unreadable(_))).count();
        if kept > 0 {
            warn!("Kept {} unreadable rows in {:?} unchanged", kept, self.path);
        }
        info!("Saved {} rows to {:?}", rows.len(), self.path);
        Ok(())
    }

    /// Convert a loaded table into rows
    fn dataframe_to_rows(df: &DataFrame) -> PolarsResult<Vec<Row>> {
        let height = df.height();

        let raw = COLUMNS
            .iter()
            .map(|name| string_values(df, name))
            .collect::<PolarsResult<Vec<_>>>()?;
        let odds_col = i64_values(df, "odds")?;
        let initial_col = i64_values(df, "initial_odds")?;
        let boost_col = f64_values(df, "boost")?;
        let amount_col = f64_values(df, "amount")?;

        let mut rows = Vec::with_capacity(height);
        for i in 0..height {
            let row = i + 1;
            let cell = |column: usize| raw[column][i].as_deref();
            let unreadable = || Row::Unreadable(raw.iter().map(|col| col[i].clone()).collect());

            let date = match cell(0).map(parse_bet_date) {
                Some(Ok(date)) => date,
                _ => {
                    warn!("Row {}: invalid date {:?}, leaving it untouched", row, cell(0));
                    rows.push(unreadable());
                    continue;
                }
            };

            let odds = odds_col[i].unwrap_or(0) as i32;
            let amount = amount_col[i].unwrap_or(0.0);

            let result = match cell(7).unwrap_or("").parse::<BetResult>() {
                Ok(result) => result,
                Err(e) => {
                    warn!("Row {}: {}, treating as pending", row, e);
                    BetResult::Pending
                }
            };

            let mut bet = Bet {
                date,
                game: cell(1).unwrap_or_default().to_string(),
                legs: cell(2).map(parse_legs).unwrap_or_default(),
                odds,
                initial_odds: initial_col[i]
                    .map(|v| v as i32)
                    .filter(|&v| v != 0)
                    .unwrap_or(odds),
                boost: boost_col[i].unwrap_or(0.0).max(0.0),
                amount,
                result,
                profit: 0.0,
            };

            if let Err(e) = bet.recompute() {
                warn!("Row {}: {}, leaving it untouched", row, e);
                rows.push(unreadable());
                continue;
            }

            rows.push(Row::Bet(bet));
        }

        Ok(rows)
    }

    /// Cells of a bet in column order
    fn bet_cells(bet: &Bet) -> [String; 9] {
        [
            bet.date.format("%Y-%m-%d").to_string(),
            bet.game.clone(),
            serialize_legs(&bet.legs),
            bet.odds.to_string(),
            bet.initial_odds.to_string(),
            bet.boost.to_string(),
            bet.amount.to_string(),
            bet.result.to_string(),
            bet.profit.to_string(),
        ]
    }

    /// Convert rows into the stored table layout
    fn rows_to_dataframe(rows: &[Row]) -> PolarsResult<DataFrame> {
        let mut columns: [Vec<Option<String>>; 9] = Default::default();
        for row in rows {
            match row {
                Row::Bet(bet) => {
                    for (column, value) in columns.iter_mut().zip(Self::bet_cells(bet)) {
                        column.push(Some(value));
                    }
                }
                Row::Unreadable(cells) => {
                    for (j, column) in columns.iter_mut().enumerate() {
                        column.push(cells.get(j).cloned().flatten());
                    }
                }
            }
        }

        let [dates, games, legs, odds, initial, boosts, amounts, results, profits] = columns;
        df!(
            COLUMNS[0] => dates,
            COLUMNS[1] => games,
            COLUMNS[2] => legs,
            COLUMNS[3] => odds,
            COLUMNS[4] => initial,
            COLUMNS[5] => boosts,
            COLUMNS[6] => amounts,
            COLUMNS[7] => results,
            COLUMNS[8] => profits
        )
    }
}

/// String values of a column; absent columns read as all-null
fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    match df.column(name) {
        Ok(col) => {
            let cast = col.cast(&DataType::String)?;
            Ok(cast.str()?.into_iter().map(|v| v.map(String::from)).collect())
        }
        Err(_) => Ok(vec![None; df.height()]),
    }
}

fn i64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    match df.column(name) {
        Ok(col) => {
            let cast = col.cast(&DataType::Int64)?;
            Ok(cast.i64()?.into_iter().collect())
        }
        Err(_) => Ok(vec![None; df.height()]),
    }
}

fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    match df.column(name) {
        Ok(col) => {
            let cast = col.cast(&DataType::Float64)?;
            Ok(cast.f64()?.into_iter().collect())
        }
        Err(_) => Ok(vec![None; df.height()]),
    }
}
