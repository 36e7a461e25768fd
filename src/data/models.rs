use crate::error::AppError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const SLOTS_PER_RELATION: usize = 5;

/// The four ranked hero lists stored per main hero in `hero_data.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Heroes strong against the main hero
    Counter,
    /// Heroes the main hero is strong against
    Countered,
    /// Best teammates
    Best,
    /// Worst teammates
    Worst,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::Counter,
        Relation::Countered,
        Relation::Best,
        Relation::Worst,
    ];

    pub fn column_prefix(self) -> &'static str {
        match self {
            Relation::Counter => "counter",
            Relation::Countered => "countered",
            Relation::Best => "best",
            Relation::Worst => "worst",
        }
    }
}

pub type Slots = [Option<i64>; SLOTS_PER_RELATION];

/// One row of the historical dataset. Cells keep the raw number as written so
/// that range checks happen where the values are used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroRow {
    pub main_heroid: Option<i64>,
    pub counter: Slots,
    pub countered: Slots,
    pub best: Slots,
    pub worst: Slots,
}

impl HeroRow {
    pub fn related(&self, relation: Relation) -> &Slots {
        match relation {
            Relation::Counter => &self.counter,
            Relation::Countered => &self.countered,
            Relation::Best => &self.best,
            Relation::Worst => &self.worst,
        }
    }

    fn related_mut(&mut self, relation: Relation) -> &mut Slots {
        match relation {
            Relation::Counter => &mut self.counter,
            Relation::Countered => &mut self.countered,
            Relation::Best => &mut self.best,
            Relation::Worst => &mut self.worst,
        }
    }
}

/// Column positions resolved from the CSV header.
struct ColumnMap {
    main_heroid: usize,
    slots: Vec<(Relation, usize, usize)>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, AppError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let main_heroid = position("main_heroid").ok_or_else(|| {
            AppError::DataError("missing required column 'main_heroid'".to_string())
        })?;

        let mut slots = Vec::new();
        for relation in Relation::ALL {
            for slot in 0..SLOTS_PER_RELATION {
                let name = format!("{}{}", relation.column_prefix(), slot + 1);
                match position(&name) {
                    Some(col) => slots.push((relation, slot, col)),
                    None => log::debug!("Column '{}' absent, treating as empty", name),
                }
            }
        }

        Ok(ColumnMap { main_heroid, slots })
    }
}

/// Parses a numeric cell. Empty and `nan` cells are missing; integral floats
/// such as `12.0` are accepted because spreadsheet tools write them.
pub fn parse_cell(raw: &str) -> Result<Option<i64>, String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(Some(value));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(Some(value as i64)),
        _ => Err(format!("'{}' is not a hero id", raw)),
    }
}

pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<HeroRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::DataError(format!("Failed to read header: {}", e)))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = record
            .map_err(|e| AppError::DataError(format!("Line {}: {}", line, e)))?;

        let cell = |col: usize| -> Result<Option<i64>, AppError> {
            parse_cell(record.get(col).unwrap_or(""))
                .map_err(|e| AppError::DataError(format!("Line {}: {}", line, e)))
        };

        let mut row = HeroRow {
            main_heroid: cell(columns.main_heroid)?,
            ..HeroRow::default()
        };
        for &(relation, slot, col) in &columns.slots {
            row.related_mut(relation)[slot] = cell(col)?;
        }
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_rows(path: &Path) -> Result<Vec<HeroRow>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::DataError(format!(
            "Failed to open {}: {}. Fetch the hero statistics and convert them to CSV first.",
            path.display(),
            e
        ))
    })?;

    let rows = parse_rows(file)?;
    log::info!("Loaded {} hero rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "main_heroid,counter1,counter2,counter3,counter4,counter5,\
countered1,countered2,countered3,countered4,countered5,\
best1,best2,best3,best4,best5,worst1,worst2,worst3,worst4,worst5";

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(""), Ok(None));
        assert_eq!(parse_cell("  "), Ok(None));
        assert_eq!(parse_cell("NaN"), Ok(None));
        assert_eq!(parse_cell("12"), Ok(Some(12)));
        assert_eq!(parse_cell("12.0"), Ok(Some(12)));
        assert!(parse_cell("12.5").is_err());
        assert!(parse_cell("Miya").is_err());
    }

    #[test]
    fn test_parse_rows_reads_all_relations() {
        let csv = format!(
            "{}\n1,2,3,,,,4,,,,,5,6,7,8,9,10,,,,\n",
            HEADER
        );
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.main_heroid, Some(1));
        assert_eq!(row.counter, [Some(2), Some(3), None, None, None]);
        assert_eq!(row.countered, [Some(4), None, None, None, None]);
        assert_eq!(row.best, [Some(5), Some(6), Some(7), Some(8), Some(9)]);
        assert_eq!(row.worst, [Some(10), None, None, None, None]);
    }

    #[test]
    fn test_parse_rows_column_order_independent() {
        let csv = "best1,main_heroid\n7.0,3\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].main_heroid, Some(3));
        assert_eq!(rows[0].best[0], Some(7));
        assert_eq!(rows[0].counter, [None; SLOTS_PER_RELATION]);
    }

    #[test]
    fn test_parse_rows_requires_main_column() {
        let csv = "best1,best2\n1,2\n";
        assert!(matches!(parse_rows(csv.as_bytes()), Err(AppError::DataError(_))));
    }

    #[test]
    fn test_parse_rows_reports_line_of_bad_cell() {
        let csv = "main_heroid,best1\n1,2\n2,abc\n";
        match parse_rows(csv.as_bytes()) {
            Err(AppError::DataError(msg)) => assert!(msg.contains("Line 3"), "{}", msg),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_load_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "9,,,,,,,,,,,1,,,,,,,,,").unwrap();
        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].best[0], Some(1));
    }

    #[test]
    fn test_load_rows_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_rows(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(AppError::DataError(_))));
    }
}
